//! The backing settings file.
//!
//! Settings are organised as named [`category::Category`] groups of typed
//! [`property::Property`] values and persisted as commented TOML by
//! [`codec`].  [`file::SettingsFile`] owns the in-memory copy and the disk
//! path; [`wrapper::SettingsWrapper`] adds the paired `try_*` / plain
//! convenience operations on top.

pub mod category;
pub mod codec;
pub mod file;
pub mod property;
pub mod wrapper;
