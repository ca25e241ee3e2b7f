//! # highres-core
//!
//! Shared library for HighresScreenshots containing the screenshot
//! configuration domain types and the backing settings file.
//!
//! This crate has zero dependencies on file watchers, async runtimes, or the
//! game host.  It only touches the file system when a [`SettingsFile`] is
//! explicitly loaded or saved.
//!
//! # Architecture overview
//!
//! HighresScreenshots lets a player take screenshots at a resolution and
//! output format that differ from the game window.  This crate holds the
//! pieces that do not depend on the host:
//!
//! - **`domain`** – The screenshot format enum, the in-memory configuration
//!   record with its defaults and bounds, and the change notifications that
//!   are published whenever a value is updated.
//!
//! - **`settings`** – The backing settings file: categories of typed
//!   properties persisted as commented TOML, plus [`SettingsWrapper`], a
//!   convenience layer whose `try_*` methods never fail and whose plain
//!   methods return a typed error when the `try_*` variant would have
//!   declined.

pub mod domain;
pub mod settings;

// Re-export the most-used types at the crate root so callers can write
// `highres_core::ScreenshotFormat` instead of the full module path.
pub use domain::events::{ConfigEvent, FormatChanged, HeightChanged, WidthChanged};
pub use domain::format::{ParseFormatError, ScreenshotFormat};
pub use domain::state::ConfigState;
pub use settings::category::Category;
pub use settings::file::{SettingsError, SettingsFile};
pub use settings::property::{IntRange, Property, PropertyKind, PropertyValue};
pub use settings::wrapper::{SettingsWrapper, WrapperError};
