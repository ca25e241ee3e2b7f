//! Domain entities for HighresScreenshots.
//!
//! This module contains pure data types with no infrastructure dependencies.
//! Everything here can be constructed and tested without a settings file on
//! disk or a running game.

/// Change notifications published after every successful update.
pub mod events;
/// The closed set of screenshot output encodings.
pub mod format;
/// The in-memory configuration record and its bounds.
pub mod state;
