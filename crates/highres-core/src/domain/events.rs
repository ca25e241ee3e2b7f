//! Change notifications for the screenshot configuration.
//!
//! Each payload is an immutable `(old, new)` pair.  The configuration facade
//! builds one per successful update and hands it straight to the event sink;
//! nothing in this crate keeps them around afterwards.

use crate::domain::format::ScreenshotFormat;

/// The screenshot width was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthChanged {
    pub old: u32,
    pub new: u32,
}

/// The screenshot height was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightChanged {
    pub old: u32,
    pub new: u32,
}

/// The screenshot output format was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatChanged {
    pub old: ScreenshotFormat,
    pub new: ScreenshotFormat,
}

/// Any configuration change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    Width(WidthChanged),
    Height(HeightChanged),
    Format(FormatChanged),
}

impl From<WidthChanged> for ConfigEvent {
    fn from(e: WidthChanged) -> Self {
        Self::Width(e)
    }
}

impl From<HeightChanged> for ConfigEvent {
    fn from(e: HeightChanged) -> Self {
        Self::Height(e)
    }
}

impl From<FormatChanged> for ConfigEvent {
    fn from(e: FormatChanged) -> Self {
        Self::Format(e)
    }
}
