//! Screenshot output encoding.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The type of file to save a screenshot as.
///
/// The string names (`"PNG"`, `"JPEG"`, `"BMP"`) are what the settings file
/// stores, so they must not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenshotFormat {
    /// Lossless, the default.
    #[default]
    Png,
    /// Lossy, smallest files.
    Jpeg,
    /// Uncompressed bitmap.
    Bmp,
}

/// Error returned when a string does not name a [`ScreenshotFormat`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown screenshot format: {0:?} (expected one of PNG, JPEG, BMP)")]
pub struct ParseFormatError(pub String);

impl ScreenshotFormat {
    /// Every format, in declaration order.
    pub const ALL: [ScreenshotFormat; 3] = [Self::Png, Self::Jpeg, Self::Bmp];

    /// Returns the name stored in the settings file.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Bmp => "BMP",
        }
    }

    /// Returns the stored names of every format, used as a property's
    /// allowed values.
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.name().to_string()).collect()
    }

    /// Returns the conventional file extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }
}

impl fmt::Display for ScreenshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenshotFormat {
    type Err = ParseFormatError;

    /// Parses a format name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFormatError(s.to_string()))
    }
}
