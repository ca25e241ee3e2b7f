//! The in-memory screenshot configuration record.

use crate::domain::format::ScreenshotFormat;

/// Settings file key for the screenshot width.
pub const WIDTH_KEY: &str = "screenshotWidth";
/// Settings file key for the screenshot height.
pub const HEIGHT_KEY: &str = "screenshotHeight";
/// Settings file key for the screenshot format.
pub const FORMAT_KEY: &str = "screenshotType";

pub const DEFAULT_WIDTH: u32 = 1280;
pub const MIN_WIDTH: u32 = 640;
pub const MAX_WIDTH: u32 = 15360;

pub const DEFAULT_HEIGHT: u32 = 720;
pub const MIN_HEIGHT: u32 = 480;
pub const MAX_HEIGHT: u32 = 8640;

/// Current screenshot width, height, and output format.
///
/// Exactly one instance is owned by the configuration facade for the lifetime
/// of the mod.  Width and height stay within `[MIN_*, MAX_*]` as long as they
/// are written through [`clamp_width`] / [`clamp_height`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigState {
    /// The width of the screenshot to take, in pixels.
    pub width: u32,
    /// The height of the screenshot to take, in pixels.
    pub height: u32,
    /// The type of file to save the screenshot as.
    pub format: ScreenshotFormat,
}

impl Default for ConfigState {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            format: ScreenshotFormat::Png,
        }
    }
}

/// Clamps a requested width into `[MIN_WIDTH, MAX_WIDTH]`.
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

/// Clamps a requested height into `[MIN_HEIGHT, MAX_HEIGHT]`.
pub fn clamp_height(height: u32) -> u32 {
    height.clamp(MIN_HEIGHT, MAX_HEIGHT)
}
