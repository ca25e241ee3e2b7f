//! Platform configuration directory for the settings file.
//!
//! - Windows:  `%APPDATA%\HighresScreenshots`
//! - Linux:    `$XDG_CONFIG_HOME/highres_screenshots` or `~/.config/highres_screenshots`
//! - macOS:    `~/Library/Application Support/HighresScreenshots`

use std::ffi::OsString;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("could not determine platform config directory")]
pub struct NoPlatformConfigDir;

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`NoPlatformConfigDir`] when the base directory cannot be
/// determined from the environment.
pub fn config_dir() -> Result<PathBuf, NoPlatformConfigDir> {
    platform_config_dir().ok_or(NoPlatformConfigDir)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("HighresScreenshots"))
    }

    #[cfg(target_os = "linux")]
    {
        xdg_config_dir(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("HighresScreenshots")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// `$XDG_CONFIG_HOME/highres_screenshots`, falling back to `~/.config`.
/// An empty `XDG_CONFIG_HOME` counts as unset.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn xdg_config_dir(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("highres_screenshots"))
}
