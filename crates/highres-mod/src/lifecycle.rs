//! Mod lifecycle: the entry object the game host drives.
//!
//! ```text
//! host start
//!  └─ on_pre_init(config_dir)  -- load/create the settings file, attach it
//!  └─ on_post_init()           -- start watching the file for edits
//!  └─ on_tick()  × N           -- apply external edits, one per tick
//! ```
//!
//! Other components subscribe to [`HighresScreenshots::events`] to learn
//! about new dimensions or formats as they are set.

use std::path::Path;
use std::rc::Rc;

use highres_core::settings::file::CATEGORY_GENERAL;
use highres_core::{SettingsError, SettingsWrapper};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScreenshotConfig;
use crate::events::EventBus;

pub const MOD_ID: &str = "highres_screenshots";
pub const MOD_NAME: &str = "HighresScreenshots";
pub const MOD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the backing settings file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "highres_screenshots.cfg";
/// Version marker written into the settings file.
pub const CONFIG_VERSION: &str = "1.0";

const GENERAL_COMMENT: &str = "Screenshot resolution and output format.";

/// Error type for lifecycle hooks.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] SettingsError),
}

/// The root mod object.
pub struct HighresScreenshots {
    events: Rc<EventBus>,
    config: ScreenshotConfig<Rc<EventBus>>,
}

impl HighresScreenshots {
    /// Creates the mod with a memory-only configuration.
    pub fn new() -> Self {
        let events = Rc::new(EventBus::new());
        let config = ScreenshotConfig::new(Rc::clone(&events));
        Self { events, config }
    }

    /// The bus every configuration change is published on.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &ScreenshotConfig<Rc<EventBus>> {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ScreenshotConfig<Rc<EventBus>> {
        &mut self.config
    }

    /// Loads (or creates) the settings file in `config_dir` and attaches it.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Settings`] if an existing file cannot be
    /// read or parsed.  A missing file is created with defaults.
    pub fn on_pre_init(&mut self, config_dir: &Path) -> Result<(), LifecycleError> {
        info!("Pre-initializing {MOD_NAME} {MOD_VERSION}...");

        let mut wrapper = SettingsWrapper::new(config_dir.join(CONFIG_FILE_NAME), CONFIG_VERSION);
        wrapper.load()?;
        if wrapper
            .try_add_category(CATEGORY_GENERAL, Some(GENERAL_COMMENT))
            .is_none()
        {
            wrapper.try_set_category_comment(CATEGORY_GENERAL, GENERAL_COMMENT);
        }

        self.config.attach(wrapper.into_inner());
        Ok(())
    }

    /// Starts watching the settings file.  Returns whether the watch is
    /// active; a failure is logged and the mod keeps running without it.
    pub fn on_post_init(&mut self) -> bool {
        info!("Post-initializing {MOD_NAME}...");
        match self.config.init_watch() {
            Ok(true) => true,
            Ok(false) => {
                warn!("no settings file attached, external edits will not be picked up");
                false
            }
            Err(e) => {
                warn!("external edits will not be picked up: {e}");
                false
            }
        }
    }

    /// Called once per game tick.
    pub fn on_tick(&mut self) {
        self.config.on_tick();
    }
}

impl Default for HighresScreenshots {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use highres_core::{ConfigEvent, ScreenshotFormat};
    use std::cell::RefCell;
    use uuid::Uuid;

    fn temp_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("highres_life_{}", Uuid::new_v4()))
    }

    #[test]
    fn test_pre_init_creates_settings_file_with_general_category() {
        // Arrange
        let dir = temp_dir();
        let mut hrs = HighresScreenshots::new();

        // Act
        hrs.on_pre_init(&dir).expect("pre-init");

        // Assert
        let text = std::fs::read_to_string(dir.join(CONFIG_FILE_NAME)).expect("file written");
        assert!(text.contains("# Screenshot resolution and output format.\n[general]"));
        assert!(text.contains("screenshotWidth = 1280"));
        assert!(text.contains("screenshotHeight = 720"));
        assert!(text.contains("screenshotType = \"PNG\""));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_pre_init_keeps_values_from_existing_file() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            "[general]\nscreenshotWidth = 7680\nscreenshotHeight = 4320\nscreenshotType = \"BMP\"\n",
        )
        .unwrap();
        let mut hrs = HighresScreenshots::new();

        hrs.on_pre_init(&dir).expect("pre-init");

        assert_eq!(hrs.config().width(), 7680);
        assert_eq!(hrs.config().height(), 4320);
        assert_eq!(hrs.config().format(), ScreenshotFormat::Bmp);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_pre_init_rejects_malformed_file() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE_NAME), "[[[ nope").unwrap();
        let mut hrs = HighresScreenshots::new();

        let result = hrs.on_pre_init(&dir);

        assert!(matches!(result, Err(LifecycleError::Settings(SettingsError::Parse(_)))));
        assert!(hrs.config().settings().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_post_init_without_settings_does_not_watch() {
        let mut hrs = HighresScreenshots::new();
        assert!(!hrs.on_post_init());
    }

    #[test]
    fn test_subscribers_see_changes_made_through_the_mod() {
        let mut hrs = HighresScreenshots::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hrs.events().subscribe(move |e| sink.borrow_mut().push(*e));

        hrs.config_mut().set_format(ScreenshotFormat::Jpeg);

        assert_eq!(seen.borrow().len(), 1);
        assert!(matches!(seen.borrow()[0], ConfigEvent::Format(_)));
    }
}
