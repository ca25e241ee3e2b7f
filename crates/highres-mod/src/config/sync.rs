//! Keeps the facade in step with out-of-band edits to the backing file.
//!
//! The backing file's directory is watched, and [`ScreenshotConfig::on_tick`]
//! polls the watcher once per game tick:
//!
//! | Event for the backing file | Action                                   |
//! |----------------------------|------------------------------------------|
//! | created / modified         | reload from disk and pull into memory    |
//! | deleted                    | write in-memory values back and save     |
//!
//! Events for other entries in the directory are ignored.  Only one queued
//! notification is handled per tick, so a burst of edits is spread over
//! several ticks rather than stalling one.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::ScreenshotConfig;
use crate::events::EventSink;
use crate::watch::{FileEventKind, NotifyWatchSource, WatchError, WatchSource};

impl<S: EventSink> ScreenshotConfig<S> {
    /// Installs the watcher [`init_watch`](Self::init_watch) registers with,
    /// instead of the native one it would create.
    pub fn set_watch_source(&mut self, source: Box<dyn WatchSource>) {
        self.watcher = Some(source);
        self.watched_file = None;
    }

    /// Starts watching the backing file's directory.
    ///
    /// Returns `Ok(false)` without doing anything when no backing file is
    /// attached.  Creates a native watcher on first use unless one was
    /// installed with [`set_watch_source`](Self::set_watch_source).
    ///
    /// # Errors
    ///
    /// Returns [`WatchError`] if the watcher cannot be created or the
    /// directory cannot be resolved or registered.
    pub fn init_watch(&mut self) -> Result<bool, WatchError> {
        let Some(settings) = self.settings.as_ref() else {
            return Ok(false);
        };
        let file = resolve_watched_file(settings.path())?;
        let dir = file.parent().unwrap_or(Path::new("/")).to_path_buf();

        if self.watcher.is_none() {
            self.watcher = Some(Box::new(NotifyWatchSource::new()?));
        }
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.watch_dir(&dir)?;
        }

        info!("watching {} for external changes", file.display());
        self.watched_file = Some(file);
        Ok(true)
    }

    /// Returns `true` once [`init_watch`](Self::init_watch) has succeeded for
    /// the attached file.
    pub fn is_watching(&self) -> bool {
        self.watched_file.is_some()
    }

    /// Handles at most one queued watch notification.  Called once per tick.
    pub fn on_tick(&mut self) {
        let (Some(watcher), Some(watched)) = (self.watcher.as_mut(), self.watched_file.as_ref())
        else {
            return;
        };
        let Some(settings) = self.settings.as_ref() else {
            return;
        };

        let actions: Vec<FileEventKind> = watcher
            .poll()
            .into_iter()
            .filter(|e| e.path == *watched || e.path == settings.path())
            .map(|e| e.kind)
            .collect();

        for kind in actions {
            match kind {
                FileEventKind::Created | FileEventKind::Modified => self.reload(),
                // Editors that save by renaming report a delete for a file
                // that is already back in place.
                FileEventKind::Deleted if self.backing_file_exists() => self.reload(),
                FileEventKind::Deleted => {
                    info!("settings file was deleted, recreating it");
                    self.push_to_settings();
                }
            }
        }
    }

    fn backing_file_exists(&self) -> bool {
        self.watched_file.as_deref().map_or(false, Path::exists)
    }

    fn reload(&mut self) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        debug!("settings file changed on disk, reloading");
        if let Err(e) = settings.load() {
            // Usually a half-written file; the next modify event retries.
            warn!("keeping current settings, reload failed: {e}");
            return;
        }
        self.pull_from_settings();
    }
}

/// Makes the settings path absolute with a canonical directory, matching
/// what the watcher reports.
fn resolve_watched_file(path: &Path) -> Result<PathBuf, WatchError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = dir.canonicalize().map_err(|source| WatchError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(match path.file_name() {
        Some(name) => dir.join(name),
        None => dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::mock::MockWatchSource;
    use highres_core::domain::state::WIDTH_KEY;
    use highres_core::settings::file::CATEGORY_GENERAL;
    use highres_core::{
        ConfigEvent, HeightChanged, Property, ScreenshotFormat, SettingsFile, WidthChanged,
    };
    use std::sync::mpsc::{self, Receiver};
    use uuid::Uuid;

    struct Fixture {
        config: ScreenshotConfig<mpsc::Sender<ConfigEvent>>,
        events: Receiver<ConfigEvent>,
        watch: MockWatchSource,
        file: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("highres_sync_{}", Uuid::new_v4()));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("highres_screenshots.cfg");

            let (tx, events) = mpsc::channel();
            let mut config = ScreenshotConfig::new(tx);
            config.attach(SettingsFile::new(&path, Some("1.0")));

            let watch = MockWatchSource::new();
            config.set_watch_source(Box::new(watch.clone()));
            assert!(config.init_watch().expect("init watch"));

            let file = dir.canonicalize().unwrap().join("highres_screenshots.cfg");
            Self {
                config,
                events,
                watch,
                file,
            }
        }

        fn drain(&self) -> Vec<ConfigEvent> {
            self.events.try_iter().collect()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            if let Some(dir) = self.file.parent() {
                std::fs::remove_dir_all(dir).ok();
            }
        }
    }

    #[test]
    fn test_init_watch_without_backing_file_returns_false() {
        let (tx, _rx) = mpsc::channel();
        let mut config = ScreenshotConfig::new(tx);
        config.set_watch_source(Box::new(MockWatchSource::new()));

        assert!(!config.init_watch().expect("no error"));
        assert!(!config.is_watching());
    }

    #[test]
    fn test_init_watch_registers_parent_directory() {
        let fx = Fixture::new();

        assert!(fx.config.is_watching());
        assert_eq!(fx.watch.watched_dirs(), vec![fx.file.parent().unwrap().to_path_buf()]);
    }

    #[test]
    fn test_init_watch_surfaces_registration_failure() {
        let (tx, _rx) = mpsc::channel();
        let mut config = ScreenshotConfig::new(tx);
        let dir = std::env::temp_dir();
        config.attach(SettingsFile::new(
            dir.join(format!("highres_fail_{}.cfg", Uuid::new_v4())),
            None,
        ));
        let watch = MockWatchSource::new();
        watch.fail_registration();
        config.set_watch_source(Box::new(watch));

        let result = config.init_watch();

        assert!(matches!(result, Err(WatchError::Register { .. })));
        assert!(!config.is_watching());
        if let Some(path) = config.settings().map(|s| s.path().to_path_buf()) {
            std::fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_tick_with_nothing_queued_changes_nothing() {
        let mut fx = Fixture::new();

        fx.config.on_tick();

        assert!(fx.drain().is_empty());
        assert_eq!(fx.config.width(), 1280);
    }

    #[test]
    fn test_modify_event_reloads_values_from_disk() {
        // Arrange
        let mut fx = Fixture::new();
        std::fs::write(
            &fx.file,
            "[general]\nscreenshotWidth = 1920\nscreenshotHeight = 1080\nscreenshotType = \"BMP\"\n",
        )
        .unwrap();
        fx.watch.inject_event(FileEventKind::Modified, &fx.file);

        // Act
        fx.config.on_tick();

        // Assert
        assert_eq!(fx.config.width(), 1920);
        assert_eq!(fx.config.height(), 1080);
        assert_eq!(fx.config.format(), ScreenshotFormat::Bmp);
        assert_eq!(fx.drain().len(), 3);
    }

    #[test]
    fn test_delete_event_recreates_file_with_memory_values() {
        // Arrange
        let mut fx = Fixture::new();
        fx.config.set_width(2560);
        std::fs::remove_file(&fx.file).unwrap();
        fx.watch.inject_event(FileEventKind::Deleted, &fx.file);

        // Act
        fx.config.on_tick();

        // Assert
        assert!(fx.file.exists());
        let mut reread = SettingsFile::new(&fx.file, None);
        reread.load().unwrap();
        let width = reread
            .category(CATEGORY_GENERAL)
            .and_then(|c| c.get(WIDTH_KEY))
            .and_then(Property::as_int);
        assert_eq!(width, Some(2560));
    }

    #[test]
    fn test_create_event_reloads_values_from_disk() {
        // Arrange
        let mut fx = Fixture::new();
        std::fs::remove_file(&fx.file).unwrap();
        std::fs::write(&fx.file, "[general]\nscreenshotHeight = 2160\n").unwrap();
        fx.watch.inject_event(FileEventKind::Created, &fx.file);

        // Act
        fx.config.on_tick();

        // Assert
        assert_eq!(fx.config.height(), 2160);
        assert_eq!(
            fx.drain(),
            vec![ConfigEvent::Height(HeightChanged { old: 720, new: 2160 })]
        );
    }

    #[test]
    fn test_delete_for_file_replaced_by_rename_keeps_new_content() {
        // Arrange: a rename-style save reports delete then create, but the
        // new file is already on disk when the delete is handled
        let mut fx = Fixture::new();
        std::fs::write(&fx.file, "[general]\nscreenshotWidth = 1920\n").unwrap();
        fx.watch.inject_event(FileEventKind::Deleted, &fx.file);
        fx.watch.inject_event(FileEventKind::Created, &fx.file);

        // Act
        fx.config.on_tick();
        fx.config.on_tick();

        // Assert
        assert_eq!(fx.config.width(), 1920);
        let mut reread = SettingsFile::new(&fx.file, None);
        reread.load().unwrap();
        let width = reread
            .category(CATEGORY_GENERAL)
            .and_then(|c| c.get(WIDTH_KEY))
            .and_then(Property::as_int);
        assert_eq!(width, Some(1920));
        assert_eq!(
            fx.drain(),
            vec![ConfigEvent::Width(WidthChanged { old: 1280, new: 1920 })]
        );
    }

    #[test]
    fn test_events_for_other_files_are_ignored() {
        let mut fx = Fixture::new();
        let other = fx.file.with_file_name("other.cfg");
        std::fs::write(&fx.file, "[general]\nscreenshotWidth = 4000\n").unwrap();
        fx.watch.inject_event(FileEventKind::Modified, other);

        fx.config.on_tick();

        assert_eq!(fx.config.width(), 1280);
        assert!(fx.drain().is_empty());
    }

    #[test]
    fn test_only_one_notification_is_handled_per_tick() {
        let mut fx = Fixture::new();
        std::fs::write(&fx.file, "[general]\nscreenshotWidth = 3000\n").unwrap();
        fx.watch.inject_event(FileEventKind::Modified, &fx.file);
        fx.watch.inject_event(FileEventKind::Modified, &fx.file);

        fx.config.on_tick();

        assert_eq!(fx.watch.pending(), 1);
        assert_eq!(
            fx.drain(),
            vec![ConfigEvent::Width(WidthChanged { old: 1280, new: 3000 })]
        );
    }

    #[test]
    fn test_malformed_edit_keeps_current_values() {
        let mut fx = Fixture::new();
        fx.config.set_width(1600);
        fx.drain();
        std::fs::write(&fx.file, "[[[ half written").unwrap();
        fx.watch.inject_event(FileEventKind::Modified, &fx.file);

        fx.config.on_tick();

        assert_eq!(fx.config.width(), 1600);
        assert!(fx.drain().is_empty());
    }
}
