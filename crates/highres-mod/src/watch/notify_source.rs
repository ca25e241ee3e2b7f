//! [`WatchSource`] backed by the platform's native watcher via `notify`.
//!
//! The watcher delivers notifications on its own thread into an `mpsc`
//! channel; [`NotifyWatchSource::poll`] drains at most one of them with
//! `try_recv`, so a tick never blocks on the file system.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use notify::event::{ModifyKind, RenameMode};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use super::{FileEvent, FileEventKind, WatchError, WatchSource};

pub struct NotifyWatchSource {
    watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<notify::Event>>,
}

impl NotifyWatchSource {
    /// Creates the native watcher.  Nothing is watched until
    /// [`WatchSource::watch_dir`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Create`] if the platform watcher cannot start.
    pub fn new() -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(tx).map_err(WatchError::Create)?;
        Ok(Self { watcher, rx })
    }
}

impl WatchSource for NotifyWatchSource {
    fn watch_dir(&mut self, dir: &Path) -> Result<(), WatchError> {
        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|source| WatchError::Register {
                path: dir.to_path_buf(),
                source,
            })?;
        debug!("watching {}", dir.display());
        Ok(())
    }

    fn poll(&mut self) -> Vec<FileEvent> {
        match self.rx.try_recv() {
            Ok(Ok(event)) => translate(event),
            Ok(Err(e)) => {
                warn!("file watcher reported an error: {e}");
                Vec::new()
            }
            Err(TryRecvError::Empty) => Vec::new(),
            Err(TryRecvError::Disconnected) => {
                debug!("file watcher channel closed");
                Vec::new()
            }
        }
    }
}

/// Maps a `notify` event onto our three kinds.  Access and metadata-only
/// events are dropped.  A rename away from a path counts as a deletion.
fn translate(event: notify::Event) -> Vec<FileEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FileEventKind::Created,
        EventKind::Remove(_) => FileEventKind::Deleted,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FileEventKind::Deleted,
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => FileEventKind::Modified,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };
    event
        .paths
        .into_iter()
        .map(|path| FileEvent::new(kind, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from("/cfg/highres_screenshots.cfg"))
    }

    #[test]
    fn test_translate_maps_create_modify_remove() {
        assert_eq!(
            translate(event(EventKind::Create(CreateKind::File)))[0].kind,
            FileEventKind::Created
        );
        assert_eq!(
            translate(event(EventKind::Modify(ModifyKind::Data(DataChange::Content))))[0].kind,
            FileEventKind::Modified
        );
        assert_eq!(
            translate(event(EventKind::Remove(RemoveKind::File)))[0].kind,
            FileEventKind::Deleted
        );
    }

    #[test]
    fn test_translate_treats_rename_away_as_delete() {
        let events = translate(event(EventKind::Modify(ModifyKind::Name(RenameMode::From))));
        assert_eq!(events[0].kind, FileEventKind::Deleted);
    }

    #[test]
    fn test_translate_drops_access_and_metadata_events() {
        assert!(translate(event(EventKind::Access(AccessKind::Any))).is_empty());
        assert!(translate(event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)))).is_empty());
    }

    #[test]
    fn test_translate_keeps_every_path() {
        let ev = event(EventKind::Create(CreateKind::File)).add_path(PathBuf::from("/cfg/other"));
        let events = translate(ev);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].path, PathBuf::from("/cfg/other"));
    }

    #[test]
    fn test_poll_without_changes_returns_nothing() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("highres_watch_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut source = NotifyWatchSource::new().expect("watcher");
        source.watch_dir(&dir).expect("watch");

        // Act / Assert
        assert!(source.poll().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_watch_missing_directory_fails() {
        let mut source = NotifyWatchSource::new().expect("watcher");
        let missing = std::env::temp_dir().join(format!("highres_missing_{}", uuid::Uuid::new_v4()));

        let result = source.watch_dir(&missing);

        assert!(matches!(result, Err(WatchError::Register { .. })));
    }
}
