//! File-system watch infrastructure for the backing settings file.
//!
//! The settings file can be edited by hand while the game is running.  A
//! [`WatchSource`] reports create/modify/delete notifications for the file's
//! directory; the configuration facade polls it once per tick and reloads or
//! rewrites the file as needed.
//!
//! # Testability
//!
//! The `WatchSource` trait allows unit tests to inject synthetic events with
//! [`mock::MockWatchSource`] instead of waiting on a real file-system watcher.

use std::path::{Path, PathBuf};

pub mod mock;
pub mod notify_source;

pub use notify_source::NotifyWatchSource;

/// What happened to a watched path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Modified,
    Deleted,
}

/// A single change reported for a path inside a watched directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub kind: FileEventKind,
    /// Absolute path of the entry that changed.
    pub path: PathBuf,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Error type for watch setup.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to create file watcher: {0}")]
    Create(#[source] notify::Error),
    #[error("failed to watch {path}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("failed to resolve watch directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait abstracting file-system change notifications.
///
/// The production implementation uses the `notify` crate; tests use
/// [`mock::MockWatchSource`].
pub trait WatchSource {
    /// Starts reporting creates, modifications, and deletions of entries
    /// directly inside `dir`.
    fn watch_dir(&mut self, dir: &Path) -> Result<(), WatchError>;

    /// Takes the next queued notification without blocking.
    ///
    /// One notification may cover several entries; an empty vector means
    /// nothing was queued.
    fn poll(&mut self) -> Vec<FileEvent>;
}
