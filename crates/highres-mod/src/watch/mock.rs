//! Mock watch source for unit testing.
//!
//! Allows tests to inject synthetic [`FileEvent`]s without touching the file
//! system.  Clones share state, so a test keeps one clone for injecting and
//! hands the other to the code under test.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::{FileEvent, FileEventKind, WatchError, WatchSource};

#[derive(Default)]
struct MockState {
    watched: Vec<PathBuf>,
    queue: VecDeque<Vec<FileEvent>>,
    fail_registration: bool,
}

/// A mock implementation of [`WatchSource`] that allows tests to inject events.
#[derive(Clone, Default)]
pub struct MockWatchSource {
    state: Arc<Mutex<MockState>>,
}

impl MockWatchSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one notification covering `events`, as if reported by the OS.
    pub fn inject(&self, events: Vec<FileEvent>) {
        self.state.lock().expect("lock poisoned").queue.push_back(events);
    }

    /// Queues a notification with a single event.
    pub fn inject_event(&self, kind: FileEventKind, path: impl Into<PathBuf>) {
        self.inject(vec![FileEvent::new(kind, path)]);
    }

    /// Makes every later [`WatchSource::watch_dir`] call fail.
    pub fn fail_registration(&self) {
        self.state.lock().expect("lock poisoned").fail_registration = true;
    }

    /// Directories passed to `watch_dir` so far.
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.state.lock().expect("lock poisoned").watched.clone()
    }

    /// Notifications not yet polled.
    pub fn pending(&self) -> usize {
        self.state.lock().expect("lock poisoned").queue.len()
    }
}

impl WatchSource for MockWatchSource {
    fn watch_dir(&mut self, dir: &Path) -> Result<(), WatchError> {
        let mut state = self.state.lock().expect("lock poisoned");
        if state.fail_registration {
            return Err(WatchError::Register {
                path: dir.to_path_buf(),
                source: notify::Error::generic("mock registration failure"),
            });
        }
        state.watched.push(dir.to_path_buf());
        Ok(())
    }

    fn poll(&mut self) -> Vec<FileEvent> {
        self.state
            .lock()
            .expect("lock poisoned")
            .queue
            .pop_front()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_poll_returns_one_notification_at_a_time() {
        // Arrange
        let handle = MockWatchSource::new();
        let mut source = handle.clone();
        handle.inject_event(FileEventKind::Modified, "/cfg/a.cfg");
        handle.inject_event(FileEventKind::Deleted, "/cfg/a.cfg");

        // Act
        let first = source.poll();

        // Assert
        assert_eq!(first, vec![FileEvent::new(FileEventKind::Modified, "/cfg/a.cfg")]);
        assert_eq!(handle.pending(), 1);
    }

    #[test]
    fn test_mock_poll_on_empty_queue_returns_nothing() {
        let mut source = MockWatchSource::new();
        assert!(source.poll().is_empty());
    }

    #[test]
    fn test_mock_records_watched_dirs() {
        let handle = MockWatchSource::new();
        let mut source = handle.clone();

        source.watch_dir(Path::new("/cfg")).expect("watch");

        assert_eq!(handle.watched_dirs(), vec![PathBuf::from("/cfg")]);
    }

    #[test]
    fn test_mock_registration_failure() {
        let handle = MockWatchSource::new();
        handle.fail_registration();
        let mut source = handle.clone();

        let result = source.watch_dir(Path::new("/cfg"));

        assert!(matches!(result, Err(WatchError::Register { .. })));
        assert!(handle.watched_dirs().is_empty());
    }
}
