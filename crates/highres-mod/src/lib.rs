//! highres-mod library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! - **`config`** – [`ScreenshotConfig`], the facade over the current
//!   screenshot settings, and its file-watch synchronization.
//! - **`events`** – the [`EventSink`] capability and the in-process
//!   [`EventBus`].
//! - **`watch`** – file-system change notifications (native and mock).
//! - **`lifecycle`** – [`HighresScreenshots`], the object the host drives.
//! - **`paths`** – where the settings file lives on each platform.

pub mod config;
pub mod events;
pub mod lifecycle;
pub mod paths;
pub mod watch;

pub use config::ScreenshotConfig;
pub use events::{EventBus, EventSink};
pub use lifecycle::HighresScreenshots;
