//! The screenshot configuration facade.
//!
//! [`ScreenshotConfig`] is the single point of truth for the current
//! screenshot width, height, and format.  It owns:
//!
//! - the in-memory [`ConfigState`],
//! - an optional backing [`SettingsFile`] (absent until the host attaches
//!   one, in which case every update stays memory-only),
//! - an optional file watcher (see [`sync`]), and
//! - the [`EventSink`] every update is published to.
//!
//! # Update flow
//!
//! ```text
//! set_width(w)
//!  ├─ old = state.width
//!  ├─ clamp w into bounds
//!  ├─ backing file attached?  write property, save if the value changed
//!  ├─ state.width = w
//!  └─ publish WidthChanged { old, new: w }
//! ```
//!
//! Setters never fail.  A save error is logged and the in-memory update and
//! notification still happen.

use std::path::PathBuf;

use highres_core::domain::state::{
    clamp_height, clamp_width, DEFAULT_HEIGHT, DEFAULT_WIDTH, FORMAT_KEY, HEIGHT_KEY, MAX_HEIGHT,
    MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH, WIDTH_KEY,
};
use highres_core::settings::file::CATEGORY_GENERAL;
use highres_core::{
    ConfigState, FormatChanged, HeightChanged, IntRange, Property, ScreenshotFormat, SettingsFile,
    WidthChanged,
};
use tracing::{debug, error, warn};

use crate::events::EventSink;
use crate::watch::WatchSource;

pub mod sync;

const WIDTH_COMMENT: &str = "The width of the screenshot to take.";
const HEIGHT_COMMENT: &str = "The height of the screenshot to take.";
const FORMAT_COMMENT: &str = "The type of the screenshot to take.";

fn width_range() -> IntRange {
    IntRange::new(i64::from(MIN_WIDTH), i64::from(MAX_WIDTH))
}

fn height_range() -> IntRange {
    IntRange::new(i64::from(MIN_HEIGHT), i64::from(MAX_HEIGHT))
}

/// Screenshot configuration with optional persistence and change
/// notifications.
pub struct ScreenshotConfig<S> {
    state: ConfigState,
    settings: Option<SettingsFile>,
    watcher: Option<Box<dyn WatchSource>>,
    /// Resolved path the watcher reports for the backing file.
    watched_file: Option<PathBuf>,
    events: S,
}

impl<S: EventSink> ScreenshotConfig<S> {
    /// Creates a memory-only configuration holding the defaults.
    pub fn new(events: S) -> Self {
        Self {
            state: ConfigState::default(),
            settings: None,
            watcher: None,
            watched_file: None,
            events,
        }
    }

    // ── Backing file ──────────────────────────────────────────────────────────

    /// Attaches a backing settings file and pulls its stored values into
    /// memory, returning the file it replaced.
    ///
    /// The file should already be loaded.  Stored values that differ from
    /// memory are published like any other update; invalid or missing values
    /// are rewritten with their defaults.
    pub fn attach(&mut self, settings: SettingsFile) -> Option<SettingsFile> {
        let previous = self.settings.replace(settings);
        self.watched_file = None;
        self.pull_from_settings();
        previous
    }

    /// Detaches the backing settings file; later updates are memory-only.
    pub fn detach(&mut self) -> Option<SettingsFile> {
        self.watched_file = None;
        self.settings.take()
    }

    pub fn settings(&self) -> Option<&SettingsFile> {
        self.settings.as_ref()
    }

    pub fn events(&self) -> &S {
        &self.events
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub fn state(&self) -> ConfigState {
        self.state
    }

    /// The width of the screenshot to take.
    pub fn width(&self) -> u32 {
        self.state.width
    }

    /// The height of the screenshot to take.
    pub fn height(&self) -> u32 {
        self.state.height
    }

    /// The type of file to save the screenshot as.
    pub fn format(&self) -> ScreenshotFormat {
        self.state.format
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    /// Sets the width of the screenshot to take.
    ///
    /// Values outside `[640, 15360]` are clamped to the nearest bound.
    pub fn set_width(&mut self, width: u32) {
        let old = self.state.width;
        let new = clamp_width(width);
        if new != width {
            warn!("screenshot width {width} out of range, using {new}");
        }

        if let Some(settings) = self.settings.as_mut() {
            let prop = width_property(settings);
            prop.set_int(i64::from(new));
            if prop.has_changed() {
                persist(settings);
            }
        }

        self.state.width = new;
        self.events.publish(WidthChanged { old, new }.into());
    }

    /// Sets the height of the screenshot to take.
    ///
    /// Values outside `[480, 8640]` are clamped to the nearest bound.
    pub fn set_height(&mut self, height: u32) {
        let old = self.state.height;
        let new = clamp_height(height);
        if new != height {
            warn!("screenshot height {height} out of range, using {new}");
        }

        if let Some(settings) = self.settings.as_mut() {
            let prop = height_property(settings);
            prop.set_int(i64::from(new));
            if prop.has_changed() {
                persist(settings);
            }
        }

        self.state.height = new;
        self.events.publish(HeightChanged { old, new }.into());
    }

    /// Sets the type of file to save the screenshot as.
    pub fn set_format(&mut self, format: ScreenshotFormat) {
        let old = self.state.format;

        if let Some(settings) = self.settings.as_mut() {
            let prop = format_property(settings);
            prop.set_string(format.name());
            if prop.has_changed() {
                persist(settings);
            }
        }

        self.state.format = format;
        self.events.publish(FormatChanged { old, new: format }.into());
    }

    // ── Settings → memory ─────────────────────────────────────────────────────

    /// Copies stored values into memory, publishing a notification for each
    /// field that differs.  Missing, mistyped, or out-of-range stored values
    /// are corrected in the file, which is then saved.
    pub(crate) fn pull_from_settings(&mut self) {
        let Some(settings) = self.settings.as_mut() else {
            return;
        };

        let width = stored_dimension(width_property(settings), DEFAULT_WIDTH, clamp_width);
        let height = stored_dimension(height_property(settings), DEFAULT_HEIGHT, clamp_height);
        let format = stored_format(format_property(settings));

        if settings.has_changed() {
            persist(settings);
        }

        let old = self.state;
        self.state = ConfigState {
            width,
            height,
            format,
        };
        debug!("pulled {:?} from settings", self.state);

        if old.width != width {
            self.events.publish(WidthChanged { old: old.width, new: width }.into());
        }
        if old.height != height {
            self.events.publish(HeightChanged { old: old.height, new: height }.into());
        }
        if old.format != format {
            self.events.publish(FormatChanged { old: old.format, new: format }.into());
        }
    }

    /// Writes every in-memory value into the backing file and saves it
    /// unconditionally.
    pub(crate) fn push_to_settings(&mut self) {
        let state = self.state;
        let Some(settings) = self.settings.as_mut() else {
            return;
        };
        width_property(settings).set_int(i64::from(state.width));
        height_property(settings).set_int(i64::from(state.height));
        format_property(settings).set_string(state.format.name());
        persist(settings);
    }
}

fn width_property(settings: &mut SettingsFile) -> &mut Property {
    settings.get_or_create_int(
        CATEGORY_GENERAL,
        WIDTH_KEY,
        i64::from(DEFAULT_WIDTH),
        WIDTH_COMMENT,
        width_range(),
    )
}

fn height_property(settings: &mut SettingsFile) -> &mut Property {
    settings.get_or_create_int(
        CATEGORY_GENERAL,
        HEIGHT_KEY,
        i64::from(DEFAULT_HEIGHT),
        HEIGHT_COMMENT,
        height_range(),
    )
}

fn format_property(settings: &mut SettingsFile) -> &mut Property {
    settings.get_or_create_string(
        CATEGORY_GENERAL,
        FORMAT_KEY,
        ScreenshotFormat::default().name(),
        FORMAT_COMMENT,
        ScreenshotFormat::names(),
    )
}

/// Reads a width/height property, clamping and writing back stored values
/// that fall outside the bounds.
fn stored_dimension(prop: &mut Property, default: u32, clamp: fn(u32) -> u32) -> u32 {
    let stored = prop.as_int().unwrap_or(i64::from(default));
    let value = clamp(u32::try_from(stored.max(0)).unwrap_or(u32::MAX));
    if i64::from(value) != stored {
        warn!("stored {} = {stored} out of range, using {value}", prop.name());
        prop.set_int(i64::from(value));
    }
    value
}

/// Reads the format property, normalizing its case and falling back to the
/// default for unknown names.
fn stored_format(prop: &mut Property) -> ScreenshotFormat {
    let parsed = prop.as_str().map(str::parse::<ScreenshotFormat>);
    match parsed {
        Some(Ok(format)) => {
            prop.set_string(format.name());
            format
        }
        _ => {
            warn!("stored {} = {} is not a known format, using PNG", prop.name(), prop.value());
            prop.set_to_default();
            ScreenshotFormat::default()
        }
    }
}

fn persist(settings: &mut SettingsFile) {
    if let Err(e) = settings.save() {
        error!("failed to save settings to {}: {e}", settings.path().display());
    }
}
