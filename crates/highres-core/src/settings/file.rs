//! The backing settings file.
//!
//! [`SettingsFile`] keeps every category and property in memory and only
//! touches the disk on [`SettingsFile::load`] and [`SettingsFile::save`].
//! Callers look properties up with the `get_or_create_*` methods, which
//! attach the default, comment, and bounds every time so the metadata always
//! reflects the running code rather than whatever was last written to disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::settings::category::Category;
use crate::settings::codec;
use crate::settings::property::{IntRange, Property, PropertyKind, PropertyValue};

/// Name of the category that holds general settings.
pub const CATEGORY_GENERAL: &str = "general";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be parsed.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value could not be written in the file format.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Categories of typed properties persisted to a single file.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    defined_version: Option<String>,
    loaded_version: Option<String>,
    case_sensitive: bool,
    /// Keyed by the normalized category name.
    categories: BTreeMap<String, Category>,
}

impl SettingsFile {
    /// Creates an empty, case-insensitive settings file bound to `path`.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(path: impl Into<PathBuf>, version: Option<&str>) -> Self {
        Self {
            path: path.into(),
            defined_version: version.map(str::to_string),
            loaded_version: None,
            case_sensitive: false,
            categories: BTreeMap::new(),
        }
    }

    /// Sets whether category names are compared case-sensitively.
    pub fn with_case_sensitive_categories(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The version this code writes.
    pub fn defined_version(&self) -> Option<&str> {
        self.defined_version.as_deref()
    }

    /// The version marker found in the file by the last load.
    pub fn loaded_version(&self) -> Option<&str> {
        self.loaded_version.as_deref()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn normalize(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    // ── Categories ────────────────────────────────────────────────────────────

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(&self.normalize(name))
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(&self.normalize(name))
    }

    pub fn category_mut(&mut self, name: &str) -> Option<&mut Category> {
        let key = self.normalize(name);
        self.categories.get_mut(&key)
    }

    /// Returns the named category, creating an empty one if it is missing.
    pub fn get_category(&mut self, name: &str) -> &mut Category {
        let key = self.normalize(name);
        self.categories
            .entry(key.clone())
            .or_insert_with(|| Category::new(key))
    }

    pub fn remove_category(&mut self, name: &str) -> Option<Category> {
        let key = self.normalize(name);
        self.categories.remove(&key)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.values().map(Category::name)
    }

    // ── Properties ────────────────────────────────────────────────────────────

    /// Returns the integer property `key` in `category`, creating it with
    /// `default` if it is missing or holds a non-integer value.
    ///
    /// The default, comment, and range are (re)attached on every call.
    pub fn get_or_create_int(
        &mut self,
        category: &str,
        key: &str,
        default: i64,
        comment: &str,
        range: IntRange,
    ) -> &mut Property {
        let prop = self.get_or_create(category, key, PropertyValue::Integer(default));
        prop.set_default(PropertyValue::Integer(default));
        prop.set_comment(comment);
        prop.set_range(range);
        prop
    }

    /// Returns the string property `key` in `category`, creating it with
    /// `default` if it is missing or holds a non-string value.
    ///
    /// The default, comment, and allowed values are (re)attached on every
    /// call.  An empty `valid_values` allows any string.
    pub fn get_or_create_string(
        &mut self,
        category: &str,
        key: &str,
        default: &str,
        comment: &str,
        valid_values: Vec<String>,
    ) -> &mut Property {
        let prop = self.get_or_create(category, key, PropertyValue::String(default.to_string()));
        prop.set_default(PropertyValue::String(default.to_string()));
        prop.set_comment(comment);
        prop.set_valid_values(valid_values);
        prop
    }

    /// Returns the boolean property `key` in `category`, creating it with
    /// `default` if it is missing or holds a non-boolean value.
    pub fn get_or_create_bool(
        &mut self,
        category: &str,
        key: &str,
        default: bool,
        comment: &str,
    ) -> &mut Property {
        let prop = self.get_or_create(category, key, PropertyValue::Boolean(default));
        prop.set_default(PropertyValue::Boolean(default));
        prop.set_comment(comment);
        prop
    }

    fn get_or_create(&mut self, category: &str, key: &str, default: PropertyValue) -> &mut Property {
        let path = self.path.clone();
        let cat = self.get_category(category);

        let wrong_kind = cat.get(key).map_or(false, |p| !same_shape(p.value(), &default));
        if wrong_kind {
            warn!(
                "settings {}: {}.{} has the wrong type, resetting to {default}",
                path.display(),
                cat.name(),
                key
            );
            cat.remove(key);
        }

        cat.get_or_insert_with(key, || {
            let mut prop = Property::new(key, default);
            // Not on disk yet.
            prop.mark_changed();
            prop
        })
    }

    /// Returns `true` if any property has a change not yet saved.
    pub fn has_changed(&self) -> bool {
        self.categories.values().any(Category::has_changed)
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Reads the file from disk, replacing in-memory values with stored ones.
    ///
    /// Properties already known keep their metadata.  Properties present only
    /// in memory are kept and flagged as changed so the next save writes
    /// them.  A missing file is not an error: memory is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system errors other than "not
    /// found", and [`SettingsError::Parse`] if the content is malformed.
    pub fn load(&mut self) -> Result<(), SettingsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("settings file {} does not exist yet", self.path.display());
                self.categories.values_mut().for_each(Category::mark_changed);
                return Ok(());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let parsed = codec::parse(&content)?;

        self.categories.values_mut().for_each(Category::mark_changed);
        let path = self.path.clone();
        for loaded in parsed.categories {
            let target = self.get_category(loaded.name());
            for prop in loaded.properties() {
                match target.get_mut(prop.name()) {
                    Some(existing) => load_stored(existing, prop.value(), &path),
                    None => {
                        target.insert(prop.clone());
                    }
                }
            }
        }

        if parsed.version != self.defined_version {
            info!(
                "settings {} has version {:?}, this build writes {:?}",
                self.path.display(),
                parsed.version,
                self.defined_version
            );
        }
        self.loaded_version = parsed.version;

        info!("loaded settings from {}", self.path.display());
        Ok(())
    }

    /// Writes every category to disk and clears all changed flags.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system failures or
    /// [`SettingsError::Serialize`] if a value cannot be encoded.
    pub fn save(&mut self) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = codec::render(self.defined_version.as_deref(), self.categories.values())?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.categories.values_mut().for_each(Category::reset_changed);
        info!("saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Copies a stored value into a known property.  A value of the wrong type
/// is dropped in favour of the default, and the property is flagged so the
/// next save rewrites it.
fn load_stored(existing: &mut Property, stored: &PropertyValue, path: &Path) {
    if same_shape(stored, existing.value()) {
        existing.load_value(stored.clone());
        return;
    }
    if let Some(empty) = empty_list_like(stored, existing.value()) {
        existing.load_value(empty);
        return;
    }

    warn!(
        "settings {}: stored {} = {stored} has the wrong type, resetting to {}",
        path.display(),
        existing.name(),
        existing.default_value()
    );
    existing.set_to_default();
    existing.mark_changed();
}

/// An empty TOML array carries no element type; read it as an empty list of
/// the kind `wanted` holds.
fn empty_list_like(stored: &PropertyValue, wanted: &PropertyValue) -> Option<PropertyValue> {
    let empty = matches!(stored, PropertyValue::StringList(v) if v.is_empty());
    if !empty || !wanted.is_list() {
        return None;
    }
    Some(match wanted.kind() {
        PropertyKind::Boolean => PropertyValue::BooleanList(Vec::new()),
        PropertyKind::Integer => PropertyValue::IntegerList(Vec::new()),
        PropertyKind::Double => PropertyValue::DoubleList(Vec::new()),
        PropertyKind::String => PropertyValue::StringList(Vec::new()),
    })
}

/// Two values have the same shape when they share element kind and list-ness.
/// Integers stored where a double is expected are accepted.
fn same_shape(stored: &PropertyValue, wanted: &PropertyValue) -> bool {
    if stored.is_list() != wanted.is_list() {
        return false;
    }
    stored.kind() == wanted.kind()
        || (stored.kind() == PropertyKind::Integer && wanted.kind() == PropertyKind::Double)
}
