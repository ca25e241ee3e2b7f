//! A single named, typed value inside a settings category.

use std::fmt;

use serde::Serialize;

/// The element type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Boolean,
    Integer,
    Double,
    String,
}

/// A property's current or default value.
///
/// Serialized untagged so a value converts directly into the matching TOML
/// scalar or array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    BooleanList(Vec<bool>),
    IntegerList(Vec<i64>),
    DoubleList(Vec<f64>),
    StringList(Vec<String>),
}

impl PropertyValue {
    /// Returns the element type, ignoring whether this is a list.
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Boolean(_) | Self::BooleanList(_) => PropertyKind::Boolean,
            Self::Integer(_) | Self::IntegerList(_) => PropertyKind::Integer,
            Self::Double(_) | Self::DoubleList(_) => PropertyKind::Double,
            Self::String(_) | Self::StringList(_) => PropertyKind::String,
        }
    }

    /// Returns `true` for the list variants.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::BooleanList(_) | Self::IntegerList(_) | Self::DoubleList(_) | Self::StringList(_)
        )
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }

        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::BooleanList(v) => list(f, v),
            Self::IntegerList(v) => list(f, v),
            Self::DoubleList(v) => list(f, v),
            Self::StringList(v) => list(f, v),
        }
    }
}

/// Inclusive bounds for an integer property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A named, typed value with its default and descriptive metadata.
///
/// Only the value and the name are persisted.  Comment, localization key,
/// range, and allowed values are attached by whoever requests the property
/// and are rendered as comment lines when the file is saved.
///
/// The `changed` flag is raised only when a write actually alters the value;
/// the owning [`SettingsFile`](crate::SettingsFile) clears it after a save.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: PropertyValue,
    default: PropertyValue,
    comment: Option<String>,
    lang_key: Option<String>,
    range: Option<IntRange>,
    valid_values: Vec<String>,
    changed: bool,
}

impl Property {
    /// Creates a property holding its default value.
    pub fn new(name: impl Into<String>, default: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value: default.clone(),
            default,
            comment: None,
            lang_key: None,
            range: None,
            valid_values: Vec::new(),
            changed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn default_value(&self) -> &PropertyValue {
        &self.default
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    pub fn is_list(&self) -> bool {
        self.value.is_list()
    }

    /// Replaces the value.  Returns `true` (and raises the changed flag) only
    /// when the new value differs from the current one.
    pub fn set(&mut self, value: PropertyValue) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.changed = true;
        true
    }

    pub fn set_bool(&mut self, value: bool) -> bool {
        self.set(PropertyValue::Boolean(value))
    }

    pub fn set_int(&mut self, value: i64) -> bool {
        self.set(PropertyValue::Integer(value))
    }

    pub fn set_string(&mut self, value: impl Into<String>) -> bool {
        self.set(PropertyValue::String(value.into()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            PropertyValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            PropertyValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            PropertyValue::Double(v) => Some(v),
            PropertyValue::Integer(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool_list(&self) -> Option<&[bool]> {
        match &self.value {
            PropertyValue::BooleanList(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_list(&self) -> Option<&[String]> {
        match &self.value {
            PropertyValue::StringList(v) => Some(v),
            _ => None,
        }
    }

    pub fn set_default(&mut self, default: PropertyValue) {
        self.default = default;
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }

    /// Restores the default value.  Returns `true` if the value changed.
    pub fn set_to_default(&mut self) -> bool {
        let default = self.default.clone();
        self.set(default)
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn lang_key(&self) -> Option<&str> {
        self.lang_key.as_deref()
    }

    pub fn set_lang_key(&mut self, lang_key: impl Into<String>) {
        self.lang_key = Some(lang_key.into());
    }

    pub fn range(&self) -> Option<IntRange> {
        self.range
    }

    pub fn set_range(&mut self, range: IntRange) {
        self.range = Some(range);
    }

    pub fn valid_values(&self) -> &[String] {
        &self.valid_values
    }

    pub fn set_valid_values(&mut self, values: Vec<String>) {
        self.valid_values = values;
    }

    /// Returns `true` when the value satisfies the range and allowed values.
    pub fn is_valid(&self) -> bool {
        match &self.value {
            PropertyValue::Integer(v) => self.range.map_or(true, |r| r.contains(*v)),
            PropertyValue::IntegerList(vs) => {
                self.range.map_or(true, |r| vs.iter().all(|v| r.contains(*v)))
            }
            PropertyValue::String(v) => {
                self.valid_values.is_empty() || self.valid_values.iter().any(|ok| ok == v)
            }
            _ => true,
        }
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn reset_changed(&mut self) {
        self.changed = false;
    }

    /// Flags the property as unsaved without touching its value, for entries
    /// that exist in memory but not on disk.
    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Takes a value read from disk; the property then matches the file.
    pub(crate) fn load_value(&mut self, value: PropertyValue) {
        self.value = value;
        self.changed = false;
    }

    /// The `[range: .., default: ..]` / `[valid: ..]` hint written after the
    /// comment when the file is saved.
    pub(crate) fn hint(&self) -> String {
        let mut hint = match self.range {
            Some(r) => format!("[range: {} ~ {}, default: {}]", r.min, r.max, self.default),
            None => format!("[default: {}]", self.default),
        };
        if !self.valid_values.is_empty() {
            hint.push_str(&format!(" [valid: {}]", self.valid_values.join(", ")));
        }
        hint
    }
}
