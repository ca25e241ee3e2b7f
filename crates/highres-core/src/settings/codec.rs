//! Text codec for the backing settings file.
//!
//! File format (TOML with generated comments):
//! ```text
//! # Configuration file
//!
//! "~CONFIG_VERSION" = "1.0"
//!
//! # Screenshot output settings.
//! [general]
//!     # The width of the screenshot to take.
//!     # [range: 640 ~ 15360, default: 1280]
//!     screenshotWidth = 1280
//! ```
//!
//! Every category is a table and every property a key inside it.  Comment
//! lines are regenerated from property metadata on each save and ignored on
//! load.  Values that do not map onto a [`PropertyValue`] (dates, nested
//! tables, mixed arrays) are skipped with a warning rather than failing the
//! whole file.

use tracing::warn;

use crate::settings::category::Category;
use crate::settings::property::{Property, PropertyValue};

/// Top-level key holding the config version marker.
pub const VERSION_KEY: &str = "~CONFIG_VERSION";

const INDENT: &str = "    ";

/// The result of parsing a settings file.
#[derive(Debug, Default)]
pub struct ParsedSettings {
    /// The version marker, if the file had one.
    pub version: Option<String>,
    /// Categories in file order, holding properties without metadata.
    pub categories: Vec<Category>,
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Renders `categories` as settings file text.
///
/// # Errors
///
/// Returns [`toml::ser::Error`] if a value cannot be represented in TOML
/// (for example a non-finite double).
pub fn render<'a>(
    version: Option<&str>,
    categories: impl IntoIterator<Item = &'a Category>,
) -> Result<String, toml::ser::Error> {
    let mut out = String::from("# Configuration file\n");

    if let Some(version) = version {
        out.push_str(&format!("\n{} = {}\n", render_key(VERSION_KEY), quoted(version)));
    }

    for category in categories {
        out.push('\n');
        if let Some(comment) = category.comment() {
            push_comment(&mut out, "", comment);
        }
        out.push_str(&format!("[{}]\n", render_key(category.name())));

        for (i, property) in category.properties().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_property(&mut out, property)?;
        }
    }

    Ok(out)
}

fn render_property(out: &mut String, property: &Property) -> Result<(), toml::ser::Error> {
    if let Some(comment) = property.comment() {
        push_comment(out, INDENT, comment);
    }
    push_comment(out, INDENT, &property.hint());

    let value = toml::Value::try_from(property.value())?;
    out.push_str(&format!("{INDENT}{} = {value}\n", render_key(property.name())));
    Ok(())
}

fn push_comment(out: &mut String, indent: &str, comment: &str) {
    for line in comment.lines() {
        out.push_str(&format!("{indent}# {line}\n"));
    }
}

/// Writes `key` bare when TOML allows it, quoted otherwise.
fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        quoted(key)
    }
}

fn quoted(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Parses settings file text.
///
/// # Errors
///
/// Returns [`toml::de::Error`] if the text is not valid TOML.
pub fn parse(text: &str) -> Result<ParsedSettings, toml::de::Error> {
    let table: toml::Table = toml::from_str(text)?;
    let mut parsed = ParsedSettings::default();

    for (key, value) in table {
        match value {
            toml::Value::String(version) if key == VERSION_KEY => {
                parsed.version = Some(version);
            }
            toml::Value::Table(entries) => {
                parsed.categories.push(parse_category(key, entries));
            }
            _ => warn!("ignoring top-level settings key {key:?} outside any category"),
        }
    }

    Ok(parsed)
}

fn parse_category(name: String, entries: toml::Table) -> Category {
    let mut category = Category::new(name);
    for (key, value) in entries {
        match property_value(&value) {
            Some(v) => {
                category.insert(Property::new(key, v));
            }
            None => warn!(
                "ignoring settings key {key:?} in category {:?}: unsupported value",
                category.name()
            ),
        }
    }
    category
}

/// Maps a TOML value onto a [`PropertyValue`], or `None` if it has no
/// equivalent.
fn property_value(value: &toml::Value) -> Option<PropertyValue> {
    use toml::Value;

    match value {
        Value::Boolean(v) => Some(PropertyValue::Boolean(*v)),
        Value::Integer(v) => Some(PropertyValue::Integer(*v)),
        Value::Float(v) => Some(PropertyValue::Double(*v)),
        Value::String(v) => Some(PropertyValue::String(v.clone())),
        Value::Array(items) => list_value(items),
        Value::Datetime(_) | Value::Table(_) => None,
    }
}

fn list_value(items: &[toml::Value]) -> Option<PropertyValue> {
    use toml::Value;

    let Some(first) = items.first() else {
        return Some(PropertyValue::StringList(Vec::new()));
    };

    match first {
        Value::Boolean(_) => items
            .iter()
            .map(Value::as_bool)
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::BooleanList),
        Value::Integer(_) => items
            .iter()
            .map(Value::as_integer)
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::IntegerList),
        Value::Float(_) => items
            .iter()
            .map(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::DoubleList),
        Value::String(_) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(PropertyValue::StringList),
        _ => None,
    }
}
