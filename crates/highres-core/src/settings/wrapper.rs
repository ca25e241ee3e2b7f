//! A thin convenience layer over [`SettingsFile`].
//!
//! Every operation comes in two forms:
//!
//! - `try_*` is total: it never fails and reports "could not do it" through
//!   an `Option` or `bool` return.
//! - The plain form calls the `try_*` variant and turns its refusal into a
//!   [`WrapperError`] naming what was missing or already present.
//!
//! Callers that treat absence as normal use `try_*`; callers for which it
//! indicates a bug use the plain form and propagate with `?`.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::settings::category::Category;
use crate::settings::file::{SettingsError, SettingsFile};
use crate::settings::property::{Property, PropertyValue};

/// Precondition failures raised by the non-`try_` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WrapperError {
    /// A category with this name is already present.
    #[error("settings category already exists: {0}")]
    CategoryAlreadyExists(String),

    /// No category with this name exists.
    #[error("settings category not found: {0}")]
    CategoryNotFound(String),

    /// The category already holds a property with this name.
    #[error("settings property already exists: {category}.{name}")]
    PropertyAlreadyExists { category: String, name: String },
}

/// Wraps a [`SettingsFile`] with paired total/partial category and property
/// operations.
#[derive(Debug)]
pub struct SettingsWrapper {
    settings: SettingsFile,
}

impl SettingsWrapper {
    /// Creates a wrapper around a new, case-insensitive settings file.
    pub fn new(path: impl Into<PathBuf>, version: &str) -> Self {
        Self::from_settings(SettingsFile::new(path, Some(version)))
    }

    /// Creates a wrapper around a new settings file with explicit category
    /// case sensitivity.
    pub fn with_case_sensitivity(
        path: impl Into<PathBuf>,
        version: &str,
        case_sensitive_categories: bool,
    ) -> Self {
        Self::from_settings(
            SettingsFile::new(path, Some(version))
                .with_case_sensitive_categories(case_sensitive_categories),
        )
    }

    pub fn from_settings(settings: SettingsFile) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SettingsFile {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsFile {
        &mut self.settings
    }

    /// Unwraps the settings file, e.g. to hand it to the configuration facade.
    pub fn into_inner(self) -> SettingsFile {
        self.settings
    }

    /// See [`SettingsFile::load`].
    pub fn load(&mut self) -> Result<(), SettingsError> {
        self.settings.load()
    }

    /// See [`SettingsFile::save`].
    pub fn save(&mut self) -> Result<(), SettingsError> {
        self.settings.save()
    }

    // ── Categories ────────────────────────────────────────────────────────────

    pub fn has_category(&self, name: &str) -> bool {
        self.settings.has_category(name)
    }

    /// Adds a category, returning `None` if one with this name already exists.
    pub fn try_add_category(&mut self, name: &str, comment: Option<&str>) -> Option<&mut Category> {
        if self.has_category(name) {
            return None;
        }
        debug!("adding settings category {name:?}");
        let category = self.settings.get_category(name);
        if let Some(comment) = comment {
            category.set_comment(comment);
        }
        Some(category)
    }

    /// Adds a category.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryAlreadyExists`] if the name is taken.
    pub fn add_category(
        &mut self,
        name: &str,
        comment: Option<&str>,
    ) -> Result<&mut Category, WrapperError> {
        self.try_add_category(name, comment)
            .ok_or_else(|| WrapperError::CategoryAlreadyExists(name.to_string()))
    }

    /// Removes a category, returning `false` if it does not exist.
    pub fn try_remove_category(&mut self, name: &str) -> bool {
        self.settings.remove_category(name).is_some()
    }

    /// Removes a category.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] if it does not exist.
    pub fn remove_category(&mut self, name: &str) -> Result<(), WrapperError> {
        if self.try_remove_category(name) {
            Ok(())
        } else {
            Err(WrapperError::CategoryNotFound(name.to_string()))
        }
    }

    pub fn try_get_category(&self, name: &str) -> Option<&Category> {
        self.settings.category(name)
    }

    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] if it does not exist.
    pub fn get_category(&self, name: &str) -> Result<&Category, WrapperError> {
        self.try_get_category(name)
            .ok_or_else(|| WrapperError::CategoryNotFound(name.to_string()))
    }

    pub fn try_get_category_mut(&mut self, name: &str) -> Option<&mut Category> {
        self.settings.category_mut(name)
    }

    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] if it does not exist.
    pub fn get_category_mut(&mut self, name: &str) -> Result<&mut Category, WrapperError> {
        self.try_get_category_mut(name)
            .ok_or_else(|| WrapperError::CategoryNotFound(name.to_string()))
    }

    /// Sets a category's comment, returning `false` if it does not exist.
    pub fn try_set_category_comment(&mut self, name: &str, comment: &str) -> bool {
        match self.try_get_category_mut(name) {
            Some(category) => {
                category.set_comment(comment);
                true
            }
            None => false,
        }
    }

    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] if it does not exist.
    pub fn set_category_comment(&mut self, name: &str, comment: &str) -> Result<(), WrapperError> {
        if self.try_set_category_comment(name, comment) {
            Ok(())
        } else {
            Err(WrapperError::CategoryNotFound(name.to_string()))
        }
    }

    // ── Properties ────────────────────────────────────────────────────────────

    /// Returns `true` if `category` exists and holds a property `name`.
    pub fn has_property(&self, category: &str, name: &str) -> bool {
        self.try_get_category(category)
            .map_or(false, |c| c.contains_key(name))
    }

    /// Adds a boolean property, returning `None` if the category is missing
    /// or already holds a property with this name.
    pub fn try_add_boolean_property(
        &mut self,
        category: &str,
        name: &str,
        default: bool,
        lang_key: Option<&str>,
        comment: Option<&str>,
    ) -> Option<&mut Property> {
        self.try_add_property(category, name, PropertyValue::Boolean(default), lang_key, comment)
    }

    /// Adds a boolean list property, returning `None` if the category is
    /// missing or already holds a property with this name.
    pub fn try_add_boolean_list_property(
        &mut self,
        category: &str,
        name: &str,
        defaults: &[bool],
        lang_key: Option<&str>,
        comment: Option<&str>,
    ) -> Option<&mut Property> {
        self.try_add_property(
            category,
            name,
            PropertyValue::BooleanList(defaults.to_vec()),
            lang_key,
            comment,
        )
    }

    /// Adds a boolean property.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] or
    /// [`WrapperError::PropertyAlreadyExists`].
    pub fn add_boolean_property(
        &mut self,
        category: &str,
        name: &str,
        default: bool,
        lang_key: Option<&str>,
        comment: Option<&str>,
    ) -> Result<&mut Property, WrapperError> {
        self.check_can_add(category, name)?;
        self.try_add_boolean_property(category, name, default, lang_key, comment)
            .ok_or_else(|| already_exists(category, name))
    }

    /// Adds a boolean list property.
    ///
    /// # Errors
    ///
    /// Returns [`WrapperError::CategoryNotFound`] or
    /// [`WrapperError::PropertyAlreadyExists`].
    pub fn add_boolean_list_property(
        &mut self,
        category: &str,
        name: &str,
        defaults: &[bool],
        lang_key: Option<&str>,
        comment: Option<&str>,
    ) -> Result<&mut Property, WrapperError> {
        self.check_can_add(category, name)?;
        self.try_add_boolean_list_property(category, name, defaults, lang_key, comment)
            .ok_or_else(|| already_exists(category, name))
    }

    fn check_can_add(&self, category: &str, name: &str) -> Result<(), WrapperError> {
        let category_ref = self.get_category(category)?;
        if category_ref.contains_key(name) {
            return Err(already_exists(category, name));
        }
        Ok(())
    }

    fn try_add_property(
        &mut self,
        category: &str,
        name: &str,
        default: PropertyValue,
        lang_key: Option<&str>,
        comment: Option<&str>,
    ) -> Option<&mut Property> {
        if self.has_property(category, name) {
            return None;
        }
        let target = self.try_get_category_mut(category)?;

        let mut property = Property::new(name, default);
        if let Some(lang_key) = lang_key {
            property.set_lang_key(lang_key);
        }
        if let Some(comment) = comment {
            property.set_comment(comment);
        }
        property.mark_changed();

        debug!("adding settings property {}.{name}", target.name());
        Some(target.get_or_insert_with(name, || property))
    }
}

fn already_exists(category: &str, name: &str) -> WrapperError {
    WrapperError::PropertyAlreadyExists {
        category: category.to_string(),
        name: name.to_string(),
    }
}
