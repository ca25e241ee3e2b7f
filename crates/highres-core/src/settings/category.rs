//! A named group of properties inside the settings file.

use std::collections::BTreeMap;

use crate::settings::property::Property;

/// A named group of properties with an optional comment.
///
/// Properties are kept in a `BTreeMap` so the saved file lists them in a
/// stable order; the on-disk format itself is not order-significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    name: String,
    comment: Option<String>,
    properties: BTreeMap<String, Property>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.get_mut(name)
    }

    /// Inserts `property` under its own name, returning the property it
    /// replaced, if any.
    pub fn insert(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property.name().to_string(), property)
    }

    /// Returns the named property, inserting the one built by `make` first
    /// if it is missing.
    pub fn get_or_insert_with(
        &mut self,
        name: &str,
        make: impl FnOnce() -> Property,
    ) -> &mut Property {
        self.properties.entry(name.to_string()).or_insert_with(make)
    }

    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.properties.remove(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns `true` if any property in this category has an unsaved change.
    pub fn has_changed(&self) -> bool {
        self.properties.values().any(Property::has_changed)
    }

    pub(crate) fn reset_changed(&mut self) {
        self.properties.values_mut().for_each(Property::reset_changed);
    }

    pub(crate) fn mark_changed(&mut self) {
        self.properties.values_mut().for_each(Property::mark_changed);
    }
}
