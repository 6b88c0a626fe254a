//! Axis containers - named, ordered collections of configuration values.
//!
//! Each axis (platforms, build types, flavors, tool chains) is a
//! [`NamedContainer`]. Containers start empty; the default rules only add
//! values to containers that are still empty when they run.

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::errors::ModelError;

/// Build types added when none are declared.
pub const DEFAULT_BUILD_TYPES: [&str; 2] = ["debug", "release"];

/// Flavor added when none is declared.
pub const DEFAULT_FLAVOR: &str = "default";

/// A value with a unique name inside its container.
pub trait Named {
    /// What the value is called in messages (e.g. "platform").
    const KIND: &'static str;

    fn name(&self) -> &str;
}

/// An ordered collection of uniquely named values.
///
/// Names are unique; the first value added under a name is kept and later
/// additions fail.
#[derive(Debug, Clone)]
pub struct NamedContainer<T> {
    values: IndexMap<String, T>,
}

impl<T> Default for NamedContainer<T> {
    fn default() -> Self {
        NamedContainer {
            values: IndexMap::new(),
        }
    }
}

impl<T: Named> NamedContainer<T> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. Fails if a value with the same name exists.
    pub fn add(&mut self, value: T) -> Result<&mut T, ModelError> {
        let name = value.name().to_string();
        if self.values.contains_key(&name) {
            return Err(ModelError::DuplicateRegistration {
                name,
                kind: T::KIND.to_string(),
            });
        }
        let entry = self.values.entry(name).or_insert(value);
        Ok(entry)
    }

    /// Get a value by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.values.get(name)
    }

    /// Get a mutable value by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.values.get_mut(name)
    }

    /// Check if a value with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.values()
    }

    /// Value names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Get the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the container is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a NamedContainer<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.values()
    }
}

/// A build type such as `debug` or `release`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildType {
    name: String,
}

impl BuildType {
    pub fn new(name: impl Into<String>) -> Self {
        BuildType { name: name.into() }
    }
}

impl Named for BuildType {
    const KIND: &'static str = "build type";

    fn name(&self) -> &str {
        &self.name
    }
}

/// A product flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavor {
    name: String,
}

impl Flavor {
    pub fn new(name: impl Into<String>) -> Self {
        Flavor { name: name.into() }
    }
}

impl Named for Flavor {
    const KIND: &'static str = "flavor";

    fn name(&self) -> &str {
        &self.name
    }
}

pub type BuildTypeContainer = NamedContainer<BuildType>;
pub type FlavorContainer = NamedContainer<Flavor>;
