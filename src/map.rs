//! String-keyed map container for [`Variant::Map`](crate::Variant::Map).
//!
//! This module provides [`VariantMap`], a wrapper around [`IndexMap`]. Keys are
//! unique and re-inserting a key replaces its value. Callers must not rely on
//! traversal order, but the map iterates in insertion order so serializing
//! the same tree twice yields identical output.
//!
//! ## Examples
//!
//! ```rust
//! use variant_codec::{Variant, VariantMap};
//!
//! let mut map = VariantMap::new();
//! map.put("name", "Alice").unwrap().put("age", 30).unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::{Error, Result, Variant};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A map of string keys to variants.
///
/// # Examples
///
/// ```rust
/// use variant_codec::{Variant, VariantMap};
///
/// let mut map = VariantMap::new();
/// map.insert("key".to_string(), Variant::from(1)).unwrap();
/// let old = map.insert("key".to_string(), Variant::from(2)).unwrap();
/// assert_eq!(old, Some(Variant::from(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariantMap {
    entries: IndexMap<String, Variant>,
    read_only: bool,
}

impl VariantMap {
    /// Creates an empty, mutable `VariantMap`.
    #[must_use]
    pub fn new() -> Self {
        VariantMap {
            entries: IndexMap::new(),
            read_only: false,
        }
    }

    /// Creates an empty `VariantMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        VariantMap {
            entries: IndexMap::with_capacity(capacity),
            read_only: false,
        }
    }

    pub(crate) fn frozen() -> Self {
        VariantMap {
            entries: IndexMap::new(),
            read_only: true,
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Inserts a key-value pair and returns the map for chaining.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Variant>) -> Result<&mut Self> {
        self.check_writable()?;
        self.entries.insert(key.into(), value.into());
        Ok(self)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    pub fn insert(&mut self, key: String, value: Variant) -> Result<Option<Variant>> {
        self.check_writable()?;
        Ok(self.entries.insert(key, value))
    }

    /// Removes a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Result<Option<Variant>> {
        self.check_writable()?;
        Ok(self.entries.shift_remove(key))
    }

    /// Removes every entry.
    pub fn clear(&mut self) -> Result<()> {
        self.check_writable()?;
        self.entries.clear();
        Ok(())
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.entries.get(key)
    }

    /// Returns the value for `key`, or `default` when the key is absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Variant) -> &'a Variant {
        self.entries.get(key).unwrap_or(default)
    }

    /// Returns the value for `key`, failing with [`Error::KeyNotFound`] when absent.
    pub fn require(&self, key: &str) -> Result<&Variant> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Variant>> {
        self.check_writable()?;
        Ok(self.entries.get_mut(key))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if this map rejects mutation.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Variant> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Variant> {
        self.entries.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Variant> {
        self.entries.iter()
    }

    /// Walks nested maps along `path`, split on `sep`.
    ///
    /// Returns `None` when a segment is missing or an intermediate value is
    /// not a map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::variant;
    ///
    /// let tree = variant!({ "a": { "b": { "c": 7 } } });
    /// let map = tree.to_map().unwrap();
    /// assert_eq!(map.resolve_path("a.b.c", '.'), Some(&variant!(7)));
    /// assert_eq!(map.resolve_path("a.x", '.'), None);
    /// ```
    #[must_use]
    pub fn resolve_path(&self, path: &str, sep: char) -> Option<&Variant> {
        let mut parts = path.split(sep);
        let first = parts.next()?;
        let mut current = self.entries.get(first)?;
        for part in parts {
            match current {
                Variant::Map(map) => current = map.entries.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Sets (or with `None`, removes) the value at a `.`-separated path.
    ///
    /// Intermediate segments that are missing or not maps are replaced by
    /// empty maps.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use variant_codec::{Variant, VariantMap};
    ///
    /// let mut map = VariantMap::new();
    /// map.update_path("server.port", Some(Variant::from(8080))).unwrap();
    /// assert_eq!(map.resolve_path("server.port", '.'), Some(&Variant::from(8080)));
    ///
    /// map.update_path("server.port", None).unwrap();
    /// assert_eq!(map.resolve_path("server.port", '.'), None);
    /// ```
    pub fn update_path(&mut self, path: &str, value: Option<Variant>) -> Result<()> {
        let parts: Vec<&str> = path.split('.').collect();
        self.update_parts(&parts, value)
    }

    fn update_parts(&mut self, parts: &[&str], value: Option<Variant>) -> Result<()> {
        self.check_writable()?;
        match parts {
            [] => Ok(()),
            [last] => {
                match value {
                    Some(v) => {
                        self.entries.insert((*last).to_string(), v);
                    }
                    None => {
                        self.entries.shift_remove(*last);
                    }
                }
                Ok(())
            }
            [head, rest @ ..] => {
                let slot = self
                    .entries
                    .entry((*head).to_string())
                    .or_insert_with(|| Variant::Map(VariantMap::new()));
                if !matches!(slot, Variant::Map(_)) {
                    *slot = Variant::Map(VariantMap::new());
                }
                match slot {
                    Variant::Map(child) => child.update_parts(rest, value),
                    _ => Ok(()),
                }
            }
        }
    }
}

/// Map equality: same key set and pairwise equal values, in any order.
impl PartialEq for VariantMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl From<HashMap<String, Variant>> for VariantMap {
    fn from(map: HashMap<String, Variant>) -> Self {
        map.into_iter().collect()
    }
}

impl From<VariantMap> for HashMap<String, Variant> {
    fn from(map: VariantMap) -> Self {
        map.entries.into_iter().collect()
    }
}

impl IntoIterator for VariantMap {
    type Item = (String, Variant);
    type IntoIter = indexmap::map::IntoIter<String, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariantMap {
    type Item = (&'a String, &'a Variant);
    type IntoIter = indexmap::map::Iter<'a, String, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Variant)> for VariantMap {
    fn from_iter<T: IntoIterator<Item = (String, Variant)>>(iter: T) -> Self {
        VariantMap {
            entries: IndexMap::from_iter(iter),
            read_only: false,
        }
    }
}
