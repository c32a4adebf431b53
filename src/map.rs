//! Ordered map type for tag blocks and nested maps.
//!
//! [`TagMap`] wraps an [`IndexMap`] so that maps keep the order their entries
//! were written in. Nested maps are serialized in insertion order; only the
//! top level of the canonical block is sorted (see [`crate::ser::canonicalize`]).
//!
//! Equality is order-insensitive, like [`IndexMap`]'s: two maps are equal when
//! they hold the same keys with equal values.
//!
//! ## Examples
//!
//! ```rust
//! use tagstring::{TagMap, TagValue};
//!
//! let mut map = TagMap::new();
//! map.insert("title".to_string(), TagValue::from("Holiday"));
//! map.insert("year".to_string(), TagValue::from("2024"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("title").and_then(|v| v.as_str()), Some("Holiday"));
//! ```

use crate::TagValue;
use indexmap::IndexMap;

/// An insertion-ordered map of string keys to tag values.
///
/// # Examples
///
/// ```rust
/// use tagstring::{TagMap, TagValue};
///
/// let mut map = TagMap::new();
/// map.insert("b".to_string(), TagValue::from("2"));
/// map.insert("a".to_string(), TagValue::from("1"));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagMap(IndexMap<String, TagValue>);

impl TagMap {
    /// Creates an empty `TagMap`.
    #[must_use]
    pub fn new() -> Self {
        TagMap(IndexMap::new())
    }

    /// Creates an empty `TagMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TagMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// (the entry keeps its original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagstring::{TagMap, TagValue};
    ///
    /// let mut map = TagMap::new();
    /// assert!(map.insert("key".to_string(), TagValue::from("x")).is_none());
    /// assert_eq!(
    ///     map.insert("key".to_string(), TagValue::from("y")),
    ///     Some(TagValue::from("x"))
    /// );
    /// ```
    pub fn insert(&mut self, key: String, value: TagValue) -> Option<TagValue> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TagValue> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<TagValue> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorts the entries by key, lexicographically.
    pub fn sort_keys(&mut self) {
        self.0.sort_keys();
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, TagValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, TagValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, TagValue> {
        self.0.iter()
    }
}

impl IntoIterator for TagMap {
    type Item = (String, TagValue);
    type IntoIter = indexmap::map::IntoIter<String, TagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagMap {
    type Item = (&'a String, &'a TagValue);
    type IntoIter = indexmap::map::Iter<'a, String, TagValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, TagValue)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (String, TagValue)>>(iter: T) -> Self {
        TagMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, TagValue)> for TagMap {
    fn extend<T: IntoIterator<Item = (String, TagValue)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
