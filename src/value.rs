//! The tag data model.
//!
//! - [`TagValue`]: a string, a list of values, or a map of string keys to values
//! - [`TagItem`]: one piece of a decoded stem, either literal text or a parsed block
//! - [`TagSequence`]: the ordered items of a stem, as produced by [`crate::decode`]
//!
//! All three are plain values: the decoder creates them, callers read or
//! build them, and the encoder consumes them.
//!
//! ## Examples
//!
//! ```rust
//! use tagstring::{decode, TagItem, TagValue};
//!
//! let seq = decode("holiday#people=[ann,bob]##");
//! assert_eq!(seq.len(), 2);
//!
//! match &seq[1] {
//!     TagItem::Block(block) => {
//!         let people = block.get("people").and_then(TagValue::as_list).unwrap();
//!         assert_eq!(people.len(), 2);
//!     }
//!     TagItem::Text(_) => unreachable!(),
//! }
//! ```

use crate::TagMap;
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

/// A tag value: a string, a list, or a map.
///
/// # Examples
///
/// ```rust
/// use tagstring::TagValue;
///
/// let value = TagValue::from(vec!["a", "b"]);
/// assert!(value.is_list());
/// assert_eq!(value.to_string(), "[a,b]");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagValue {
    Str(String),
    List(Vec<TagValue>),
    Map(TagMap),
}

impl TagValue {
    #[inline]
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, TagValue::Str(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, TagValue::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, TagValue::Map(_))
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagstring::TagValue;
    ///
    /// assert_eq!(TagValue::from("hello").as_str(), Some("hello"));
    /// assert_eq!(TagValue::List(vec![]).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<TagValue>> {
        match self {
            TagValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&TagMap> {
        match self {
            TagValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Nesting depth of the value: 0 for a string, 1 + deepest child otherwise.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            TagValue::Str(_) => 0,
            TagValue::List(items) => 1 + items.iter().map(TagValue::depth).max().unwrap_or(0),
            TagValue::Map(map) => 1 + map.values().map(TagValue::depth).max().unwrap_or(0),
        }
    }
}

/// Writes the value in its escaped TagString form, e.g. `{x=1,y=[a,b]}`.
impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_value(&mut out, self, false);
        f.write_str(&out)
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Str(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Str(value.to_string())
    }
}

impl From<TagMap> for TagValue {
    fn from(value: TagMap) -> Self {
        TagValue::Map(value)
    }
}

impl<T: Into<TagValue>> From<Vec<T>> for TagValue {
    fn from(value: Vec<T>) -> Self {
        TagValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl Serialize for TagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TagValue::Str(s) => serializer.serialize_str(s),
            TagValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TagValue::Map(map) => serialize_map(map, serializer),
        }
    }
}

fn serialize_map<S: Serializer>(map: &TagMap, serializer: S) -> Result<S::Ok, S::Error> {
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (key, value) in map {
        out.serialize_entry(key, value)?;
    }
    out.end()
}

fn visit_tag_map<'de, A: MapAccess<'de>>(mut access: A) -> Result<TagMap, A::Error> {
    let mut map = TagMap::with_capacity(access.size_hint().unwrap_or(0));
    while let Some((key, value)) = access.next_entry::<String, TagValue>()? {
        map.insert(key, value);
    }
    Ok(map)
}

impl<'de> Deserialize<'de> for TagValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TagValueVisitor;

        impl<'de> Visitor<'de> for TagValueVisitor {
            type Value = TagValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, a sequence, or a map with string keys")
            }

            // Scalars become their text, the same way `to_value` treats them.
            fn visit_bool<E>(self, value: bool) -> Result<TagValue, E> {
                Ok(TagValue::Str(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<TagValue, E> {
                Ok(TagValue::Str(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<TagValue, E> {
                Ok(TagValue::Str(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<TagValue, E> {
                Ok(TagValue::Str(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<TagValue, E> {
                Ok(TagValue::Str(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<TagValue, E> {
                Ok(TagValue::Str(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<TagValue, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(TagValue::List(items))
            }

            fn visit_map<A>(self, access: A) -> Result<TagValue, A::Error>
            where
                A: MapAccess<'de>,
            {
                visit_tag_map(access).map(TagValue::Map)
            }
        }

        deserializer.deserialize_any(TagValueVisitor)
    }
}

/// One item of a decoded stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagItem {
    /// Literal text outside any block, kept exactly as written.
    Text(String),
    /// One parsed `#key=value...##` block.
    Block(TagMap),
}

impl TagItem {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagItem::Text(text) => Some(text),
            TagItem::Block(_) => None,
        }
    }

    #[must_use]
    pub fn as_block(&self) -> Option<&TagMap> {
        match self {
            TagItem::Text(_) => None,
            TagItem::Block(block) => Some(block),
        }
    }
}

impl Serialize for TagItem {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TagItem::Text(text) => serializer.serialize_str(text),
            TagItem::Block(block) => serialize_map(block, serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TagItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TagItemVisitor;

        impl<'de> Visitor<'de> for TagItemVisitor {
            type Value = TagItem;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("literal text or a tag block")
            }

            fn visit_str<E>(self, value: &str) -> Result<TagItem, E> {
                Ok(TagItem::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<TagItem, E> {
                Ok(TagItem::Text(value))
            }

            fn visit_map<A>(self, access: A) -> Result<TagItem, A::Error>
            where
                A: MapAccess<'de>,
            {
                visit_tag_map(access).map(TagItem::Block)
            }
        }

        deserializer.deserialize_any(TagItemVisitor)
    }
}

/// The ordered items of a stem.
///
/// Consecutive text is always kept as a single [`TagItem::Text`]: pushing text
/// after text appends to the previous item, and empty text is dropped.
///
/// # Examples
///
/// ```rust
/// use tagstring::{TagItem, TagSequence};
///
/// let mut seq = TagSequence::new();
/// seq.push_text("holiday");
/// seq.push_text(" photos");
/// assert_eq!(seq.as_slice(), &[TagItem::Text("holiday photos".to_string())]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TagSequence(Vec<TagItem>);

impl TagSequence {
    #[must_use]
    pub fn new() -> Self {
        TagSequence(Vec::new())
    }

    pub fn push(&mut self, item: TagItem) {
        match item {
            TagItem::Text(text) => self.push_text(&text),
            TagItem::Block(block) => self.0.push(TagItem::Block(block)),
        }
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(TagItem::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(TagItem::Text(text.to_string()));
        }
    }

    pub fn push_block(&mut self, block: TagMap) {
        self.0.push(TagItem::Block(block));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TagItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<TagItem> {
        self.0
    }

    /// Returns `true` if at least one item is a parsed block.
    #[must_use]
    pub fn has_blocks(&self) -> bool {
        self.0.iter().any(|item| matches!(item, TagItem::Block(_)))
    }

    /// Iterates over the parsed blocks, skipping text.
    pub fn blocks(&self) -> impl Iterator<Item = &TagMap> {
        self.0.iter().filter_map(TagItem::as_block)
    }

    /// Iterates over the literal text items, skipping blocks.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(TagItem::as_text)
    }

    /// Unions every block into one map; on a repeated key the later block wins.
    ///
    /// Unlike [`crate::ser::canonicalize`] this never fails and ignores text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagstring::{decode, TagValue};
    ///
    /// let combined = decode("#a=1##x#a=2#b=3##").combined();
    /// assert_eq!(combined.get("a"), Some(&TagValue::from("2")));
    /// assert_eq!(combined.get("b"), Some(&TagValue::from("3")));
    /// ```
    #[must_use]
    pub fn combined(&self) -> TagMap {
        let mut result = TagMap::new();
        for block in self.blocks() {
            for (key, value) in block {
                result.insert(key.clone(), value.clone());
            }
        }
        result
    }
}

impl Index<usize> for TagSequence {
    type Output = TagItem;

    fn index(&self, index: usize) -> &TagItem {
        &self.0[index]
    }
}

impl From<Vec<TagItem>> for TagSequence {
    fn from(items: Vec<TagItem>) -> Self {
        items.into_iter().collect()
    }
}

impl FromIterator<TagItem> for TagSequence {
    fn from_iter<T: IntoIterator<Item = TagItem>>(iter: T) -> Self {
        let mut seq = TagSequence::new();
        for item in iter {
            seq.push(item);
        }
        seq
    }
}

impl IntoIterator for TagSequence {
    type Item = TagItem;
    type IntoIter = std::vec::IntoIter<TagItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagSequence {
    type Item = &'a TagItem;
    type IntoIter = std::slice::Iter<'a, TagItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for TagSequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in &self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for TagSequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<TagItem>::deserialize(deserializer).map(TagSequence::from)
    }
}
