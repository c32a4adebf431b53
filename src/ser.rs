//! TagString encoding.
//!
//! ## Overview
//!
//! [`canonicalize`] merges a [`TagSequence`] into one block:
//!
//! - every block's entries are unioned; a key seen twice is an error
//! - every text item is appended, in order, to a list under the reserved key `""`
//! - the top-level keys are sorted, so `""` always comes first
//!
//! The [`Serializer`] then writes `#key=value#key=value##`, escaping every
//! key and string through [`crate::escape`]. Nested maps keep their
//! insertion order.
//!
//! [`join`] is the older, non-merging form: text is written verbatim and every
//! block is written on its own.
//!
//! ## Usage
//!
//! ```rust
//! use tagstring::{encode, TagItem, TagSequence, TagValue};
//!
//! let seq = TagSequence::from(vec![
//!     TagItem::Block([("b".to_string(), TagValue::from("2"))].into_iter().collect()),
//!     TagItem::Block([("a".to_string(), TagValue::from("1"))].into_iter().collect()),
//!     TagItem::Text("hello".to_string()),
//! ]);
//! assert_eq!(encode(&seq).unwrap(), "#=[hello]#a=1#b=2##");
//! ```
//!
//! The [`TagValueSerializer`] converts any `T: Serialize` into a [`TagValue`];
//! see [`crate::to_value`].

use crate::escape::escape_char_into;
use crate::{Error, Result, TagItem, TagMap, TagOptions, TagSequence, TagValue};
use serde::{ser, Serialize};

/// Merges a sequence into the single, key-sorted canonical block.
///
/// # Errors
///
/// Returns [`Error::DuplicateKey`] when two blocks share a key, or when a
/// block uses the reserved key `""` and the sequence also holds text.
///
/// # Examples
///
/// ```rust
/// use tagstring::{decode, ser::canonicalize, TagValue};
///
/// let merged = canonicalize(&decode("b#y=2##a#x=1##")).unwrap();
/// let keys: Vec<_> = merged.keys().map(String::as_str).collect();
/// assert_eq!(keys, vec!["", "x", "y"]);
/// assert_eq!(merged.get(""), Some(&TagValue::from(vec!["b", "a"])));
/// ```
pub fn canonicalize(sequence: &TagSequence) -> Result<TagMap> {
    let mut merged = TagMap::new();
    let mut texts = Vec::new();
    let mut blocks = 0usize;

    for item in sequence {
        match item {
            TagItem::Text(text) => {
                if merged.contains_key("") {
                    return Err(Error::duplicate_key(""));
                }
                texts.push(TagValue::Str(text.clone()));
            }
            TagItem::Block(block) => {
                blocks += 1;
                for (key, value) in block {
                    if merged.contains_key(key) || (key.is_empty() && !texts.is_empty()) {
                        return Err(Error::duplicate_key(key));
                    }
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }

    tracing::debug!(blocks, texts = texts.len(), "merged tag sequence");
    if !texts.is_empty() {
        merged.insert(String::new(), TagValue::List(texts));
    }
    merged.sort_keys();
    Ok(merged)
}

/// Writes blocks and text into a TagString.
///
/// # Examples
///
/// ```rust
/// use tagstring::{Serializer, TagMap, TagOptions, TagValue};
///
/// let mut block = TagMap::new();
/// block.insert("k".to_string(), TagValue::from("a.b"));
///
/// let mut serializer = Serializer::new(TagOptions::new().with_escape_dots(true));
/// serializer.write_block(&block);
/// assert_eq!(serializer.into_inner(), "#k=a`x2eb##");
/// ```
pub struct Serializer {
    output: String,
    options: TagOptions,
}

impl Serializer {
    pub fn new(options: TagOptions) -> Self {
        Serializer {
            output: String::with_capacity(64),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes `#key=value#...##`. An empty block writes nothing, since `###`
    /// would not read back as a block.
    pub fn write_block(&mut self, block: &TagMap) {
        if block.is_empty() {
            return;
        }
        for (key, value) in block {
            self.output.push('#');
            write_escaped(&mut self.output, key, self.options.escape_dots);
            self.output.push('=');
            write_value(&mut self.output, value, self.options.escape_dots);
        }
        self.output.push_str("##");
    }

    /// Writes literal text unchanged.
    pub fn write_text(&mut self, text: &str) {
        self.output.push_str(text);
    }
}

#[inline]
fn write_escaped(out: &mut String, s: &str, escape_dots: bool) {
    for ch in s.chars() {
        escape_char_into(out, ch, escape_dots);
    }
}

pub(crate) fn write_value(out: &mut String, value: &TagValue, escape_dots: bool) {
    match value {
        TagValue::Str(s) => write_escaped(out, s, escape_dots),
        TagValue::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, escape_dots);
            }
            out.push(']');
        }
        TagValue::Map(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_escaped(out, key, escape_dots);
                out.push('=');
                write_value(out, item, escape_dots);
            }
            out.push('}');
        }
    }
}

/// Canonicalizes and encodes a sequence.
///
/// # Errors
///
/// See [`canonicalize`]. Also returns [`Error::UnsupportedValue`] when a value
/// is nested deeper than [`TagOptions::max_depth`], since the decoder would
/// read it back as text.
pub fn encode_with_options(sequence: &TagSequence, options: &TagOptions) -> Result<String> {
    let merged = canonicalize(sequence)?;
    for (key, value) in &merged {
        let depth = value.depth();
        if depth > options.max_depth {
            return Err(Error::unsupported_value(&format!(
                "value of {:?} nested {} deep, limit is {}",
                key, depth, options.max_depth
            )));
        }
    }
    let mut serializer = Serializer::new(options.clone());
    serializer.write_block(&merged);
    Ok(serializer.into_inner())
}

/// Writes each item as it is: text verbatim, each block separately with its
/// keys in insertion order. Nothing is merged, so this cannot fail.
///
/// # Examples
///
/// ```rust
/// use tagstring::{decode, join};
///
/// let stem = "b#y=2#x=1##a";
/// assert_eq!(join(&decode(stem)), stem);
/// ```
#[must_use]
pub fn join(sequence: &TagSequence) -> String {
    let mut serializer = Serializer::new(TagOptions::default());
    for item in sequence {
        match item {
            TagItem::Text(text) => serializer.write_text(text),
            TagItem::Block(block) => serializer.write_block(block),
        }
    }
    serializer.into_inner()
}

/// Serializer producing a [`TagValue`] from any `T: Serialize`.
///
/// Strings, characters, booleans and numbers become [`TagValue::Str`];
/// sequences and tuples become lists; maps and structs become maps. Values
/// with no textual form (`None`, `()`, bytes, data-carrying enum variants) are
/// rejected with [`Error::UnsupportedValue`].
pub struct TagValueSerializer;

pub struct SerializeVec {
    vec: Vec<TagValue>,
}

pub struct SerializeMap {
    map: TagMap,
    current_key: Option<String>,
}

impl ser::Serializer for TagValueSerializer {
    type Ok = TagValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<TagValue, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<TagValue, Error>;

    fn serialize_bool(self, v: bool) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_i16(self, v: i16) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_i32(self, v: i32) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_i64(self, v: i64) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_u16(self, v: u16) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_u32(self, v: u32) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_u64(self, v: u64) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<TagValue> {
        Ok(TagValue::Str(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<TagValue> {
        Err(Error::unsupported_value("bytes"))
    }

    fn serialize_none(self) -> Result<TagValue> {
        Err(Error::unsupported_value("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<TagValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<TagValue> {
        Err(Error::unsupported_value("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<TagValue> {
        Err(Error::unsupported_value(&format!("unit struct {}", name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<TagValue> {
        Ok(TagValue::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<TagValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<TagValue>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_value(&format!("newtype variant {}", variant)))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_value(&format!("tuple variant {}", variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_value(&format!("struct variant {}", variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: TagMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = TagValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TagValue> {
        Ok(TagValue::List(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = TagValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TagValue> {
        Ok(TagValue::List(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = TagValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_tag_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TagValue> {
        Ok(TagValue::List(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = TagValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_tag_value(key)? {
            TagValue::Str(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::unsupported_value("map key that is not a string")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_tag_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TagValue> {
        Ok(TagValue::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = TagValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_tag_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<TagValue> {
        Ok(TagValue::Map(self.map))
    }
}

fn to_tag_value<T: Serialize + ?Sized>(value: &T) -> Result<TagValue> {
    value.serialize(TagValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(pairs: &[(&str, TagValue)]) -> TagItem {
        TagItem::Block(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[test]
    fn test_canonicalize_collects_text_in_order() {
        let seq = TagSequence::from(vec![
            TagItem::Text("one".to_string()),
            block(&[("k", TagValue::from("v"))]),
            TagItem::Text("two".to_string()),
        ]);
        let merged = canonicalize(&seq).unwrap();
        assert_eq!(merged.get(""), Some(&TagValue::from(vec!["one", "two"])));
        assert_eq!(merged.keys().next().map(String::as_str), Some(""));
    }

    #[test]
    fn test_reserved_key_conflicts() {
        let explicit = block(&[("", TagValue::from(vec!["x"]))]);
        let text = TagItem::Text("t".to_string());

        let seq = TagSequence::from(vec![explicit.clone(), text.clone()]);
        assert_eq!(canonicalize(&seq), Err(Error::DuplicateKey(String::new())));

        let seq = TagSequence::from(vec![text, explicit.clone()]);
        assert_eq!(canonicalize(&seq), Err(Error::DuplicateKey(String::new())));

        let seq = TagSequence::from(vec![explicit]);
        assert!(canonicalize(&seq).is_ok());
    }

    #[test]
    fn test_nested_map_keeps_insertion_order() {
        let inner: TagMap = vec![
            ("z".to_string(), TagValue::from("1")),
            ("a".to_string(), TagValue::from("2")),
        ]
        .into_iter()
        .collect();
        let seq = TagSequence::from(vec![block(&[("m", TagValue::Map(inner))])]);
        assert_eq!(
            encode_with_options(&seq, &TagOptions::default()).unwrap(),
            "#m={z=1,a=2}##"
        );
    }

    #[test]
    fn test_depth_limit_applies_to_encoding() {
        let mut value = TagValue::from("x");
        for _ in 0..3 {
            value = TagValue::List(vec![value]);
        }
        let seq = TagSequence::from(vec![block(&[("a", value)])]);

        let options = TagOptions::new().with_max_depth(3);
        assert_eq!(encode_with_options(&seq, &options).unwrap(), "#a=[[[x]]]##");

        let options = TagOptions::new().with_max_depth(2);
        assert!(matches!(
            encode_with_options(&seq, &options),
            Err(Error::UnsupportedValue(_))
        ));
    }

    #[test]
    fn test_empty_sequence_encodes_to_nothing() {
        assert_eq!(
            encode_with_options(&TagSequence::new(), &TagOptions::default()).unwrap(),
            ""
        );
    }

    #[test]
    fn test_escapes_keys_and_values() {
        let seq = TagSequence::from(vec![block(&[("a=b", TagValue::from("c:d\n"))])]);
        assert_eq!(
            encode_with_options(&seq, &TagOptions::default()).unwrap(),
            "#a`=b=c`x3ad`n##"
        );
    }

    #[test]
    fn test_join_keeps_blocks_apart() {
        let seq = TagSequence::from(vec![
            block(&[("b", TagValue::from("2"))]),
            TagItem::Text("mid".to_string()),
            block(&[("b", TagValue::from("3"))]),
        ]);
        assert_eq!(join(&seq), "#b=2##mid#b=3##");
    }

    #[test]
    fn test_value_serializer_rejects_none() {
        assert_eq!(
            to_tag_value(&Option::<String>::None),
            Err(Error::UnsupportedValue("none".to_string()))
        );
        assert_eq!(to_tag_value(&Some(5u8)), Ok(TagValue::from("5")));
    }
}
