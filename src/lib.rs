//! # tagstring
//!
//! A codec for TagString, a small language for storing structured tags inside
//! file and directory names.
//!
//! ## What is TagString?
//!
//! A TagString is ordinary text with zero or more embedded *blocks*. A block
//! starts with `#`, holds one or more `key=value` entries separated by `#`, and
//! ends with `##`:
//!
//! ```text
//! holiday#people=[ann,bob]#place={city=Oslo,country=NO}##
//! ```
//!
//! Values are strings, lists (`[a,b]`) or maps (`{k=v,...}`), nested freely.
//! The backtick is the escape leader, so any character can appear in a key or
//! value (see [`escape`]).
//!
//! ## Key Features
//!
//! - **Total decoding**: [`decode`] never fails. Anything that is not a valid
//!   block is kept as literal text.
//! - **Canonical encoding**: [`encode`] merges every block and the literal
//!   text into one block with sorted keys, so equal tag data always gives the
//!   same name.
//! - **File-name safe**: characters that file systems reject are always
//!   escaped.
//! - **Diagnostics**: [`decode_with_diagnostics`] reports recovered spans,
//!   duplicate keys and unknown escapes without changing the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagstring::{decode, encode, TagValue};
//!
//! let seq = decode("b#y=2##a#x=1##");
//! assert_eq!(seq.len(), 4);
//!
//! let canonical = encode(&seq).unwrap();
//! assert_eq!(canonical, "#=[b,a]#x=1#y=2##");
//!
//! let merged = decode(&canonical).combined();
//! assert_eq!(merged.get("x"), Some(&TagValue::from("1")));
//! ```
//!
//! ### From Rust types
//!
//! ```rust
//! use serde::Serialize;
//! use tagstring::to_string;
//!
//! #[derive(Serialize)]
//! struct Photo {
//!     year: u16,
//!     people: Vec<&'static str>,
//! }
//!
//! let photo = Photo { year: 2024, people: vec!["ann", "bob"] };
//! assert_eq!(to_string(&photo).unwrap(), "#people=[ann,bob]#year=2024##");
//! ```
//!
//! ### Paths
//!
//! ```rust
//! use std::path::Path;
//! use tagstring::path::{reformat_as, PathKind};
//!
//! let path = Path::new("trip#b=2#a=1##.jpg");
//! assert_eq!(
//!     reformat_as(path, PathKind::File).unwrap(),
//!     Path::new("#=[trip]#a=1#b=2##.jpg")
//! );
//! ```
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - decoding and encoding a stem
//! - **`canonical.rs`** - merging, legacy join and duplicate keys
//! - **`macro.rs`** - building values with the `tag!` macro
//! - **`rename.rs`** - reformatting file names, with tracing output
//!
//! Run one with: `cargo run --example <name>`

pub mod de;
pub mod diagnostics;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod ser;
pub mod time;
pub mod value;

pub use de::{Decoded, Parser};
pub use diagnostics::{Notice, RecoveryReason};
pub use error::{Error, Result};
pub use map::TagMap;
pub use options::TagOptions;
pub use ser::{canonicalize, encode_with_options, join, Serializer, TagValueSerializer};
pub use value::{TagItem, TagSequence, TagValue};

use serde::Serialize;

/// Decode a stem into a [`TagSequence`].
///
/// Never fails: malformed blocks are kept as literal text.
///
/// # Examples
///
/// ```rust
/// use tagstring::{decode, TagItem};
///
/// assert_eq!(decode("plainfile").as_slice(), &[TagItem::Text("plainfile".to_string())]);
/// assert_eq!(decode("##").as_slice(), &[TagItem::Text("##".to_string())]);
/// ```
#[must_use]
pub fn decode(input: &str) -> TagSequence {
    decode_with_options(input, &TagOptions::default())
}

/// Decode a stem with custom options.
#[must_use]
pub fn decode_with_options(input: &str, options: &TagOptions) -> TagSequence {
    decode_with_diagnostics(input, options).sequence
}

/// Decode a stem and report everything that did not decode cleanly.
///
/// The sequence is the same one [`decode_with_options`] returns.
///
/// # Examples
///
/// ```rust
/// use tagstring::{decode_with_diagnostics, Notice, TagOptions};
///
/// let decoded = decode_with_diagnostics("#a=1#a=2##", &TagOptions::default());
/// assert!(decoded.sequence.has_blocks());
/// assert!(matches!(&decoded.notices[..], [Notice::DuplicateKey { key, .. }] if key == "a"));
/// ```
#[must_use]
pub fn decode_with_diagnostics(input: &str, options: &TagOptions) -> Decoded {
    Parser::new(input, options).parse()
}

/// Encode a sequence in canonical form.
///
/// All blocks are merged into one, literal text is collected in order under
/// the key `""`, and the keys are sorted.
///
/// # Errors
///
/// Returns [`Error::DuplicateKey`] if two blocks share a key.
///
/// # Examples
///
/// ```rust
/// use tagstring::{decode, encode, Error};
///
/// assert_eq!(encode(&decode("#b=2##x#a=1##")).unwrap(), "#=[x]#a=1#b=2##");
/// assert_eq!(
///     encode(&decode("#a=1##-#a=2##")),
///     Err(Error::DuplicateKey("a".to_string()))
/// );
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(sequence: &TagSequence) -> Result<String> {
    encode_with_options(sequence, &TagOptions::default())
}

/// Convert any `T: Serialize` to a [`TagValue`].
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use tagstring::{to_value, TagValue};
///
/// let mut map = BTreeMap::new();
/// map.insert("n", 3);
/// let value = to_value(&map).unwrap();
/// assert_eq!(value.as_map().and_then(|m| m.get("n")), Some(&TagValue::from("3")));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] for values with no textual form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<TagValue>
where
    T: ?Sized + Serialize,
{
    value.serialize(TagValueSerializer)
}

/// Serialize any `T: Serialize` that maps to a [`TagValue::Map`] as one
/// canonical block.
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] if the value is not a map or struct,
/// or holds a value with no textual form.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        TagValue::Map(block) => encode(&TagSequence::from(vec![TagItem::Block(block)])),
        TagValue::Str(_) => Err(Error::unsupported_value("top-level string")),
        TagValue::List(_) => Err(Error::unsupported_value("top-level list")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn text(s: &str) -> TagItem {
        TagItem::Text(s.to_string())
    }

    fn block(pairs: &[(&str, TagValue)]) -> TagItem {
        TagItem::Block(pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }

    #[derive(Serialize)]
    struct Photo {
        year: u16,
        tags: Vec<String>,
        rating: Option<u8>,
    }

    #[test]
    fn test_decode_plain() {
        assert_eq!(decode("plainfile").as_slice(), &[text("plainfile")]);
    }

    #[test]
    fn test_decode_single_block() {
        assert_eq!(decode("#a=1##").as_slice(), &[block(&[("a", "1".into())])]);
    }

    #[test]
    fn test_decode_text_around_block() {
        assert_eq!(
            decode("pre#a=1##post").as_slice(),
            &[text("pre"), block(&[("a", "1".into())]), text("post")]
        );
    }

    #[test]
    fn test_decode_map_and_list() {
        let map: TagMap = vec![
            ("x".to_string(), TagValue::from("1")),
            ("y".to_string(), TagValue::from("2")),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            decode("#a={x=1,y=2}##").as_slice(),
            &[block(&[("a", TagValue::Map(map))])]
        );
        assert_eq!(
            decode("#a=[1,2,3]##").as_slice(),
            &[block(&[("a", TagValue::from(vec!["1", "2", "3"]))])]
        );
    }

    #[test]
    fn test_decode_escaped_structurals() {
        assert_eq!(
            decode("#a=`#`=`,##").as_slice(),
            &[block(&[("a", "#=,".into())])]
        );
    }

    #[test]
    fn test_encode_merges_and_sorts() {
        let seq = TagSequence::from(vec![
            block(&[("b", "2".into())]),
            block(&[("a", "1".into())]),
            text("hello"),
        ]);
        let encoded = encode(&seq).unwrap();
        assert_eq!(encoded, "#=[hello]#a=1#b=2##");
        assert_eq!(decode(&encoded).as_slice(), &[TagItem::Block(canonicalize(&seq).unwrap())]);
    }

    #[test]
    fn test_encode_duplicate_key() {
        let seq = TagSequence::from(vec![block(&[("a", "1".into())]), block(&[("a", "2".into())])]);
        assert_eq!(encode(&seq), Err(Error::DuplicateKey("a".to_string())));
    }

    #[test]
    fn test_double_hash_is_text() {
        assert_eq!(decode("##").as_slice(), &[text("##")]);
    }

    #[test]
    fn test_to_string_struct() {
        let photo = Photo {
            year: 2024,
            tags: vec!["sea".to_string(), "a,b".to_string()],
            rating: Some(5),
        };
        assert_eq!(to_string(&photo).unwrap(), "#rating=5#tags=[sea,a`,b]#year=2024##");
    }

    #[test]
    fn test_to_string_rejects_none_and_scalars() {
        let photo = Photo {
            year: 2024,
            tags: vec![],
            rating: None,
        };
        assert!(matches!(to_string(&photo), Err(Error::UnsupportedValue(_))));
        assert!(matches!(to_string("plain"), Err(Error::UnsupportedValue(_))));
        assert!(matches!(to_string(&[1, 2]), Err(Error::UnsupportedValue(_))));
    }
}
