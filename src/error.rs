//! Error types for TagString encoding and path binding.
//!
//! Decoding never fails: malformed input is recovered as literal text and
//! reported through [`crate::diagnostics::Notice`]. The errors in this module
//! are the ones a caller can actually observe, and they all indicate a misuse
//! of the data model rather than bad external text.
//!
//! ## Examples
//!
//! ```rust
//! use tagstring::{encode, Error, TagItem, TagMap, TagSequence, TagValue};
//!
//! let mut first = TagMap::new();
//! first.insert("a".to_string(), TagValue::from("1"));
//! let mut second = TagMap::new();
//! second.insert("a".to_string(), TagValue::from("2"));
//!
//! let seq = TagSequence::from(vec![TagItem::Block(first), TagItem::Block(second)]);
//! match encode(&seq) {
//!     Err(Error::DuplicateKey(key)) => assert_eq!(key, "a"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Errors returned by the encoder, the serde bridge and the path binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two blocks (or a block and the literal text list) claim the same key
    /// while building the canonical block.
    #[error("duplicate key {0:?} while merging tag blocks")]
    DuplicateKey(String),

    /// A value that cannot be represented as a string, list or map.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// The path has no file name to take a stem from, or it is not valid UTF-8.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Custom error raised through serde.
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a duplicate key error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tagstring::Error;
    ///
    /// let err = Error::duplicate_key("author");
    /// assert!(err.to_string().contains("author"));
    /// ```
    pub fn duplicate_key(key: &str) -> Self {
        Error::DuplicateKey(key.to_string())
    }

    /// Creates an unsupported value error.
    pub fn unsupported_value(what: &str) -> Self {
        Error::UnsupportedValue(what.to_string())
    }

    /// Creates an invalid path error.
    pub fn invalid_path(msg: &str) -> Self {
        Error::InvalidPath(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
