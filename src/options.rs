//! Configuration for decoding and encoding.
//!
//! ## Examples
//!
//! ```rust
//! use tagstring::{decode_with_options, TagOptions};
//!
//! // Refuse anything nested more than two levels deep.
//! let options = TagOptions::new().with_max_depth(2);
//! let seq = decode_with_options("#a=[[[x]]]##", &options);
//! assert!(!seq.has_blocks());
//! ```

/// Default cap on `{}`/`[]` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options shared by the decoder and the encoder.
///
/// # Examples
///
/// ```rust
/// use tagstring::TagOptions;
///
/// let options = TagOptions::new();
/// assert_eq!(options.max_depth, 128);
/// assert!(!options.escape_dots);
///
/// let options = TagOptions::new().with_escape_dots(true).with_max_depth(16);
/// assert!(options.escape_dots);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagOptions {
    /// Maximum nesting of lists and maps the decoder accepts. Deeper input
    /// is kept as literal text.
    pub max_depth: usize,
    /// Also escape `.` as `` `x2e `` when encoding. Used for directory names.
    pub escape_dots: bool,
}

impl Default for TagOptions {
    fn default() -> Self {
        TagOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            escape_dots: false,
        }
    }
}

impl TagOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_escape_dots(mut self, escape_dots: bool) -> Self {
        self.escape_dots = escape_dots;
        self
    }
}
