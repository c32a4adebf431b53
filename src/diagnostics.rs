//! Non-fatal notices produced while decoding.
//!
//! Decoding always succeeds, so anything odd about the input is reported here
//! instead: keys that were overwritten, escapes that were not recognized, and
//! spans that could not be parsed as a block and were kept as literal text.
//! Positions are byte offsets into the decoded string.

use std::fmt;

/// Why a span was kept as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryReason {
    /// A character that is not allowed at this point of the grammar.
    UnexpectedChar,
    /// The input ended inside a block.
    UnexpectedEnd,
    /// A malformed `` `x `` or `` `u `` escape.
    InvalidEscape,
    /// `##` with no entry in front of it.
    EmptyBlock,
    /// Lists and maps nested deeper than the configured limit.
    TooDeep,
}

impl fmt::Display for RecoveryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RecoveryReason::UnexpectedChar => "unexpected character",
            RecoveryReason::UnexpectedEnd => "unexpected end of input",
            RecoveryReason::InvalidEscape => "invalid escape sequence",
            RecoveryReason::EmptyBlock => "block without entries",
            RecoveryReason::TooDeep => "nesting too deep",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A key appeared twice in one block or map; the later value was kept.
    DuplicateKey { key: String, position: usize },
    /// An escape letter with no meaning; it was kept as leader + letter.
    UnknownEscape { escape: char, position: usize },
    /// `start..end` was not a valid block and was kept as text.
    Recovered {
        start: usize,
        end: usize,
        reason: RecoveryReason,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::DuplicateKey { key, position } => {
                write!(f, "duplicate key {:?} at byte {}, later value kept", key, position)
            }
            Notice::UnknownEscape { escape, position } => {
                write!(f, "unknown escape `{} at byte {}", escape, position)
            }
            Notice::Recovered { start, end, reason } => {
                write!(f, "bytes {}..{} kept as text: {}", start, end, reason)
            }
        }
    }
}
