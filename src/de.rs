//! TagString decoding.
//!
//! This module provides the [`Parser`] that turns a stem into a
//! [`TagSequence`]. Decoding is total: every input produces a sequence, and
//! anything that does not form a valid block is kept as literal text.
//!
//! ## Overview
//!
//! The outer loop alternates between two steps:
//!
//! 1. Collect literal text up to the next `#` that is not protected by the
//!    escape leader. Escapes are not interpreted in literal text.
//! 2. Try to parse a block at that `#`. Each sub-parser returns a
//!    `Result`; on failure the span from the `#` to the failure offset is
//!    kept as text and the loop resumes at the failure offset.
//!
//! The failure offset is always past the opening `#`, so every iteration makes
//! progress. Nesting of `{}`/`[]` is capped by [`TagOptions::max_depth`].
//!
//! ## Usage
//!
//! ```rust
//! use tagstring::{decode, TagItem, TagValue};
//!
//! let seq = decode("pre#a=1##post");
//! assert_eq!(seq.len(), 3);
//! assert_eq!(seq[0], TagItem::Text("pre".to_string()));
//! assert_eq!(seq[1].as_block().and_then(|b| b.get("a")), Some(&TagValue::from("1")));
//! assert_eq!(seq[2], TagItem::Text("post".to_string()));
//! ```

use crate::diagnostics::{Notice, RecoveryReason};
use crate::escape::{self, Unescaped, LEADER};
use crate::{TagMap, TagOptions, TagSequence, TagValue};

const KEY_FORBIDDEN: &[char] = &['#', ',', '{', '}', '[', ']'];

/// Where a plain string is being scanned. Each place has its own stop
/// characters and its own set of structural characters that may not appear
/// unescaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Entry,
    Map,
    List,
}

impl Context {
    fn stops(self) -> &'static [char] {
        match self {
            Context::Entry => &['#'],
            Context::Map => &[',', '}'],
            Context::List => &[',', ']'],
        }
    }

    fn forbidden(self) -> &'static [char] {
        match self {
            Context::Entry => &[',', '=', '{', '}', '[', ']'],
            Context::Map => &['#', '=', '{', '[', ']'],
            Context::List => &['#', '=', '{', '}', '['],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParseError {
    position: usize,
    reason: RecoveryReason,
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Output of [`crate::decode_with_diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    pub sequence: TagSequence,
    pub notices: Vec<Notice>,
}

impl Decoded {
    /// Returns `true` if nothing was recovered, overwritten or left unrecognized.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.notices.is_empty()
    }
}

/// The TagString parser.
///
/// Holds the input and a cursor into it. A parser is used for one input
/// and consumed by [`Parser::parse`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    depth: usize,
    max_depth: usize,
    pending: Vec<Notice>, // Notices of the block being parsed, kept only if it succeeds
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str, options: &TagOptions) -> Self {
        Parser {
            input,
            position: 0,
            depth: 0,
            max_depth: options.max_depth,
            pending: Vec::new(),
        }
    }

    /// Decodes the whole input.
    #[must_use]
    pub fn parse(mut self) -> Decoded {
        let mut sequence = TagSequence::new();
        let mut notices = Vec::new();
        let mut anchor = 0;

        while anchor < self.input.len() {
            let hash = self.scan_text(anchor);
            sequence.push_text(&self.input[anchor..hash]);
            if hash >= self.input.len() {
                break;
            }

            self.position = hash;
            self.depth = 0;
            self.pending.clear();

            match self.parse_block() {
                Ok(block) => {
                    for notice in self.pending.drain(..) {
                        log_notice(&notice);
                        notices.push(notice);
                    }
                    sequence.push_block(block);
                    anchor = self.position;
                }
                Err(err) => {
                    let resume = err.position.max(hash + 1);
                    let notice = Notice::Recovered {
                        start: hash,
                        end: resume,
                        reason: err.reason,
                    };
                    log_notice(&notice);
                    notices.push(notice);
                    sequence.push_text(&self.input[hash..resume]);
                    anchor = resume;
                }
            }
        }

        Decoded { sequence, notices }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn error(&self, reason: RecoveryReason) -> ParseError {
        ParseError {
            position: self.position,
            reason,
        }
    }

    fn unexpected(&self) -> ParseError {
        if self.position >= self.input.len() {
            self.error(RecoveryReason::UnexpectedEnd)
        } else {
            self.error(RecoveryReason::UnexpectedChar)
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.position += ch.len_utf8();
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Returns the offset of the next unprotected `#` at or after `from`,
    /// or the input length.
    fn scan_text(&self, from: usize) -> usize {
        let mut chars = self.input[from..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            match ch {
                '#' => return from + offset,
                LEADER => {
                    chars.next();
                }
                _ => {}
            }
        }
        self.input.len()
    }

    /// Parses `#key=value#key=value...##` starting at a `#`.
    fn parse_block(&mut self) -> ParseResult<TagMap> {
        let mut block = TagMap::new();
        loop {
            self.expect('#')?;
            match self.peek_char() {
                None => return Err(self.error(RecoveryReason::UnexpectedEnd)),
                Some('#') => {
                    if block.is_empty() {
                        return Err(self.error(RecoveryReason::EmptyBlock));
                    }
                    self.position += 1;
                    return Ok(block);
                }
                Some(_) => {}
            }

            let key_position = self.position;
            let key = self.scan_string(&['='], KEY_FORBIDDEN)?;
            self.expect('=')?;
            let value = self.parse_value(Context::Entry)?;
            self.insert_entry(&mut block, key, value, key_position);
        }
    }

    fn parse_value(&mut self, context: Context) -> ParseResult<TagValue> {
        match self.peek_char() {
            Some('{') => self.parse_map().map(TagValue::Map),
            Some('[') => self.parse_list().map(TagValue::List),
            _ => self
                .scan_string(context.stops(), context.forbidden())
                .map(TagValue::Str),
        }
    }

    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(self.error(RecoveryReason::TooDeep));
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_map(&mut self) -> ParseResult<TagMap> {
        self.descend()?;
        self.expect('{')?;
        let mut map = TagMap::new();

        if self.peek_char() == Some('}') {
            self.position += 1;
        } else {
            loop {
                let key_position = self.position;
                let key = self.scan_string(&['='], KEY_FORBIDDEN)?;
                self.expect('=')?;
                let value = self.parse_value(Context::Map)?;
                self.insert_entry(&mut map, key, value, key_position);

                match self.peek_char() {
                    Some(',') => self.position += 1,
                    Some('}') => {
                        self.position += 1;
                        break;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
        }

        self.depth -= 1;
        Ok(map)
    }

    fn parse_list(&mut self) -> ParseResult<Vec<TagValue>> {
        self.descend()?;
        self.expect('[')?;
        let mut items = Vec::new();

        if self.peek_char() == Some(']') {
            self.position += 1;
        } else {
            loop {
                items.push(self.parse_value(Context::List)?);

                match self.peek_char() {
                    Some(',') => self.position += 1,
                    Some(']') => {
                        self.position += 1;
                        break;
                    }
                    _ => return Err(self.unexpected()),
                }
            }
        }

        self.depth -= 1;
        Ok(items)
    }

    /// Scans an escaped string up to (not including) one of `stops`.
    fn scan_string(&mut self, stops: &[char], forbidden: &[char]) -> ParseResult<String> {
        let mut result = String::new();
        loop {
            let ch = self
                .peek_char()
                .ok_or_else(|| self.error(RecoveryReason::UnexpectedEnd))?;
            if stops.contains(&ch) {
                return Ok(result);
            }
            if ch == LEADER {
                self.scan_escape(&mut result)?;
                continue;
            }
            if forbidden.contains(&ch) {
                return Err(self.error(RecoveryReason::UnexpectedChar));
            }
            result.push(ch);
            self.position += ch.len_utf8();
        }
    }

    /// Reads one escape sequence at the cursor (which is on the leader).
    fn scan_escape(&mut self, out: &mut String) -> ParseResult<()> {
        let leader = self.position;
        let body = leader + LEADER.len_utf8();
        let invalid = ParseError {
            position: body,
            reason: RecoveryReason::InvalidEscape,
        };

        match escape::unescape(&self.input[body..]) {
            Unescaped::Char(ch, len) => {
                out.push(ch);
                self.position = body + len;
            }
            Unescaped::Unknown(letter) => {
                out.push(LEADER);
                out.push(letter);
                self.pending.push(Notice::UnknownEscape {
                    escape: letter,
                    position: leader,
                });
                self.position = body + letter.len_utf8();
            }
            Unescaped::HighSurrogate(high, len) => {
                let after = body + len;
                let (ch, pair_len) =
                    escape::pair_surrogate(high, &self.input[after..]).ok_or(invalid)?;
                out.push(ch);
                self.position = after + pair_len;
            }
            Unescaped::Invalid => return Err(invalid),
        }
        Ok(())
    }

    fn insert_entry(&mut self, map: &mut TagMap, key: String, value: TagValue, position: usize) {
        if map.insert(key.clone(), value).is_some() {
            self.pending.push(Notice::DuplicateKey { key, position });
        }
    }
}

fn log_notice(notice: &Notice) {
    match notice {
        Notice::DuplicateKey { key, position } => {
            tracing::warn!(key = %key, position, "duplicate tag key, later value kept");
        }
        Notice::UnknownEscape { escape, position } => {
            tracing::warn!(escape = %escape, position, "unknown escape kept literally");
        }
        Notice::Recovered { start, end, reason } => {
            tracing::debug!(start, end, reason = %reason, "span kept as literal text");
        }
    }
}
