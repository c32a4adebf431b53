//! The escape table.
//!
//! Every character falls in exactly one class:
//!
//! | Class | Characters | Encoded as |
//! |---|---|---|
//! | structural | `` ` # = , { } [ ] `` | `` ` `` + the character |
//! | unsafe in file names | `\ / : * ? " < > \|` | `` `x `` + 2 lowercase hex digits |
//! | control | U+0000–U+001F, U+007F, U+0080–U+009F | `` ` `` + named letter, or `` `u `` + 4 hex digits |
//! | anything else | | unchanged |
//!
//! The named letters are `a b n v t r f` (the usual C meanings). On decode
//! `` `" `` and `` `' `` are also accepted as the quote characters.
//!
//! ## Examples
//!
//! ```rust
//! use tagstring::escape::escape_str;
//!
//! assert_eq!(escape_str("https://x.org/#top"), "https`x3a`x2f`x2fx.org`x2f`#top");
//! assert_eq!(escape_str("a\nb"), "a`nb");
//! assert_eq!(escape_str("\u{1}"), "`u0001");
//! ```

use std::fmt::Write;

/// The escape leader.
pub const LEADER: char = '`';

/// Characters with syntactic meaning.
pub const STRUCTURAL: [char; 8] = ['`', '#', '=', ',', '{', '}', '[', ']'];

/// Characters that are not allowed in file names on common platforms.
pub const UNSAFE: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[inline]
#[must_use]
pub fn is_structural(ch: char) -> bool {
    STRUCTURAL.contains(&ch)
}

#[inline]
#[must_use]
pub fn is_unsafe(ch: char) -> bool {
    UNSAFE.contains(&ch)
}

/// C0 controls, DEL, and C1 controls.
#[inline]
#[must_use]
pub fn is_control(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}')
}

fn named_letter(ch: char) -> Option<char> {
    match ch {
        '\u{7}' => Some('a'),
        '\u{8}' => Some('b'),
        '\n' => Some('n'),
        '\u{b}' => Some('v'),
        '\t' => Some('t'),
        '\r' => Some('r'),
        '\u{c}' => Some('f'),
        _ => None,
    }
}

fn named_char(letter: char) -> Option<char> {
    match letter {
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'n' => Some('\n'),
        'v' => Some('\u{b}'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'f' => Some('\u{c}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Appends the escaped form of `ch` to `out`.
///
/// With `escape_dots`, `.` is written as `` `x2e `` as well.
pub fn escape_char_into(out: &mut String, ch: char, escape_dots: bool) {
    if is_control(ch) {
        out.push(LEADER);
        match named_letter(ch) {
            Some(letter) => out.push(letter),
            // Writing into a String cannot fail.
            None => {
                let _ = write!(out, "u{:04x}", ch as u32);
            }
        }
    } else if is_unsafe(ch) || (escape_dots && ch == '.') {
        let _ = write!(out, "{}x{:02x}", LEADER, ch as u32);
    } else if is_structural(ch) {
        out.push(LEADER);
        out.push(ch);
    } else {
        out.push(ch);
    }
}

/// Returns the escaped form of a single character.
///
/// # Examples
///
/// ```rust
/// use tagstring::escape::escape_char;
///
/// assert_eq!(escape_char('#'), "`#");
/// assert_eq!(escape_char(':'), "`x3a");
/// assert_eq!(escape_char('\t'), "`t");
/// assert_eq!(escape_char('é'), "é");
/// ```
#[must_use]
pub fn escape_char(ch: char) -> String {
    let mut out = String::with_capacity(6);
    escape_char_into(&mut out, ch, false);
    out
}

#[must_use]
pub fn escape_str(s: &str) -> String {
    escape_str_with(s, false)
}

#[must_use]
pub fn escape_str_with(s: &str, escape_dots: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        escape_char_into(&mut out, ch, escape_dots);
    }
    out
}

/// Result of reading the body of an escape sequence (everything after the leader).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unescaped {
    /// A recognized escape: the character it stands for and the number of
    /// bytes consumed after the leader.
    Char(char, usize),
    /// An unrecognized letter. It is kept as leader + letter.
    Unknown(char),
    /// A `` `u `` escape naming a UTF-16 high surrogate; the caller has to
    /// pair it with a following low surrogate escape.
    HighSurrogate(u16, usize),
    /// Malformed: truncated input, non-hex digits, or a lone low surrogate.
    Invalid,
}

/// Reads an escape body from `rest`, which starts right after the leader.
///
/// # Examples
///
/// ```rust
/// use tagstring::escape::{unescape, Unescaped};
///
/// assert_eq!(unescape("#tail"), Unescaped::Char('#', 1));
/// assert_eq!(unescape("x3a"), Unescaped::Char(':', 3));
/// assert_eq!(unescape("u00e9"), Unescaped::Char('é', 5));
/// assert_eq!(unescape("q"), Unescaped::Unknown('q'));
/// assert_eq!(unescape("x3"), Unescaped::Invalid);
/// ```
#[must_use]
pub fn unescape(rest: &str) -> Unescaped {
    let Some(letter) = rest.chars().next() else {
        return Unescaped::Invalid;
    };
    if is_structural(letter) {
        return Unescaped::Char(letter, 1);
    }
    if let Some(ch) = named_char(letter) {
        return Unescaped::Char(ch, 1);
    }
    match letter {
        'x' => match hex_digits(&rest[1..], 2) {
            Some(byte) => char::from_u32(byte)
                .map(|ch| Unescaped::Char(ch, 3))
                .unwrap_or(Unescaped::Invalid),
            None => Unescaped::Invalid,
        },
        'u' => match hex_digits(&rest[1..], 4) {
            Some(unit @ 0xD800..=0xDBFF) => Unescaped::HighSurrogate(unit as u16, 5),
            Some(0xDC00..=0xDFFF) | None => Unescaped::Invalid,
            Some(unit) => char::from_u32(unit)
                .map(|ch| Unescaped::Char(ch, 5))
                .unwrap_or(Unescaped::Invalid),
        },
        other => Unescaped::Unknown(other),
    }
}

/// Combines a high surrogate with a low surrogate read from `rest`, which must
/// start with a `` `uXXXX `` escape. Returns the character and the bytes consumed.
#[must_use]
pub fn pair_surrogate(high: u16, rest: &str) -> Option<(char, usize)> {
    let body = rest.strip_prefix(LEADER)?.strip_prefix('u')?;
    let low = hex_digits(body, 4)?;
    if !(0xDC00..=0xDFFF).contains(&low) {
        return None;
    }
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).map(|ch| (ch, 6))
}

fn hex_digits(s: &str, count: usize) -> Option<u32> {
    let digits = s.get(..count)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_are_disjoint() {
        for ch in STRUCTURAL {
            assert!(!is_unsafe(ch) && !is_control(ch), "{:?}", ch);
        }
        for ch in UNSAFE {
            assert!(!is_structural(ch) && !is_control(ch), "{:?}", ch);
        }
    }

    #[test]
    fn test_structural_escapes() {
        assert_eq!(escape_str("`#=,{}[]"), "```#`=`,`{`}`[`]");
    }

    #[test]
    fn test_unsafe_escapes_are_two_digit_hex() {
        assert_eq!(escape_str("\\/:*?\"<>|"), "`x5c`x2f`x3a`x2a`x3f`x22`x3c`x3e`x7c");
    }

    #[test]
    fn test_control_escapes() {
        assert_eq!(escape_str("\u{7}\u{8}\n\u{b}\t\r\u{c}"), "`a`b`n`v`t`r`f");
        assert_eq!(escape_str("\u{0}\u{1f}\u{7f}\u{85}\u{9f}"), "`u0000`u001f`u007f`u0085`u009f");
    }

    #[test]
    fn test_untouched_characters() {
        assert_eq!(escape_str("photo 2024.jpg ✓ 'q'"), "photo 2024.jpg ✓ 'q'");
        assert_eq!(escape_str("\u{a0}"), "\u{a0}");
    }

    #[test]
    fn test_escape_dots() {
        assert_eq!(escape_str_with("a.b", true), "a`x2eb");
        assert_eq!(escape_str_with("a.b", false), "a.b");
    }

    #[test]
    fn test_unescape_named_and_quotes() {
        assert_eq!(unescape("n"), Unescaped::Char('\n', 1));
        assert_eq!(unescape("\""), Unescaped::Char('"', 1));
        assert_eq!(unescape("'"), Unescaped::Char('\'', 1));
    }

    #[test]
    fn test_unescape_hex_accepts_upper_case() {
        assert_eq!(unescape("x3A"), Unescaped::Char(':', 3));
        assert_eq!(unescape("xff"), Unescaped::Char('\u{ff}', 3));
    }

    #[test]
    fn test_unescape_invalid_forms() {
        assert_eq!(unescape(""), Unescaped::Invalid);
        assert_eq!(unescape("xg1"), Unescaped::Invalid);
        assert_eq!(unescape("u12"), Unescaped::Invalid);
        assert_eq!(unescape("udc00"), Unescaped::Invalid);
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(unescape("ud83d"), Unescaped::HighSurrogate(0xD83D, 5));
        assert_eq!(pair_surrogate(0xD83D, "`ude00"), Some(('😀', 6)));
        assert_eq!(pair_surrogate(0xD83D, "`u0041"), None);
        assert_eq!(pair_surrogate(0xD83D, "x"), None);
    }

    #[test]
    fn test_every_escape_reads_back() {
        for code in 0u32..0x250 {
            let Some(ch) = char::from_u32(code) else { continue };
            let escaped = escape_char(ch);
            match escaped.strip_prefix(LEADER) {
                Some(body) => assert_eq!(unescape(body), Unescaped::Char(ch, body.len())),
                None => assert_eq!(escaped, ch.to_string()),
            }
        }
    }
}
