//! TagString format reference
//!
//! This module documents the TagString format as read by [`crate::decode`]
//! and written by [`crate::encode`].
//!
//! # Overview
//!
//! A TagString is the stem of a file or directory name: literal text with
//! blocks of tags embedded in it. Decoding never fails; whatever does not form
//! a block is literal text.
//!
//! # Core Syntax
//!
//! ```text
//! sequence   := ( text | block )*
//! text       := any run of characters not forming a valid block
//! block      := "#" entry ("#" entry)* "##"
//! entry      := key "=" value
//! key        := escaped-string terminated by "="
//! value      := "{" map-body "}" | "[" list-body "]" | escaped-string
//! map-body   := (entry ("," entry)*)?
//! list-body  := (value ("," value)*)?
//! ```
//!
//! A block needs at least one entry, so `##` on its own is text.
//!
//! ## Strings
//!
//! Where a plain string ends depends on where it appears:
//!
//! | Position | Ends at | Must be escaped inside |
//! |----------|---------|------------------------|
//! | key | `=` | `` # , { } [ ] `` |
//! | block value | `#` | `` , = { } [ ] `` |
//! | map value | `,` or `}` | `` # = { [ ] `` |
//! | list item | `,` or `]` | `` # = { } [ `` |
//!
//! An unescaped character from the last column makes the whole block text.
//!
//! ## Lists and Maps
//!
//! ```text
//! #people=[ann,bob]##          people: [ann, bob]
//! #place={city=Oslo,zip=0150}## place: {city: Oslo, zip: 0150}
//! #a=[]##                      a: []
//! #a=[,]##                     a: ["", ""]
//! #a=[{x=1},{y=2}]##           a: [{x: 1}, {y: 2}]
//! ```
//!
//! Items are separated by exactly one comma. Nesting is limited by
//! [`TagOptions::max_depth`](crate::TagOptions::max_depth) (128 by default).
//! Deeper input reads as text, and the encoder refuses deeper values.
//!
//! # Escapes
//!
//! The leader is the backtick.
//!
//! | Form | Meaning |
//! |------|---------|
//! | `` `X `` for X in `` ` # = , { } [ ] `` | X itself |
//! | `` `a `b `n `v `t `r `f `` | the C control characters |
//! | `` `" `' `` | the quote characters (read only) |
//! | `` `xHH `` | the character U+00HH |
//! | `` `uHHHH `` | the character U+HHHH; surrogate pairs are combined |
//!
//! Hex digits may be either case on input and are written in lower case.
//! An unknown letter after the leader is kept as is, leader included.
//! A truncated or non-hex escape makes the block text.
//!
//! In literal text escapes are not interpreted, but a backtick still keeps
//! the next character from opening a block: `` a`#b `` is all text.
//!
//! # Canonical Form
//!
//! [`crate::encode`] writes exactly one block:
//!
//! 1. the entries of every block, merged (a repeated key is an error)
//! 2. the literal text, in order, as a list under the key `""`
//! 3. keys sorted, so `""` comes first
//!
//! ```text
//! b#y=2##a#x=1##   ->   #=[b,a]#x=1#y=2##
//! ```
//!
//! An empty sequence encodes to the empty string.
//!
//! Characters that file systems reject (`` \ / : * ? " < > | ``) and control
//! characters are always escaped. Directory names also escape `.`.
//!
//! # Recovery
//!
//! When a block fails to parse, the text from its opening `#` up to the
//! failing character is kept as literal text, and decoding continues at the
//! failing character:
//!
//! ```text
//! x#b#c=1##   ->   "x#b", {c: 1}
//! ```
