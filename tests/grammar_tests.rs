//! Edge cases of the TagString grammar: escapes, string contexts and recovery.

use tagstring::{decode, decode_with_diagnostics, encode, tag, Notice, TagItem, TagOptions, TagValue};

fn text(s: &str) -> TagItem {
    TagItem::Text(s.to_string())
}

fn single_value(input: &str, key: &str) -> Option<TagValue> {
    let seq = decode(input);
    match seq.as_slice() {
        [TagItem::Block(block)] => block.get(key).cloned(),
        _ => None,
    }
}

fn notices(input: &str) -> Vec<Notice> {
    decode_with_diagnostics(input, &TagOptions::default()).notices
}

// Escapes

#[test]
fn test_structural_escapes_in_every_position() {
    assert_eq!(single_value("#a`=b=1##", "a=b"), Some(TagValue::from("1")));
    assert_eq!(single_value("#a=[x`,y,`]]##", "a"), Some(tag!(["x,y", "]"])));
    assert_eq!(single_value("#a={k=`}`{}##", "a"), Some(tag!({ "k": "}{" })));
    assert_eq!(single_value("#a=````##", "a"), Some(TagValue::from("``")));
}

#[test]
fn test_named_escapes() {
    assert_eq!(
        single_value("#a=`a`b`n`v`t`r`f##", "a"),
        Some(TagValue::from("\u{7}\u{8}\n\u{b}\t\r\u{c}"))
    );
    assert_eq!(single_value("#a=`\"`'##", "a"), Some(TagValue::from("\"'")));
}

#[test]
fn test_hex_and_unicode_escapes() {
    assert_eq!(single_value("#a=`x3a`x3A##", "a"), Some(TagValue::from("::")));
    assert_eq!(single_value("#a=`u00e9`u2713##", "a"), Some(TagValue::from("é✓")));
    assert_eq!(single_value("#a=`ud83d`ude00##", "a"), Some(TagValue::from("😀")));
}

#[test]
fn test_hex_is_written_lower_case_and_padded() {
    let seq = decode("#a=`x2F`u0001##");
    assert_eq!(encode(&seq).unwrap(), "#a=`x2f`u0001##");
}

#[test]
fn test_unknown_escape_is_kept_and_reported() {
    assert_eq!(single_value("#a=`q`z##", "a"), Some(TagValue::from("`q`z")));
    assert_eq!(notices("#a=`q##").len(), 1);
}

#[test]
fn test_unknown_escape_reads_back_after_encoding() {
    let seq = decode("#a=`q##");
    let encoded = encode(&seq).unwrap();
    assert_eq!(encoded, "#a=``q##");
    assert_eq!(decode(&encoded).combined(), seq.combined());
}

#[test]
fn test_invalid_escapes_fall_back_to_text() {
    for input in ["#a=`x4##", "#a=`xZZ##", "#a=`u12##", "#a=`ude00##", "#a=`ud83d##", "#a=`"] {
        let seq = decode(input);
        assert!(!seq.has_blocks(), "{}", input);
        assert_eq!(seq.as_slice(), &[text(input)], "{}", input);
    }
}

#[test]
fn test_backslash_is_not_a_named_escape() {
    assert_eq!(single_value("#a=`\\##", "a"), Some(TagValue::from("`\\")));
}

// Literal text

#[test]
fn test_escapes_are_not_interpreted_in_text() {
    assert_eq!(decode("a`nb").as_slice(), &[text("a`nb")]);
}

#[test]
fn test_protected_hash_in_text() {
    assert_eq!(decode("a`#b=1##").as_slice(), &[text("a`#b=1##")]);
    let seq = decode("a`##b=1##");
    assert_eq!(seq.len(), 2);
    assert_eq!(seq[0], text("a`#"));
}

#[test]
fn test_single_hashes_stay_text() {
    for input in ["#", "a#", "#a", "a#b", "##", "###", "#=", "#a=", "#a=1", "#a=1#"] {
        assert_eq!(decode(input).as_slice(), &[text(input)], "{}", input);
    }
}

// String contexts

#[test]
fn test_forbidden_characters_per_context() {
    for input in [
        "#a=b=c##",
        "#a=b,c##",
        "#a=b]##",
        "#a={k=v=w}##",
        "#a={k=[}##",
        "#a=[x#y]##",
        "#a=[x}]##",
        "#a,b=1##",
        "#a{=1##",
    ] {
        assert!(!decode(input).has_blocks(), "{}", input);
    }
}

#[test]
fn test_non_structural_characters_need_no_escape() {
    assert_eq!(
        single_value("#a b=c d.e-f_g(h)!@$%&+~;'##", "a b"),
        Some(TagValue::from("c d.e-f_g(h)!@$%&+~;'"))
    );
    assert_eq!(single_value("#a=[x y,z.w]##", "a"), Some(tag!(["x y", "z.w"])));
}

#[test]
fn test_trailing_comma_is_an_empty_item() {
    assert_eq!(single_value("#a=[x,]##", "a"), Some(tag!(["x", ""])));
    assert!(!decode("#a={k=v,}##").has_blocks());
}

#[test]
fn test_value_after_list_must_end_entry() {
    assert!(!decode("#a=[x]y##").has_blocks());
    assert!(!decode("#a={k=v}y##").has_blocks());
}

// Recovery

#[test]
fn test_failing_hash_can_open_next_block() {
    let seq = decode("x#b#c=1##");
    assert_eq!(seq[0], text("x#b"));
    assert_eq!(seq[1].as_block().and_then(|b| b.get("c")), Some(&TagValue::from("1")));
}

#[test]
fn test_good_block_after_bad_one() {
    let seq = decode("#a=[##tail#k=v##");
    assert!(seq.has_blocks());
    assert_eq!(seq.combined().get("k"), Some(&TagValue::from("v")));
    let texts: String = seq.texts().collect();
    assert_eq!(texts, "#a=[##tail");
}

#[test]
fn test_duplicate_key_inside_map() {
    let decoded = decode_with_diagnostics("#a={k=1,k=2}##", &TagOptions::default());
    assert_eq!(
        decoded.sequence.combined().get("a"),
        Some(&tag!({ "k": "2" }))
    );
    assert!(matches!(&decoded.notices[..], [Notice::DuplicateKey { key, .. }] if key == "k"));
}

#[test]
fn test_recovered_spans_cover_the_text() {
    let input = "pre#a=[x#b=1##";
    let decoded = decode_with_diagnostics(input, &TagOptions::default());
    for notice in &decoded.notices {
        if let Notice::Recovered { start, end, .. } = notice {
            assert!(start < end && *end <= input.len());
        }
    }
    assert_eq!(decoded.sequence[0], text("pre#a=[x"));
    assert!(decoded.sequence.has_blocks());
}
