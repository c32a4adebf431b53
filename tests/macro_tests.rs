use tagstring::{encode, tag, TagItem, TagMap, TagSequence, TagValue};

#[test]
fn test_tag_macro_strings() {
    assert_eq!(tag!("hello world"), TagValue::Str("hello world".to_string()));
    assert_eq!(tag!(""), TagValue::Str(String::new()));
}

#[test]
fn test_tag_macro_expressions() {
    let year = 2024;
    assert_eq!(tag!(year.to_string()), TagValue::from("2024"));

    let existing = TagValue::from(vec!["a"]);
    assert_eq!(tag!(existing.clone()), existing);

    let names = vec!["ann", "bob"];
    assert_eq!(tag!(names), TagValue::from(vec!["ann", "bob"]));
}

#[test]
fn test_tag_macro_lists() {
    assert_eq!(tag!([]), TagValue::List(vec![]));
    assert_eq!(
        tag!(["a", "b", "c"]),
        TagValue::List(vec![
            TagValue::from("a"),
            TagValue::from("b"),
            TagValue::from("c"),
        ])
    );
    assert_eq!(tag!(["a",]), TagValue::List(vec![TagValue::from("a")]));
}

#[test]
fn test_tag_macro_maps() {
    assert_eq!(tag!({}), TagValue::Map(TagMap::new()));

    let value = tag!({
        "city": "Oslo",
        "people": ["ann", "bob"],
    });
    let map = value.as_map().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("city"), Some(&TagValue::from("Oslo")));
    assert_eq!(map.get("people"), Some(&TagValue::from(vec!["ann", "bob"])));
}

#[test]
fn test_tag_macro_nesting() {
    let value = tag!({
        "trip": {
            "stops": [{ "city": "Oslo" }, { "city": "Bergen" }],
            "empty": []
        }
    });
    assert_eq!(value.depth(), 4);
    assert_eq!(
        value.to_string(),
        "{trip={stops=[{city=Oslo},{city=Bergen}],empty=[]}}"
    );
}

#[test]
fn test_tag_macro_block_encodes() {
    let TagValue::Map(block) = tag!({ "b": "2", "a": ["x,y"] }) else {
        panic!("expected a map");
    };
    let seq = TagSequence::from(vec![TagItem::Block(block)]);
    assert_eq!(encode(&seq).unwrap(), "#a=[x`,y]#b=2##");
}
