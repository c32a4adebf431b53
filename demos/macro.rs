//! Building tag values with the tag! macro.
//!
//! Run with: cargo run --example macro

use std::error::Error;
use tagstring::{encode, tag, TagItem, TagSequence, TagValue};

fn main() -> Result<(), Box<dyn Error>> {
    let text = tag!("Hello, tags!");
    let list = tag!(["ann", "bob", "cy"]);
    let year = tag!(2024.to_string());

    println!("Values:");
    println!("  text: {}", text);
    println!("  list: {}", list);
    println!("  year: {}\n", year);

    let trip = tag!({
        "place": { "city": "Oslo", "country": "NO" },
        "people": ["ann", "bob"],
        "note": "a=b, {c}"
    });
    println!("Nested: {}\n", trip);

    let TagValue::Map(block) = trip else {
        return Err("expected a map".into());
    };
    let seq = TagSequence::from(vec![TagItem::Text("trip".to_string()), TagItem::Block(block)]);
    println!("As a file name: {}", encode(&seq)?);

    Ok(())
}
