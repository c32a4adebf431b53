//! Decoding a file name and writing it back in canonical form.
//!
//! Run with: cargo run --example simple

use serde::Serialize;
use std::error::Error;
use tagstring::{decode, encode, to_string, TagItem};

#[derive(Debug, Serialize)]
struct Photo {
    place: String,
    year: u16,
    people: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let stem = "holiday#people=[ann,bob]## at the lake#year=2024##";

    // Decode into text and blocks
    let seq = decode(stem);
    println!("Decoded {:?}:", stem);
    for item in &seq {
        match item {
            TagItem::Text(text) => println!("  text  {:?}", text),
            TagItem::Block(block) => {
                for (key, value) in block {
                    println!("  tag   {} = {}", key, value);
                }
            }
        }
    }

    // Encode back in canonical form
    let canonical = encode(&seq)?;
    println!("\nCanonical: {}", canonical);
    assert_eq!(encode(&decode(&canonical))?, canonical);
    println!("✓ Canonical form is stable");

    // Tags straight from a Rust struct
    let photo = Photo {
        place: "Lake Como".to_string(),
        year: 2024,
        people: vec!["ann".to_string(), "bob".to_string()],
    };
    println!("\nFrom struct: {}", to_string(&photo)?);

    Ok(())
}
