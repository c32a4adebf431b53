//! Merging blocks, the legacy join, and what happens on conflicts.
//!
//! Run with: cargo run --example canonical

use std::error::Error;
use tagstring::{decode, decode_with_diagnostics, encode, join, TagOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let stem = "b#y=2#x=1##a#z=3##";
    let seq = decode(stem);

    println!("Input:      {}", stem);
    println!("Joined:     {}", join(&seq));
    println!("Canonical:  {}", encode(&seq)?);
    println!("Combined:   {:?}\n", seq.combined());

    // The same key in two blocks cannot be merged
    let conflicting = decode("#a=1##copy#a=2##");
    match encode(&conflicting) {
        Ok(s) => println!("Unexpected success: {}", s),
        Err(e) => println!("Conflict:   {}", e),
    }
    println!("Combined:   {:?} (later block wins)\n", conflicting.combined());

    // Broken blocks are kept as text and reported
    let broken = "draft#a=[1,2#b=ok##";
    let decoded = decode_with_diagnostics(broken, &TagOptions::default());
    println!("Input:      {}", broken);
    println!("Sequence:   {:?}", decoded.sequence);
    for notice in &decoded.notices {
        println!("Notice:     {}", notice);
    }

    Ok(())
}
