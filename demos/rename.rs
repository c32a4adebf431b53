//! Reformatting tagged file names in a directory.
//!
//! Creates a few files in a temporary directory and renames each one to its
//! canonical form. Set `RUST_LOG=tagstring=debug` to see what the decoder
//! recovers from.
//!
//! Run with: cargo run --example rename

use std::error::Error;
use std::fs;
use tagstring::path::reformat;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagstring=warn")),
        )
        .init();

    let dir = std::env::temp_dir().join(format!("tagstring-rename-{}", std::process::id()));
    fs::create_dir_all(&dir)?;

    let names = [
        "beach#year=2024#place=Nice##.jpg",
        "notes.txt",
        "trip#b=2##day 1#a=1##.png",
        "draft#a=[1,2#a=1#a=2##.md",
        "set#v=1.0##",
    ];
    for name in names {
        let path = dir.join(name);
        if name.ends_with("##") {
            fs::create_dir_all(&path)?;
        } else {
            fs::write(&path, b"")?;
        }
    }

    for name in names {
        let from = dir.join(name);
        let to = reformat(&from)?;
        if to == from {
            println!("  {}  (unchanged)", name);
            continue;
        }
        fs::rename(&from, &to)?;
        let new_name = to.file_name().map(|n| n.to_string_lossy().into_owned());
        println!("  {}  ->  {}", name, new_name.unwrap_or_default());
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}
