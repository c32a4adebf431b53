//! Applying the codec to file-system paths.
//!
//! The tag string lives in a path's *stem*: the file name without its final
//! extension for files, the whole name for directories. Whether a path is a
//! directory is looked up on disk by [`PathKind::of`]; the `*_as` variants take
//! the kind from the caller and never touch the file system.
//!
//! Directory names are encoded with `.` escaped as `` `x2e `` so that the name
//! keeps reading back the same way if it is ever treated as a file name.
//!
//! ## Examples
//!
//! ```rust
//! use std::path::Path;
//! use tagstring::path::{decode_stem_as, with_canonical_stem_as, PathKind};
//! use tagstring::TagValue;
//!
//! let path = Path::new("photos/beach#year=2024##.jpg");
//! let seq = decode_stem_as(path, PathKind::File);
//! assert_eq!(seq.combined().get("year"), Some(&TagValue::from("2024")));
//!
//! let renamed = with_canonical_stem_as(path, &seq, PathKind::File).unwrap();
//! assert_eq!(renamed, Path::new("photos/#=[beach]#year=2024##.jpg"));
//! ```

use crate::ser::encode_with_options;
use crate::{decode, Error, Result, TagOptions, TagSequence};
use std::borrow::Cow;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    /// Checks the file system: an existing directory is a `Directory`,
    /// anything else (including a missing path) is a `File`.
    #[must_use]
    pub fn of(path: &Path) -> Self {
        if path.is_dir() {
            PathKind::Directory
        } else {
            PathKind::File
        }
    }
}

/// Returns the stem of `path`, or `None` if it has no file name. Bytes that
/// are not valid UTF-8 are replaced with `U+FFFD`.
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use tagstring::path::{stem_of, PathKind};
///
/// let path = Path::new("a/archive.tar.gz");
/// assert_eq!(stem_of(path, PathKind::File).as_deref(), Some("archive.tar"));
/// assert_eq!(stem_of(path, PathKind::Directory).as_deref(), Some("archive.tar.gz"));
/// ```
#[must_use]
pub fn stem_of(path: &Path, kind: PathKind) -> Option<Cow<'_, str>> {
    let stem = match kind {
        PathKind::File => path.file_stem()?,
        PathKind::Directory => path.file_name()?,
    };
    Some(stem.to_string_lossy())
}

/// Decodes the stem of `path`, checking the file system for its kind.
#[must_use]
pub fn decode_stem(path: &Path) -> TagSequence {
    decode_stem_as(path, PathKind::of(path))
}

/// Decodes the stem of `path`. A path without a file name decodes to an
/// empty sequence.
#[must_use]
pub fn decode_stem_as(path: &Path, kind: PathKind) -> TagSequence {
    stem_of(path, kind)
        .map(|stem| decode(&stem))
        .unwrap_or_default()
}

/// Replaces the stem of `path` with the canonical encoding of `sequence`,
/// checking the file system for the path's kind.
///
/// # Errors
///
/// See [`with_canonical_stem_as`].
pub fn with_canonical_stem(path: &Path, sequence: &TagSequence) -> Result<PathBuf> {
    with_canonical_stem_as(path, sequence, PathKind::of(path))
}

/// Replaces the stem of `path` with the canonical encoding of `sequence`. The
/// parent directory and, for files, the final extension are kept.
///
/// # Errors
///
/// [`Error::InvalidPath`] if the path has no file name, its name is not
/// valid UTF-8, or `sequence` encodes to an empty stem. Otherwise any error
/// from [`crate::encode`].
pub fn with_canonical_stem_as(
    path: &Path,
    sequence: &TagSequence,
    kind: PathKind,
) -> Result<PathBuf> {
    utf8_name(path)?;

    let options = TagOptions::new().with_escape_dots(kind == PathKind::Directory);
    let stem = encode_with_options(sequence, &options)?;
    if stem.is_empty() {
        return Err(Error::invalid_path(&format!(
            "empty tag data would leave {} without a name",
            path.display()
        )));
    }
    let mut name = OsString::from(stem);
    if kind == PathKind::File {
        if let Some(extension) = path.extension() {
            name.push(".");
            name.push(extension);
        }
    }
    Ok(path.with_file_name(name))
}

/// Rewrites the stem of `path` in canonical form, checking the file system for
/// the path's kind.
///
/// # Errors
///
/// See [`with_canonical_stem`].
pub fn reformat(path: &Path) -> Result<PathBuf> {
    reformat_as(path, PathKind::of(path))
}

/// Rewrites the stem of `path` in canonical form. A stem without any block is
/// left alone, so plain file names are never wrapped in a tag string.
///
/// # Errors
///
/// [`Error::InvalidPath`] if the file name is not valid UTF-8, otherwise see
/// [`with_canonical_stem_as`].
///
/// # Examples
///
/// ```rust
/// use std::path::Path;
/// use tagstring::path::{reformat_as, PathKind};
///
/// let plain = Path::new("notes.txt");
/// assert_eq!(reformat_as(plain, PathKind::File).unwrap(), plain);
///
/// let tagged = Path::new("#b=2#a=1##.txt");
/// assert_eq!(
///     reformat_as(tagged, PathKind::File).unwrap(),
///     Path::new("#a=1#b=2##.txt")
/// );
/// ```
pub fn reformat_as(path: &Path, kind: PathKind) -> Result<PathBuf> {
    if path.file_name().is_none() {
        return Ok(path.to_path_buf());
    }
    utf8_name(path)?;
    let sequence = decode_stem_as(path, kind);
    if !sequence.has_blocks() {
        return Ok(path.to_path_buf());
    }
    with_canonical_stem_as(path, &sequence, kind)
}

fn utf8_name(path: &Path) -> Result<&str> {
    let name = path.file_name().ok_or_else(|| {
        Error::invalid_path(&format!("{} has no file name", path.display()))
    })?;
    name.to_str().ok_or_else(|| {
        Error::invalid_path(&format!("{} is not valid UTF-8", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TagItem, TagValue};

    #[test]
    fn test_stem_without_extension() {
        assert_eq!(stem_of(Path::new("plain"), PathKind::File).as_deref(), Some("plain"));
        assert_eq!(stem_of(Path::new(".hidden"), PathKind::File).as_deref(), Some(".hidden"));
        assert_eq!(stem_of(Path::new("/"), PathKind::File), None);
    }

    #[test]
    fn test_no_file_name_is_invalid() {
        let seq = TagSequence::from(vec![TagItem::Text("x".to_string())]);
        assert!(matches!(
            with_canonical_stem_as(Path::new("/"), &seq, PathKind::File),
            Err(Error::InvalidPath(_))
        ));
        assert!(decode_stem_as(Path::new("/"), PathKind::File).is_empty());
    }

    #[test]
    fn test_empty_stem_is_invalid() {
        for kind in [PathKind::File, PathKind::Directory] {
            assert!(matches!(
                with_canonical_stem_as(Path::new("dir/x.txt"), &TagSequence::new(), kind),
                Err(Error::InvalidPath(_))
            ));
        }
    }

    #[test]
    fn test_directory_escapes_dots() {
        let path = Path::new("library/v1.2#kind=album##");
        let seq = decode_stem_as(path, PathKind::Directory);
        let renamed = with_canonical_stem_as(path, &seq, PathKind::Directory).unwrap();
        assert_eq!(renamed, Path::new("library/#=[v1`x2e2]#kind=album##"));

        let back = decode_stem_as(&renamed, PathKind::Directory).combined();
        assert_eq!(back.get(""), Some(&TagValue::from(vec!["v1.2"])));
    }

    #[test]
    fn test_file_keeps_only_final_extension() {
        let path = Path::new("a.tar#t=x##.gz");
        let renamed = reformat_as(path, PathKind::File).unwrap();
        assert_eq!(renamed, Path::new("#=[a.tar]#t=x##.gz"));
    }
}
