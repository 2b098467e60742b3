//! Filename tokenizer and metadata extractor
//!
//! Region and hemisphere are found by searching filename tokens, never by
//! token position. Filename layouts differ between scanning batches, so any
//! fixed index eventually points at the wrong field.
//!
//! Pure functions, no I/O.

use super::vocabulary_loader::RegionVocabulary;
use hqc_common::{FileMetadata, Hemisphere};
use std::path::Path;

/// Characters that separate filename tokens. Runs collapse to one split point.
pub(crate) fn is_separator(c: char) -> bool {
    c == '_' || c == '-' || c.is_whitespace()
}

/// Remove the trailing extension from a filename.
///
/// A leading dot (hidden file) is not treated as an extension separator.
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => &filename[..idx],
        _ => filename,
    }
}

/// Split a filename into tokens.
///
/// The extension is stripped first, then the stem is split on runs of
/// underscore, hyphen or whitespace. No empty tokens are produced.
pub fn tokenize(filename: &str) -> Vec<&str> {
    strip_extension(filename)
        .split(is_separator)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract region and hemisphere from a filename.
///
/// - Hemisphere: the first of `RH`, `LH` present as a whole token. A name
///   carrying both resolves to `RH`.
/// - Region: the first vocabulary label (longest first) present as a whole
///   token.
///
/// Missing fields are `None`; extraction never fails.
pub fn extract(filename: &str, vocabulary: &RegionVocabulary) -> FileMetadata {
    let tokens = tokenize(filename);

    let hemisphere = Hemisphere::SEARCH_ORDER
        .into_iter()
        .find(|h| tokens.contains(&h.token()));

    let region = vocabulary
        .iter()
        .find(|label| tokens.contains(label))
        .map(str::to_string);

    FileMetadata { region, hemisphere }
}

/// [`extract`] applied to the final component of a path
pub fn extract_from_path(path: &Path, vocabulary: &RegionVocabulary) -> FileMetadata {
    match path.file_name() {
        Some(name) => extract(&name.to_string_lossy(), vocabulary),
        None => FileMetadata::default(),
    }
}
