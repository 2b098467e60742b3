//! Raw image to prediction-mask pairing
//!
//! The mask for `X.tif` is `X<suffix>.<ext>`, with each configured extension
//! tried in order. This is the only filesystem existence check in the
//! pairing pipeline.

use hqc_common::FileMetadata;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A raw scan matched with its prediction mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePair {
    pub raw: PathBuf,
    pub mask: PathBuf,
    pub metadata: FileMetadata,
}

impl ImagePair {
    /// Filename of the raw scan
    pub fn raw_file_name(&self) -> String {
        self.raw
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Locates prediction masks next to raw scans
#[derive(Debug, Clone)]
pub struct PairResolver {
    mask_suffix: String,
    mask_extensions: Vec<String>,
}

impl PairResolver {
    pub fn new<S: AsRef<str>>(mask_suffix: &str, mask_extensions: &[S]) -> Self {
        Self {
            mask_suffix: mask_suffix.to_string(),
            mask_extensions: mask_extensions
                .iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Candidate mask paths for a raw image, in lookup order
    pub fn candidates(&self, raw_path: &Path) -> Vec<PathBuf> {
        let stem = match raw_path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => return Vec::new(),
        };

        self.mask_extensions
            .iter()
            .map(|ext| raw_path.with_file_name(format!("{}{}.{}", stem, self.mask_suffix, ext)))
            .collect()
    }

    /// First existing mask for `raw_path`, if any
    pub fn find_mask(&self, raw_path: &Path) -> Option<PathBuf> {
        self.candidates(raw_path).into_iter().find(|p| p.is_file())
    }

    /// Pair a raw image with its mask.
    ///
    /// Returns `None` when no candidate mask exists; the caller logs and skips.
    pub fn resolve(&self, raw_path: &Path, metadata: FileMetadata) -> Option<ImagePair> {
        let mask = self.find_mask(raw_path)?;
        Some(ImagePair {
            raw: raw_path.to_path_buf(),
            mask,
            metadata,
        })
    }
}
