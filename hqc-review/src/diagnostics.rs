//! Filename layout diagnostics
//!
//! Shows how filenames are tokenized and what the extractor makes of them,
//! and what a sampling run would select, without starting a review.

use crate::services::{extract, tokenize, GroupedImages, RegionVocabulary};
use hqc_common::FileMetadata;
use std::fmt;

/// Tokens and extracted metadata for one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameDiagnosis {
    pub file_name: String,
    pub tokens: Vec<String>,
    pub metadata: FileMetadata,
}

pub fn diagnose_filename(file_name: &str, vocabulary: &RegionVocabulary) -> FilenameDiagnosis {
    FilenameDiagnosis {
        file_name: file_name.to_string(),
        tokens: tokenize(file_name).into_iter().map(str::to_string).collect(),
        metadata: extract(file_name, vocabulary),
    }
}

impl fmt::Display for FilenameDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Example filename: {}", self.file_name)?;
        for (i, token) in self.tokens.iter().enumerate() {
            writeln!(f, "  Index [{}]: {}", i, token)?;
        }
        write!(
            f,
            "Region: {}  Hemisphere: {}",
            self.metadata.region_label(),
            self.metadata.hemisphere_label()
        )
    }
}

/// Candidate and planned-selection counts for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPlan {
    pub region: String,
    pub rh_candidates: usize,
    pub lh_candidates: usize,
    pub rh_selected: usize,
    pub lh_selected: usize,
}

/// Per-region counts a sampling run with this cap would produce
pub fn selection_plan(grouped: &GroupedImages, cap_per_hemisphere: usize) -> Vec<RegionPlan> {
    grouped
        .groups()
        .iter()
        .map(|g| RegionPlan {
            region: g.region.clone(),
            rh_candidates: g.right.len(),
            lh_candidates: g.left.len(),
            rh_selected: g.right.len().min(cap_per_hemisphere),
            lh_selected: g.left.len().min(cap_per_hemisphere),
        })
        .collect()
}

impl fmt::Display for RegionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Group '{}': RH {} of {}, LH {} of {}",
            self.region, self.rh_selected, self.rh_candidates, self.lh_selected, self.lh_candidates
        )
    }
}
