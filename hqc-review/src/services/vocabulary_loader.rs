//! Region vocabulary loader
//!
//! Reads the list of recognized anatomical region labels from a one-column
//! table. Only the first column is used; blank cells are ignored.

use super::metadata_extractor::is_separator;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Vocabulary loading errors.
///
/// All of them are fatal: the session cannot run without a vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// Vocabulary file does not exist
    #[error("Region vocabulary not found: {0}")]
    ConfigMissing(PathBuf),

    /// File was read but held no usable labels
    #[error("Region vocabulary {0} contains no labels")]
    ConfigEmpty(PathBuf),

    /// File exists but could not be read as a table
    #[error("Region vocabulary {path} is unreadable: {reason}")]
    ConfigUnreadable { path: PathBuf, reason: String },
}

/// Recognized region labels ordered longest first.
///
/// Labels are distinct. Matching against filename tokens is exact equality,
/// and the longest-first order makes a specific label win over a shorter one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionVocabulary {
    labels: Vec<String>,
}

impl RegionVocabulary {
    /// Build a vocabulary from raw labels.
    ///
    /// Labels are trimmed, empty ones dropped and duplicates collapsed to their
    /// first occurrence. Equal-length labels keep their input order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut labels: Vec<String> = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .filter(|l| seen.insert(l.clone()))
            .collect();

        labels.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        let vocabulary = Self { labels };
        for label in vocabulary.unmatchable() {
            tracing::warn!(
                label,
                "Region label contains a filename separator and can never match a token"
            );
        }
        vocabulary
    }

    /// Load a vocabulary from a one-column CSV table
    pub fn load(path: &Path, has_header: bool) -> Result<Self, VocabularyError> {
        if !path.exists() {
            return Err(VocabularyError::ConfigMissing(path.to_path_buf()));
        }

        let unreadable = |reason: String| VocabularyError::ConfigUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| unreadable(e.to_string()))?;

        let mut raw = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| unreadable(e.to_string()))?;
            if let Some(first) = record.get(0) {
                raw.push(first.to_string());
            }
        }

        let vocabulary = Self::new(raw);
        if vocabulary.is_empty() {
            return Err(VocabularyError::ConfigEmpty(path.to_path_buf()));
        }

        tracing::info!(
            path = %path.display(),
            count = vocabulary.len(),
            "Loaded region vocabulary"
        );

        Ok(vocabulary)
    }

    /// Labels in matching order (longest first)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels in matching order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Labels containing `_`, `-` or whitespace.
    ///
    /// Filenames are split on those characters, so no single token equals
    /// such a label.
    pub fn unmatchable(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|label| label.chars().any(is_separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_sorted_longest_first() {
        let vocab = RegionVocabulary::new(["MO", "MOs", "DG", "vlORB"]);
        assert_eq!(vocab.labels(), &["vlORB", "MOs", "MO", "DG"]);
    }

    #[test]
    fn test_trims_and_drops_blanks_and_duplicates() {
        let vocab = RegionVocabulary::new([" CA1 ", "", "   ", "CA1", "CA3"]);
        assert_eq!(vocab.labels(), &["CA1", "CA3"]);
    }

    #[test]
    fn test_separator_labels_are_unmatchable() {
        let vocab = RegionVocabulary::new(["CA 1", "CA-1", "CA1", "DG"]);
        // Kept in the vocabulary, but flagged
        assert_eq!(vocab.len(), 4);
        let unmatchable: Vec<&str> = vocab.unmatchable().collect();
        assert_eq!(unmatchable, vec!["CA 1", "CA-1"]);

        let meta = crate::services::extract("Rat1_CA 1_RH.tif", &vocab);
        assert_eq!(meta.region, None);
    }

    #[test]
    fn test_load_first_column_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.csv");
        fs::write(&path, "PrL,prelimbic\nCA1\n\nACC, anterior cingulate\n  DG  \n").unwrap();

        let vocab = RegionVocabulary::load(&path, false).unwrap();
        assert_eq!(vocab.labels(), &["PrL", "CA1", "ACC", "DG"]);
    }

    #[test]
    fn test_load_skips_header_when_configured() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.csv");
        fs::write(&path, "Region\nCA1\nCA3\n").unwrap();

        let vocab = RegionVocabulary::load(&path, true).unwrap();
        assert_eq!(vocab.labels(), &["CA1", "CA3"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = RegionVocabulary::load(Path::new("/nonexistent/regions.csv"), false);
        match result {
            Err(VocabularyError::ConfigMissing(_)) => {}
            other => panic!("Expected ConfigMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_load_blank_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("regions.csv");
        fs::write(&path, "\n  \n,\n").unwrap();

        let result = RegionVocabulary::load(&path, false);
        match result {
            Err(VocabularyError::ConfigEmpty(_)) => {}
            other => panic!("Expected ConfigEmpty, got {:?}", other),
        }
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let result = RegionVocabulary::load(temp_dir.path(), false);
        match result {
            Err(VocabularyError::ConfigUnreadable { .. }) => {}
            other => panic!("Expected ConfigUnreadable, got {:?}", other),
        }
    }
}
