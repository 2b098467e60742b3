//! Raw image discovery
//!
//! Lists raw scans for one subject in a single directory. Subdirectories are
//! not descended into.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Raw image scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory listing itself failed
    #[error("Cannot read directory {0}: {1}")]
    DirectoryRead(PathBuf, String),
}

/// Raw image scanner
pub struct FileScanner {
    raw_extension: String,
    ignore_patterns: Vec<String>,
}

impl FileScanner {
    /// Create a scanner for raw images with the given extension (no dot).
    ///
    /// Ignores system files like .DS_Store and Thumbs.db, plus macOS
    /// resource-fork files (`._name.tif`).
    pub fn new(raw_extension: &str) -> Self {
        Self {
            raw_extension: raw_extension.trim_start_matches('.').to_lowercase(),
            ignore_patterns: vec![
                ".DS_Store".to_string(),
                "Thumbs.db".to_string(),
                "._".to_string(),
            ],
        }
    }

    /// Find raw images in `directory` whose filename contains `subject_id`.
    ///
    /// Returns paths sorted by filename. An empty result is not an error;
    /// the caller decides whether it is fatal.
    pub fn discover(
        &self,
        directory: &Path,
        subject_id: &str,
    ) -> Result<Vec<PathBuf>, ScanError> {
        if !directory.exists() {
            return Err(ScanError::PathNotFound(directory.to_path_buf()));
        }

        if !directory.is_dir() {
            return Err(ScanError::NotADirectory(directory.to_path_buf()));
        }

        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if self.is_candidate(&entry, subject_id) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    // The root itself failing means nothing can be listed
                    if e.depth() == 0 {
                        return Err(ScanError::DirectoryRead(
                            directory.to_path_buf(),
                            e.to_string(),
                        ));
                    }
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        tracing::debug!(
            directory = %directory.display(),
            subject = %subject_id,
            count = files.len(),
            "Raw image discovery complete"
        );

        Ok(files)
    }

    /// Regular file, not ignored, subject in name, raw extension
    fn is_candidate(&self, entry: &DirEntry, subject_id: &str) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }

        let file_name = entry.file_name().to_string_lossy();

        if self
            .ignore_patterns
            .iter()
            .any(|pattern| file_name.starts_with(pattern.as_str()))
        {
            return false;
        }

        file_name.contains(subject_id) && self.has_raw_extension(entry.path())
    }

    /// Extension check is case-insensitive
    fn has_raw_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.raw_extension)
            .unwrap_or(false)
    }

    /// List up to `limit` entry names in a directory, for diagnostics
    pub fn sample_entries(directory: &Path, limit: usize) -> Result<Vec<String>, ScanError> {
        let entries = std::fs::read_dir(directory)
            .map_err(|e| ScanError::DirectoryRead(directory.to_path_buf(), e.to_string()))?;

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.truncate(limit);
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let scanner = FileScanner::new("tif");
        let result = scanner.discover(Path::new("/nonexistent/path"), "Rat1");
        match result.unwrap_err() {
            ScanError::PathNotFound(_) => {}
            other => panic!("Expected PathNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_as_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "plain.txt");

        let scanner = FileScanner::new("tif");
        let result = scanner.discover(&temp_dir.path().join("plain.txt"), "Rat1");
        match result.unwrap_err() {
            ScanError::NotADirectory(_) => {}
            other => panic!("Expected NotADirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FileScanner::new("tif");
        let result = scanner.discover(temp_dir.path(), "Rat1").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_filters_subject_and_extension() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        touch(dir, "Rat1_CA1_RH.tif");
        touch(dir, "Rat1_CA1_LH.TIF");
        touch(dir, "Rat2_CA1_RH.tif");
        touch(dir, "Rat1_CA1_RH_Object Predictions.jpeg");
        touch(dir, "Rat1_notes.txt");
        touch(dir, "._Rat1_CA1_RH.tif");

        let scanner = FileScanner::new("tif");
        let found = scanner.discover(dir, "Rat1").unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["Rat1_CA1_LH.TIF", "Rat1_CA1_RH.tif"]);
    }

    #[test]
    fn test_does_not_recurse() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "Rat1_CA1_RH.tif");
        // A directory whose name looks like a raw image is skipped too
        fs::create_dir(temp_dir.path().join("Rat1_dir.tif")).unwrap();

        let scanner = FileScanner::new(".tif");
        let found = scanner.discover(temp_dir.path(), "Rat1").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_sample_entries_limit() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..8 {
            touch(temp_dir.path(), &format!("file{}.png", i));
        }
        let names = FileScanner::sample_entries(temp_dir.path(), 5).unwrap();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], "file0.png");
    }
}
