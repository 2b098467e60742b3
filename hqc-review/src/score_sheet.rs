//! Score persistence
//!
//! The score sheet is rewritten in full after every record so an interrupted
//! session loses at most the pair being reviewed. Writes go to a temporary
//! file which is then renamed over the target.

use hqc_common::ScoreRecord;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Score sheet write errors
#[derive(Debug, Error)]
pub enum ScoreSheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Receives one record per reviewed pair
pub trait ScoreSink {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), ScoreSheetError>;
}

impl ScoreSink for Vec<ScoreRecord> {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), ScoreSheetError> {
        self.push(record.clone());
        Ok(())
    }
}

/// CSV score sheet with columns
/// `Filename, Rat_ID, Region, Hemisphere, Score, Raw_Input`
#[derive(Debug)]
pub struct CsvScoreSheet {
    path: PathBuf,
    rows: Vec<ScoreRecord>,
}

impl CsvScoreSheet {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rows: Vec::new(),
        }
    }

    /// `<folder>/<subject>_QC_Scores.csv`
    pub fn default_path(folder: &Path, subject_id: &str) -> PathBuf {
        folder.join(format!("{}_QC_Scores.csv", subject_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[ScoreRecord] {
        &self.rows
    }

    /// Write every accumulated row to disk.
    ///
    /// On failure the temporary file is removed and the previous sheet, if
    /// any, is left untouched.
    pub fn save(&self) -> Result<(), ScoreSheetError> {
        let tmp_path = temp_path(&self.path);

        let result = self
            .write_rows(&tmp_path)
            .and_then(|()| std::fs::rename(&tmp_path, &self.path).map_err(ScoreSheetError::from));
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp_path);
        }
        result
    }

    fn write_rows(&self, path: &Path) -> Result<(), ScoreSheetError> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl ScoreSink for CsvScoreSheet {
    fn append(&mut self, record: &ScoreRecord) -> Result<(), ScoreSheetError> {
        self.rows.push(record.clone());
        self.save()
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hqc_common::Score;
    use std::fs;
    use tempfile::TempDir;

    fn record(filename: &str, score: Score, raw: &str) -> ScoreRecord {
        ScoreRecord {
            filename: filename.to_string(),
            subject_id: "Rat1".to_string(),
            region: "CA1".to_string(),
            hemisphere: "RH".to_string(),
            score,
            raw_input: raw.to_string(),
        }
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            CsvScoreSheet::default_path(Path::new("/data"), "Rat461707"),
            PathBuf::from("/data/Rat461707_QC_Scores.csv")
        );
    }

    #[test]
    fn test_append_rewrites_full_sheet() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.csv");
        let mut sheet = CsvScoreSheet::new(path.clone());

        sheet.append(&record("a.tif", Score::Value(-2), "1")).unwrap();
        sheet.append(&record("b.tif", Score::Discard, "d")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Filename,Rat_ID,Region,Hemisphere,Score,Raw_Input",
                "a.tif,Rat1,CA1,RH,-2,1",
                "b.tif,Rat1,CA1,RH,discard,d",
            ]
        );
        assert!(!temp_dir.path().join("scores.csv.tmp").exists());
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let mut sheet = CsvScoreSheet::new(PathBuf::from("/nonexistent/dir/scores.csv"));
        assert!(sheet.append(&record("a.tif", Score::Value(0), "3")).is_err());
        // Row is still held for the next attempt
        assert_eq!(sheet.rows().len(), 1);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // A directory at the target path makes the final rename fail
        let path = temp_dir.path().join("scores.csv");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"").unwrap();

        let mut sheet = CsvScoreSheet::new(path.clone());
        assert!(sheet.append(&record("a.tif", Score::Value(1), "4")).is_err());

        assert!(!temp_dir.path().join("scores.csv.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
