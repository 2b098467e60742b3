//! Review session state
//!
//! Holds the pre-computed pair list, the index of the pair under review and
//! the append-only list of score records. The pair list never changes once
//! the session starts.

use crate::score_sheet::ScoreSink;
use crate::services::ImagePair;
use hqc_common::{Score, ScoreRecord};
use tracing::{info, warn};

/// Interpretation of one reviewer input token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Score(Score),
    Stop,
    Unrecognized,
}

impl SessionInput {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if let Some(score) = Score::from_key(token) {
            return SessionInput::Score(score);
        }
        match token {
            "q" | "Q" | "esc" | "escape" => SessionInput::Stop,
            _ => SessionInput::Unrecognized,
        }
    }
}

/// Outcome of handling one input token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// Score recorded, session moved to the next pair
    Recorded(ScoreRecord),
    /// Reviewer stopped the session
    Stopped,
    /// Token was not a score or command
    Ignored,
    /// No pair left to review
    Finished,
}

#[derive(Debug)]
pub struct ReviewSession {
    subject_id: String,
    pairs: Vec<ImagePair>,
    current: usize,
    results: Vec<ScoreRecord>,
    stopped: bool,
}

impl ReviewSession {
    pub fn new(subject_id: String, pairs: Vec<ImagePair>) -> Self {
        Self {
            subject_id,
            pairs,
            current: 0,
            results: Vec::new(),
            stopped: false,
        }
    }

    /// Pair under review, `None` once finished or stopped
    pub fn current(&self) -> Option<&ImagePair> {
        if self.stopped {
            return None;
        }
        self.pairs.get(self.current)
    }

    /// Zero-based index of the pair under review
    pub fn index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    pub fn was_stopped(&self) -> bool {
        self.stopped
    }

    pub fn results(&self) -> &[ScoreRecord] {
        &self.results
    }

    /// Header line for the pair under review, e.g. `Image 2/5: name.tif`
    pub fn title(&self) -> Option<String> {
        self.current().map(|pair| {
            format!(
                "Image {}/{}: {}",
                self.current + 1,
                self.pairs.len(),
                pair.raw_file_name()
            )
        })
    }

    /// Apply one reviewer token.
    ///
    /// A score is appended to the log and handed to `sink`. A sink failure is
    /// logged and the session continues.
    pub fn handle_input<S>(&mut self, token: &str, sink: &mut S) -> SessionStep
    where
        S: ScoreSink + ?Sized,
    {
        let Some(pair) = self.current() else {
            return SessionStep::Finished;
        };

        match SessionInput::parse(token) {
            SessionInput::Score(score) => {
                let record = ScoreRecord {
                    filename: pair.raw_file_name(),
                    subject_id: self.subject_id.clone(),
                    region: pair.metadata.region_label().to_string(),
                    hemisphere: pair.metadata.hemisphere_label().to_string(),
                    score,
                    raw_input: token.trim().to_string(),
                };
                info!("Scored {} for {}", score, record.filename);

                if let Err(e) = sink.append(&record) {
                    warn!("Save failed: {}", e);
                }

                self.results.push(record.clone());
                self.current += 1;
                SessionStep::Recorded(record)
            }
            SessionInput::Stop => {
                info!("Stopped by user");
                self.stopped = true;
                SessionStep::Stopped
            }
            SessionInput::Unrecognized => SessionStep::Ignored,
        }
    }
}
