//! Domain values shared between the pairing pipeline and the review session

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder rendered when a filename carries no recognized region
pub const UNKNOWN_REGION: &str = "Unknown";

/// Placeholder rendered when a filename carries no hemisphere token
pub const UNKNOWN_HEMISPHERE: &str = "??";

/// Brain hemisphere marker, encoded in filenames as a whole `LH`/`RH` token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Hemisphere {
    /// Right hemisphere (`RH`)
    #[serde(rename = "RH")]
    Right,
    /// Left hemisphere (`LH`)
    #[serde(rename = "LH")]
    Left,
}

impl Hemisphere {
    /// Detection order used when scanning filename tokens.
    ///
    /// A filename carrying both tokens resolves to `RH`.
    pub const SEARCH_ORDER: [Hemisphere; 2] = [Hemisphere::Right, Hemisphere::Left];

    /// Filename token for this hemisphere
    pub fn token(self) -> &'static str {
        match self {
            Hemisphere::Right => "RH",
            Hemisphere::Left => "LH",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Metadata derived from a filename.
///
/// Never persisted; recomputed from the filename whenever it is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub region: Option<String>,
    pub hemisphere: Option<Hemisphere>,
}

impl FileMetadata {
    /// Both region and hemisphere were recognized
    pub fn is_resolved(&self) -> bool {
        self.region.is_some() && self.hemisphere.is_some()
    }

    /// Region for display, `Unknown` when absent
    pub fn region_label(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN_REGION)
    }

    /// Hemisphere for display, `??` when absent
    pub fn hemisphere_label(&self) -> &str {
        self.hemisphere.map_or(UNKNOWN_HEMISPHERE, Hemisphere::token)
    }
}

/// Reviewer verdict for one image pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Quality score in `-2..=2`
    Value(i8),
    /// Pair rejected as unusable
    Discard,
}

impl Score {
    /// Map a reviewer key to a score.
    ///
    /// Keys `1`..`5` map to `-2`..`+2`; `d` discards.
    pub fn from_key(key: &str) -> Option<Score> {
        match key {
            "1" => Some(Score::Value(-2)),
            "2" => Some(Score::Value(-1)),
            "3" => Some(Score::Value(0)),
            "4" => Some(Score::Value(1)),
            "5" => Some(Score::Value(2)),
            "d" | "D" => Some(Score::Discard),
            _ => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{:+}", v),
            Score::Discard => f.write_str("discard"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Value(v) => serializer.serialize_i8(*v),
            Score::Discard => serializer.serialize_str("discard"),
        }
    }
}

/// One row of the score sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRecord {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Rat_ID")]
    pub subject_id: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Hemisphere")]
    pub hemisphere: String,
    #[serde(rename = "Score")]
    pub score: Score,
    #[serde(rename = "Raw_Input")]
    pub raw_input: String,
}
