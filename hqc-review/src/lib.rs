//! hqc-review library interface
//!
//! Pairs raw histology scans with their prediction masks for manual quality
//! review:
//! - [`services`]: vocabulary loading, filename metadata extraction, discovery,
//!   grouping/sampling and mask pairing
//! - [`pipeline`]: runs the services end to end
//! - [`session`], [`console`], [`score_sheet`]: the review loop and its output
//! - [`diagnostics`]: filename layout inspection

pub mod console;
pub mod diagnostics;
pub mod pipeline;
pub mod score_sheet;
pub mod services;
pub mod session;

pub use pipeline::{PairingPipeline, PairingReport, PairingWarning};
pub use score_sheet::{CsvScoreSheet, ScoreSheetError, ScoreSink};
pub use session::{ReviewSession, SessionInput, SessionStep};
