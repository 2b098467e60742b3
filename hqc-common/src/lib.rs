//! # HQC Common Library
//!
//! Shared code for the histology QC tools including:
//! - Error types
//! - Configuration loading and resolution
//! - Logging initialization
//! - Domain values shared between the pairing pipeline and the review session

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{Error, Result};
pub use types::{FileMetadata, Hemisphere, Score, ScoreRecord};
