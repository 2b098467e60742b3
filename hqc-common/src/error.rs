//! Common error types for HQC

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for HQC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across HQC tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file exists but is not valid TOML for [`crate::config::TomlConfig`]
    #[error("Malformed config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
