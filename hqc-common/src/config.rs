//! Configuration loading and path resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`HQC_CONFIG`)
//! 3. Per-user config file (`<config_dir>/hqc/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is never fatal. A config file that exists but cannot
//! be parsed is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HQC_CONFIG";

/// Environment variable naming the region vocabulary file
pub const VOCABULARY_ENV_VAR: &str = "HQC_VOCABULARY";

/// Vocabulary filename looked up next to the executable
pub const DEFAULT_VOCABULARY_FILE: &str = "regions.csv";

/// Tool configuration loaded from TOML.
///
/// Every field has a built-in default, so an empty file is a valid config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// One-column table of region labels
    pub vocabulary_file: PathBuf,

    /// First row of the vocabulary table is a header, not a label
    pub vocabulary_has_header: bool,

    /// Images drawn per hemisphere per region
    pub samples_per_hemisphere: usize,

    /// Extension of raw scans (without the dot)
    pub raw_extension: String,

    /// Appended to a raw image's base name to form its mask name
    pub mask_suffix: String,

    /// Mask extensions, tried in order
    pub mask_extensions: Vec<String>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            vocabulary_file: PathBuf::from(DEFAULT_VOCABULARY_FILE),
            vocabulary_has_header: false,
            samples_per_hemisphere: 1,
            raw_extension: "tif".to_string(),
            mask_suffix: "_Object Predictions".to_string(),
            mask_extensions: vec!["jpeg".to_string(), "jpg".to_string()],
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve and load the config, falling back to defaults when no file exists.
    ///
    /// Nothing is logged here since this runs before the tracing subscriber
    /// exists; call [`ConfigSource::log`] once it does.
    pub fn load(cli_arg: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match resolve_config_path(cli_arg) {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                Ok((config, ConfigSource::File(path)))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.samples_per_hemisphere == 0 {
            return Err(Error::Config(
                "samples_per_hemisphere must be at least 1".to_string(),
            ));
        }
        if self.raw_extension.trim().is_empty() {
            return Err(Error::Config("raw_extension must not be empty".to_string()));
        }
        if self.mask_extensions.is_empty() {
            return Err(Error::Config(
                "mask_extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a loaded [`TomlConfig`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// This file was requested but does not exist; defaults in use
    Missing(PathBuf),
    /// No config file requested or found; defaults in use
    Defaults,
}

impl ConfigSource {
    /// Report the config origin. A missing file is a warning.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Missing(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::Defaults => info!("No config file, using built-in defaults"),
        }
    }
}

/// Locate the config file following the priority order above.
///
/// Returns `None` when neither an explicit path nor a per-user file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    dirs::config_dir()
        .map(|d| d.join("hqc").join("config.toml"))
        .filter(|p| p.exists())
}

/// Locate the region vocabulary file.
///
/// Priority: command-line argument, then `HQC_VOCABULARY`, then the config
/// value. A relative config value that does not exist under the working
/// directory is looked up next to the running executable.
pub fn resolve_vocabulary_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(VOCABULARY_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    let configured = &config.vocabulary_file;
    if configured.is_absolute() || configured.exists() {
        return configured.clone();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(configured)))
        .filter(|p| p.exists())
        .unwrap_or_else(|| configured.clone())
}
