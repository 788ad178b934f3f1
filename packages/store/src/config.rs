//! Store configuration

use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scheme used when a URI carries no scheme delimiter
pub const DEFAULT_SCHEME: &str = "file";

/// Longest scheme token accepted by default
pub const DEFAULT_MAX_SCHEME_LEN: usize = 255;

/// Front-end configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Scheme tokens longer than this are rejected
    #[serde(default = "default_max_scheme_len")]
    pub max_scheme_len: usize,
    /// Scheme for URIs without a delimiter
    #[serde(default = "default_scheme")]
    pub default_scheme: String,
    /// Built-in `file` loader settings
    #[serde(default)]
    pub file: FileLoaderConfig,
}

/// Settings for the built-in `file` loader
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLoaderConfig {
    /// Upper bound on bytes read from one file or stream
    #[serde(default = "default_max_input_size")]
    pub max_input_size: u64,
}

impl Default for FileLoaderConfig {
    fn default() -> Self {
        Self {
            max_input_size: default_max_input_size(),
        }
    }
}

fn default_max_scheme_len() -> usize {
    DEFAULT_MAX_SCHEME_LEN
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_max_input_size() -> u64 {
    16 * 1024 * 1024 // 16 MiB
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_scheme_len: default_max_scheme_len(),
            default_scheme: default_scheme(),
            file: FileLoaderConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Location of the per-user configuration file
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cryypt").join("store.json"))
    }

    /// Load the per-user configuration, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but is invalid.
    pub fn load_default() -> Result<Self> {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine OS config directory, using default store config");
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(path = %path.display(), "No store config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_path(&path)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.max_scheme_len == 0 {
            return Err(StoreError::Config("max_scheme_len must be positive".into()));
        }
        if self.default_scheme.is_empty() {
            return Err(StoreError::Config("default_scheme must not be empty".into()));
        }
        if self.default_scheme.len() > self.max_scheme_len {
            return Err(StoreError::Config(format!(
                "default_scheme is longer than max_scheme_len ({})",
                self.max_scheme_len
            )));
        }
        if self.file.max_input_size == 0 {
            return Err(StoreError::Config("file.max_input_size must be positive".into()));
        }
        Ok(())
    }
}
