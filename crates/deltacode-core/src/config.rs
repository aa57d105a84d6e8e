//! Comparison configuration types.

use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for comparing two scans.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default)]
pub struct DeltaConfig {
    /// Pair files by checksum across paths and report them as moved.
    ///
    /// When disabled, a renamed file is reported as added plus removed.
    #[builder(default = "false")]
    pub detect_moves: bool,

    /// Count directory deltas in the headline counters.
    #[builder(default = "true")]
    pub count_directories: bool,

    /// Align root prefixes before matching paths.
    #[builder(default = "true")]
    pub align_paths: bool,

    /// Never pair empty files by checksum.
    #[builder(default = "true")]
    pub ignore_empty_files: bool,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            detect_moves: false,
            count_directories: true,
            align_paths: true,
            ignore_empty_files: true,
        }
    }
}

impl DeltaConfig {
    /// Create a new config builder.
    pub fn builder() -> DeltaConfigBuilder {
        DeltaConfigBuilder::default()
    }

    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            message: source.to_string(),
        })
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }
}
