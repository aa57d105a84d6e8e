//! Error types for loading and comparing scans.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two scans an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ScanSide {
    New,
    Old,
}

/// Errors that can occur while loading a scan report.
///
/// Loaders turn these into an unavailable [`ScanResult`](crate::ScanResult);
/// they never reach the comparison engine.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No source location was given.
    #[error("No scan location given")]
    EmptyPath,

    /// Source not found.
    #[error("Scan not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report is not valid JSON or lacks required fields.
    #[error("Invalid scan report {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A file entry could not be turned into a record.
    #[error("Invalid file entry #{index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

impl LoadError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Internal consistency fault: a file was dropped or counted twice.
///
/// This indicates a logic defect, not bad input, and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// Deltas referencing one side do not add up to that side's file count.
    #[error("{side} scan has {expected} files but {actual} deltas reference it")]
    CountMismatch {
        side: ScanSide,
        expected: usize,
        actual: usize,
    },
}

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {message}")]
    Parse { message: String },
}
