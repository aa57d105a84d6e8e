//! Scan result container.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::FileRecord;

/// Metadata reported by the scanner alongside the file list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanHeader {
    /// Scanner version string.
    pub scanner_version: Option<String>,
    /// Options the scanner was run with.
    #[serde(default)]
    pub options: IndexMap<String, serde_json::Value>,
}

/// One loaded snapshot.
///
/// A scan result is either available (`files` and `files_count` both set) or
/// unavailable because the source could not be loaded. Construction never
/// fails; callers check [`ScanResult::is_available`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Location the scan was loaded from, as given by the caller.
    pub source_path: PathBuf,

    /// Loaded records, in scan order.
    pub files: Option<Vec<FileRecord>>,

    /// Number of loaded records.
    pub files_count: Option<usize>,

    /// Scanner metadata.
    #[serde(default)]
    pub header: ScanHeader,
}

impl ScanResult {
    /// Create an unavailable result for a source that could not be loaded.
    pub fn unavailable(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            files: None,
            files_count: None,
            header: ScanHeader::default(),
        }
    }

    /// Create an available result from loaded records.
    pub fn from_files(source_path: impl Into<PathBuf>, files: Vec<FileRecord>) -> Self {
        Self {
            source_path: source_path.into(),
            files_count: Some(files.len()),
            files: Some(files),
            header: ScanHeader::default(),
        }
    }

    /// Attach scanner metadata.
    pub fn with_header(mut self, header: ScanHeader) -> Self {
        self.header = header;
        self
    }

    /// Check if the scan loaded successfully.
    pub fn is_available(&self) -> bool {
        self.files.is_some() && self.files_count.is_some()
    }

    /// Get the source location.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Get the loaded records, if any.
    pub fn files(&self) -> Option<&[FileRecord]> {
        self.files.as_deref()
    }

    /// Iterate over loaded records (empty when unavailable).
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().flatten()
    }

    /// Get scanner metadata.
    pub fn header(&self) -> &ScanHeader {
        &self.header
    }

    /// Total size of all regular files.
    pub fn total_size(&self) -> u64 {
        self.iter().filter(|f| f.is_file()).map(|f| f.size).sum()
    }
}
