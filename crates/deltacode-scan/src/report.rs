//! Serde model of a ScanCode-style JSON report.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use deltacode_core::{Checksum, FileKind, FileRecord, LoadError, ScanHeader};

/// Top-level report document.
#[derive(Debug, Deserialize)]
pub(crate) struct RawReport {
    #[serde(default)]
    pub scancode_version: Option<String>,
    #[serde(default)]
    pub scancode_options: IndexMap<String, Value>,
    /// Count declared by the scanner; advisory only.
    #[serde(default)]
    pub files_count: Option<usize>,
    pub files: Vec<RawFile>,
}

impl RawReport {
    pub fn header(&self) -> ScanHeader {
        ScanHeader {
            scanner_version: self.scancode_version.clone(),
            options: self.scancode_options.clone(),
        }
    }
}

/// One entry of the `files` array.
#[derive(Debug, Deserialize)]
pub(crate) struct RawFile {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    /// Everything else: licenses, copyrights, dates, other digests.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl RawFile {
    /// Convert into a record, keeping the scanned path verbatim as `original_path`.
    pub fn into_record(self, index: usize) -> Result<FileRecord, LoadError> {
        if self.path.trim().is_empty() {
            return Err(LoadError::InvalidRecord {
                index,
                message: "empty path".to_string(),
            });
        }

        let kind = match self.kind.as_deref() {
            None | Some("file") => FileKind::File,
            Some("directory") => FileKind::Directory,
            Some(other) => {
                return Err(LoadError::InvalidRecord {
                    index,
                    message: format!("unknown entry type '{other}'"),
                });
            }
        };

        let mut record = match kind {
            FileKind::File => {
                let checksum = self
                    .sha1
                    .filter(|s| !s.trim().is_empty())
                    .map(Checksum::new);
                FileRecord::new_file(&self.path, checksum, self.size.unwrap_or(0))
            }
            FileKind::Directory => {
                let mut dir = FileRecord::new_directory(&self.path);
                dir.size = self.size.unwrap_or(0);
                dir
            }
        };
        if record.path.is_empty() {
            return Err(LoadError::InvalidRecord {
                index,
                message: format!("empty path after normalization of '{}'", self.path),
            });
        }
        record.provenance = self.extra;
        Ok(record)
    }
}
