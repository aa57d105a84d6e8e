//! Delta types: the classified outcome for one file across two scans.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::record::FileRecord;

/// Classification of a file between the old and new scan.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeltaStatus {
    /// Present only in the new scan.
    Added,
    /// Present only in the old scan.
    Removed,
    /// Paired, content differs.
    Modified,
    /// Paired, content identical.
    Unchanged,
    /// Paired by content at a different path.
    Moved,
}

/// The classified outcome for one file or matched pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    /// Outcome category.
    pub status: DeltaStatus,
    /// Record from the new scan (absent when removed).
    pub new_file: Option<FileRecord>,
    /// Record from the old scan (absent when added).
    pub old_file: Option<FileRecord>,
}

impl Delta {
    /// Create a delta for a file only present in the new scan.
    pub fn added(new_file: FileRecord) -> Self {
        Self {
            status: DeltaStatus::Added,
            new_file: Some(new_file),
            old_file: None,
        }
    }

    /// Create a delta for a file only present in the old scan.
    pub fn removed(old_file: FileRecord) -> Self {
        Self {
            status: DeltaStatus::Removed,
            new_file: None,
            old_file: Some(old_file),
        }
    }

    /// Create a delta for a matched pair.
    pub fn paired(status: DeltaStatus, new_file: FileRecord, old_file: FileRecord) -> Self {
        Self {
            status,
            new_file: Some(new_file),
            old_file: Some(old_file),
        }
    }

    /// Path used for ordering and display: new side first, then old.
    pub fn path(&self) -> &str {
        self.new_file
            .as_ref()
            .or(self.old_file.as_ref())
            .map(|f| f.path.as_str())
            .unwrap_or_default()
    }

    /// Check if every present side is a directory.
    ///
    /// A directory replaced by a regular file (or the reverse) is not.
    pub fn is_dir(&self) -> bool {
        [&self.new_file, &self.old_file]
            .into_iter()
            .flatten()
            .all(FileRecord::is_dir)
    }
}

/// Per-status counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaStats {
    pub added: usize,
    pub modified: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Only reported when rename detection is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved: Option<usize>,
}

impl DeltaStats {
    /// Count one delta.
    pub fn record(&mut self, status: DeltaStatus) {
        match status {
            DeltaStatus::Added => self.added += 1,
            DeltaStatus::Removed => self.removed += 1,
            DeltaStatus::Modified => self.modified += 1,
            DeltaStatus::Unchanged => self.unchanged += 1,
            DeltaStatus::Moved => *self.moved.get_or_insert(0) += 1,
        }
    }

    /// Get the counter for a status.
    pub fn get(&self, status: DeltaStatus) -> usize {
        match status {
            DeltaStatus::Added => self.added,
            DeltaStatus::Removed => self.removed,
            DeltaStatus::Modified => self.modified,
            DeltaStatus::Unchanged => self.unchanged,
            DeltaStatus::Moved => self.moved.unwrap_or(0),
        }
    }

    /// Sum of all counters.
    pub fn total(&self) -> usize {
        self.added + self.modified + self.removed + self.unchanged + self.moved.unwrap_or(0)
    }
}

/// Flattened delta for machine-readable listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaEntry {
    pub status: DeltaStatus,
    pub new_path: Option<String>,
    pub old_path: Option<String>,
    pub new_sha1: Option<String>,
    pub old_sha1: Option<String>,
}

impl From<&Delta> for DeltaEntry {
    fn from(delta: &Delta) -> Self {
        let path = |f: &Option<FileRecord>| f.as_ref().map(|f| f.original_path.to_string());
        let sha1 = |f: &Option<FileRecord>| {
            f.as_ref()
                .and_then(|f| f.checksum.as_ref())
                .map(|c| c.as_str().to_string())
        };
        Self {
            status: delta.status,
            new_path: path(&delta.new_file),
            old_path: path(&delta.old_file),
            new_sha1: sha1(&delta.new_file),
            old_sha1: sha1(&delta.old_file),
        }
    }
}

/// Serializable comparison result.
///
/// `deltas_count` and `deltacode_stats` are `null` when either scan was
/// unavailable, which keeps "no result" distinct from "no differences".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaReport {
    pub deltas_count: Option<usize>,
    pub deltacode_stats: Option<DeltaStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltas: Option<Vec<DeltaEntry>>,
}

impl DeltaReport {
    /// Check if a comparison was actually performed.
    pub fn is_available(&self) -> bool {
        self.deltas_count.is_some()
    }
}
