//! File record types.

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// SHA1 of zero-length content.
const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
/// MD5 of zero-length content.
const EMPTY_MD5: &str = "d41d8cd98f00b204e9800998ecf8427e";

/// Content checksum reported by the scanner, stored as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(CompactString);

impl Checksum {
    /// Create a checksum from a hex digest.
    pub fn new(hex: impl AsRef<str>) -> Self {
        Self(CompactString::from(hex.as_ref().trim().to_ascii_lowercase()))
    }

    /// Get the digest as a hex string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Check if this is the digest of zero-length content.
    pub fn is_empty_content(&self) -> bool {
        self.0 == EMPTY_SHA1 || self.0 == EMPTY_MD5
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type of scanned entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Regular file.
    #[default]
    File,
    /// Directory.
    Directory,
}

impl FileKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileKind::File)
    }
}

/// A single file or directory from one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Normalized, slash-separated relative path.
    pub path: CompactString,

    /// Path exactly as reported by the scan.
    pub original_path: CompactString,

    /// Entry type.
    pub kind: FileKind,

    /// Content checksum (absent for directories).
    pub checksum: Option<Checksum>,

    /// Size in bytes.
    pub size: u64,

    /// Licenses, copyrights and any other scanner fields, passed through untouched.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub provenance: IndexMap<String, serde_json::Value>,
}

impl FileRecord {
    /// Create a regular file record.
    ///
    /// `path` is kept verbatim as `original_path` and normalized into `path`.
    pub fn new_file(path: impl AsRef<str>, checksum: Option<Checksum>, size: u64) -> Self {
        let original = path.as_ref();
        Self {
            path: normalize_path(original),
            original_path: CompactString::from(original),
            kind: FileKind::File,
            checksum,
            size,
            provenance: IndexMap::new(),
        }
    }

    /// Create a directory record.
    pub fn new_directory(path: impl AsRef<str>) -> Self {
        let original = path.as_ref();
        Self {
            path: normalize_path(original),
            original_path: CompactString::from(original),
            kind: FileKind::Directory,
            checksum: None,
            size: 0,
            provenance: IndexMap::new(),
        }
    }

    /// Attach an opaque provenance attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.provenance.insert(key.into(), value);
        self
    }

    /// Check if this record is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this record is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Check whether the content is known to be empty.
    pub fn has_empty_content(&self) -> bool {
        self.is_file()
            && (self.size == 0 || self.checksum.as_ref().is_some_and(Checksum::is_empty_content))
    }
}

/// Normalize a scanned path into a slash-separated relative path.
///
/// Backslashes become `/`, a leading root or `./` is dropped and empty or `.`
/// segments collapse. Case is preserved.
pub fn normalize_path(path: &str) -> CompactString {
    let unified = path.replace('\\', "/");
    let mut out = CompactString::default();
    for segment in unified.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}
