//! Comparison engine for deltacode.
//!
//! This crate reconciles two scans of a codebase and classifies every file:
//!
//! - **Path alignment** - Strip root prefixes that only one scan carries
//! - **Matching** - Pair records by aligned path, then (optionally) by checksum
//! - **Classification** - Added, removed, modified, unchanged or moved
//! - **Aggregation** - Validate that every record is accounted for once and
//!   summarize the result
//!
//! ```rust,ignore
//! use deltacode_analyze::DeltaCode;
//! use deltacode_scan::{JsonScanLoader, ScanLoader};
//! use std::path::Path;
//!
//! let loader = JsonScanLoader::new();
//! let new = loader.load(Some(Path::new("new.json")));
//! let old = loader.load(Some(Path::new("old.json")));
//!
//! let result = DeltaCode::new(new, old)?;
//! if let Some(stats) = result.get_stats() {
//!     println!("{} added, {} removed", stats.added, stats.removed);
//! }
//! ```
//!
//! # Rename detection
//!
//! By default a renamed file is reported as one addition and one removal.
//! With [`DeltaConfig::detect_moves`] set, files paired by checksum at a
//! different path are reported as moved and counted separately.

pub mod align;
mod aggregate;
pub mod classify;
pub mod matcher;

pub use aggregate::DeltaCode;
pub use align::{Alignment, align};
pub use classify::classify;
pub use matcher::{Correspondence, MatchKind, Matcher, edit_distance};

// Re-export core types
pub use deltacode_core::{
    ConsistencyError, Delta, DeltaConfig, DeltaReport, DeltaStats, DeltaStatus, FileRecord,
    ScanResult,
};
