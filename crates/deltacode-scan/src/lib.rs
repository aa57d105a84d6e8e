//! Scan report loading for deltacode.
//!
//! This crate turns scan reports on disk into [`ScanResult`]s. Loading never
//! fails from the caller's point of view: a missing or malformed report
//! yields an unavailable result, which the comparison engine reports as
//! "no comparison possible".
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use deltacode_scan::{JsonScanLoader, ScanLoader};
//!
//! let loader = JsonScanLoader::new();
//! let scan = loader.load(Some(Path::new("/path/to/scan.json")));
//!
//! match scan.files_count {
//!     Some(count) => println!("Loaded {count} records"),
//!     None => println!("Scan unavailable"),
//! }
//! ```

mod loader;
mod report;

pub use loader::{JsonScanLoader, ScanLoader};

// Re-export core types for convenience
pub use deltacode_core::{Checksum, FileKind, FileRecord, LoadError, ScanHeader, ScanResult};
