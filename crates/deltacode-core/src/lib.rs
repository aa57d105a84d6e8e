//! Core types for deltacode.
//!
//! This crate provides the data structures shared by the loader and the
//! comparison engine: file records, scan results, deltas and configuration.

mod config;
mod delta;
mod error;
mod record;
mod scan;

pub use config::{DeltaConfig, DeltaConfigBuilder};
pub use delta::{Delta, DeltaEntry, DeltaReport, DeltaStats, DeltaStatus};
pub use error::{ConfigError, ConsistencyError, LoadError, ScanSide};
pub use record::{Checksum, FileKind, FileRecord, normalize_path};
pub use scan::{ScanHeader, ScanResult};
