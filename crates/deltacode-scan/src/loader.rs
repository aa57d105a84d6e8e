//! Scan loaders: turn a report location into a [`ScanResult`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, warn};

use deltacode_core::{FileRecord, LoadError, ScanResult};

use crate::report::RawReport;

/// Source of scan results.
///
/// Implementors provide [`ScanLoader::try_load`]; [`ScanLoader::load`] wraps
/// it so that a missing, empty or broken source becomes an unavailable
/// result instead of an error.
pub trait ScanLoader {
    /// Load a scan, reporting why it failed.
    fn try_load(&self, source: &Path) -> Result<ScanResult, LoadError>;

    /// Load a scan. Never fails.
    fn load(&self, source: Option<&Path>) -> ScanResult {
        let Some(source) = source.filter(|p| !p.as_os_str().is_empty()) else {
            debug!("no scan location given");
            return ScanResult::unavailable("");
        };

        match self.try_load(source) {
            Ok(scan) => scan,
            Err(err) => {
                warn!(path = %source.display(), error = %err, "scan unavailable");
                ScanResult::unavailable(source)
            }
        }
    }
}

/// Loader for ScanCode-style JSON reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonScanLoader;

impl JsonScanLoader {
    /// Create a new JSON loader.
    pub fn new() -> Self {
        Self
    }

    /// Parse a report from an in-memory JSON string.
    pub fn load_str(&self, source: impl AsRef<Path>, json: &str) -> Result<ScanResult, LoadError> {
        let source = source.as_ref();
        let report: RawReport = serde_json::from_str(json).map_err(|e| LoadError::Parse {
            path: source.to_path_buf(),
            source: e,
        })?;
        self.build(source, report)
    }

    fn build(&self, source: &Path, report: RawReport) -> Result<ScanResult, LoadError> {
        let header = report.header();
        let declared = report.files_count;

        let files = report
            .files
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_record(index))
            .collect::<Result<Vec<FileRecord>, _>>()?;

        if let Some(declared) = declared.filter(|&n| n != files.len()) {
            warn!(
                path = %source.display(),
                declared,
                actual = files.len(),
                "declared files_count does not match entries; using actual count"
            );
        }

        debug!(path = %source.display(), files = files.len(), "loaded scan");
        Ok(ScanResult::from_files(source, files).with_header(header))
    }
}

impl ScanLoader for JsonScanLoader {
    fn try_load(&self, source: &Path) -> Result<ScanResult, LoadError> {
        if source.as_os_str().is_empty() {
            return Err(LoadError::EmptyPath);
        }

        let file = File::open(source).map_err(|e| LoadError::io(source, e))?;
        let report: RawReport =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Parse {
                path: source.to_path_buf(),
                source: e,
            })?;
        self.build(source, report)
    }
}
