//! Delta aggregation: align, match, classify, then validate and summarize.

use tracing::{debug, error, info};

use deltacode_core::{
    ConsistencyError, Delta, DeltaConfig, DeltaEntry, DeltaReport, DeltaStats, DeltaStatus,
    ScanResult, ScanSide,
};

use crate::align::{Alignment, align};
use crate::classify::classify;
use crate::matcher::{Correspondence, Matcher};

/// Comparison of a new scan against an old one.
///
/// `deltas` is `None` when either scan is unavailable. Otherwise every
/// record of both scans appears in exactly one delta, sorted by path.
#[derive(Debug, Clone)]
pub struct DeltaCode {
    /// The new snapshot.
    pub new: ScanResult,
    /// The old snapshot.
    pub old: ScanResult,
    /// Classified outcomes, or `None` if no comparison was possible.
    pub deltas: Option<Vec<Delta>>,
    config: DeltaConfig,
    alignment: Option<Alignment>,
}

impl DeltaCode {
    /// Compare two scans with the default configuration.
    pub fn new(new: ScanResult, old: ScanResult) -> Result<Self, ConsistencyError> {
        Self::with_config(new, old, DeltaConfig::default())
    }

    /// Compare two scans.
    ///
    /// Unavailable scans are not an error: the result simply carries no
    /// deltas. An error means the engine lost or duplicated a record.
    pub fn with_config(
        new: ScanResult,
        old: ScanResult,
        config: DeltaConfig,
    ) -> Result<Self, ConsistencyError> {
        let mut delta_code = Self {
            new,
            old,
            deltas: None,
            config,
            alignment: None,
        };
        delta_code.determine_delta()?;
        Ok(delta_code)
    }

    /// Recompute `deltas` from the two scans and check that every record was
    /// accounted for exactly once.
    pub fn determine_delta(&mut self) -> Result<(), ConsistencyError> {
        self.deltas = None;
        self.alignment = None;

        let (Some(new_files), Some(old_files)) = (self.new.files(), self.old.files()) else {
            info!(
                new = %self.new.source_path().display(),
                old = %self.old.source_path().display(),
                "scan unavailable, no comparison possible"
            );
            return Ok(());
        };

        let alignment = if self.config.align_paths {
            align(new_files, old_files)
        } else {
            Alignment::identity()
        };

        let correspondence = Matcher::new(new_files, old_files, alignment, &self.config).run();

        let mut deltas: Vec<Delta> = correspondence
            .into_iter()
            .map(|entry| {
                let (new, old, via) = match entry {
                    Correspondence::Pair { new, old, via } => (Some(new), Some(old), Some(via)),
                    Correspondence::NewOnly(new) => (Some(new), None, None),
                    Correspondence::OldOnly(old) => (None, Some(old), None),
                };
                let new = new.map(|i| &new_files[i]);
                let old = old.map(|i| &old_files[i]);
                Delta {
                    status: classify(new, old, via, &alignment),
                    new_file: new.cloned(),
                    old_file: old.cloned(),
                }
            })
            .collect();

        deltas.sort_by(|a, b| {
            a.path()
                .cmp(b.path())
                .then_with(|| old_path(a).cmp(&old_path(b)))
        });

        self.check_counts(&deltas, ScanSide::New)?;
        self.check_counts(&deltas, ScanSide::Old)?;

        debug!(deltas = deltas.len(), "determined deltas");
        self.deltas = Some(deltas);
        self.alignment = Some(alignment);
        Ok(())
    }

    fn check_counts(&self, deltas: &[Delta], side: ScanSide) -> Result<(), ConsistencyError> {
        let (scan, actual) = match side {
            ScanSide::New => (&self.new, deltas.iter().filter(|d| d.new_file.is_some()).count()),
            ScanSide::Old => (&self.old, deltas.iter().filter(|d| d.old_file.is_some()).count()),
        };
        let expected = scan.files_count.unwrap_or(0);
        if expected != actual {
            error!(%side, expected, actual, "delta count does not match scan");
            return Err(ConsistencyError::CountMismatch {
                side,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Per-status counters, or `None` if no comparison was possible.
    ///
    /// Directory deltas are skipped unless `count_directories` is set. The
    /// `moved` counter is present only when rename detection is enabled.
    pub fn get_stats(&self) -> Option<DeltaStats> {
        let deltas = self.deltas.as_ref()?;
        let mut stats = DeltaStats {
            moved: self.config.detect_moves.then_some(0),
            ..DeltaStats::default()
        };
        deltas
            .iter()
            .filter(|d| self.config.count_directories || !d.is_dir())
            .for_each(|d| stats.record(d.status));
        Some(stats)
    }

    /// Serializable summary, optionally with the full delta listing.
    pub fn to_report(&self, include_deltas: bool) -> DeltaReport {
        DeltaReport {
            deltas_count: self.deltas.as_ref().map(Vec::len),
            deltacode_stats: self.get_stats(),
            deltas: self
                .deltas
                .as_ref()
                .filter(|_| include_deltas)
                .map(|deltas| deltas.iter().map(DeltaEntry::from).collect()),
        }
    }

    /// Deltas with a given status.
    pub fn deltas_with_status(&self, status: DeltaStatus) -> impl Iterator<Item = &Delta> {
        self.deltas
            .iter()
            .flatten()
            .filter(move |d| d.status == status)
    }

    /// Alignment used for the last comparison.
    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    /// Configuration in use.
    pub fn config(&self) -> &DeltaConfig {
        &self.config
    }

    /// Check if a comparison was performed.
    pub fn is_available(&self) -> bool {
        self.deltas.is_some()
    }
}

fn old_path(delta: &Delta) -> Option<&str> {
    delta.old_file.as_ref().map(|f| f.path.as_str())
}
