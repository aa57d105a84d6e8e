//! Root-prefix alignment between two scans.
//!
//! Scans of the same tree can disagree on how much of the root they record:
//! one may list `zlib-1.2.11/adler32.c` while another, taken with full-root
//! paths, lists `home/user/src/zlib-1.2.11/adler32.c`. The aligner searches
//! for the number of shared leading segments to drop on each side so that
//! the most relative paths line up, and falls back to the identity when no
//! stripping improves the overlap.
//!
//! Alignment only affects comparison keys. Record paths are never rewritten.

use std::collections::HashSet;

use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::debug;

use deltacode_core::FileRecord;

/// Number of leading path segments dropped from each side for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    /// Segments stripped from new-scan paths.
    pub new_strip: usize,
    /// Segments stripped from old-scan paths.
    pub old_strip: usize,
    /// Distinct comparison keys shared by both sides under this alignment.
    pub overlap: usize,
}

impl Alignment {
    /// The no-op alignment.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Check if no segments are stripped.
    pub fn is_identity(&self) -> bool {
        self.new_strip == 0 && self.old_strip == 0
    }

    /// Comparison key for a new-scan record.
    pub fn new_key<'a>(&self, record: &'a FileRecord) -> &'a str {
        strip_segments(&record.path, self.new_strip)
    }

    /// Comparison key for an old-scan record.
    pub fn old_key<'a>(&self, record: &'a FileRecord) -> &'a str {
        strip_segments(&record.path, self.old_strip)
    }
}

/// Find the alignment that makes the most paths of both scans coincide.
///
/// Only segments shared by every path of a side are candidates for
/// stripping. Ties go to the alignment stripping fewer segments overall,
/// then fewer new-side segments, so the identity wins whenever it is as good
/// as anything else.
pub fn align(new: &[FileRecord], old: &[FileRecord]) -> Alignment {
    let new_max = strippable_depth(new);
    let old_max = strippable_depth(old);

    if new_max == 0 && old_max == 0 {
        return Alignment {
            overlap: overlap(new, old, 0, 0),
            ..Alignment::identity()
        };
    }

    let old_key_sets: Vec<HashSet<&str>> = (0..=old_max).map(|k| key_set(old, k)).collect();

    let best = iproduct!(0..=new_max, 0..=old_max)
        .map(|(new_strip, old_strip)| {
            let old_keys = &old_key_sets[old_strip];
            let overlap = key_set(new, new_strip)
                .into_iter()
                .filter(|key| old_keys.contains(key))
                .count();
            Alignment {
                new_strip,
                old_strip,
                overlap,
            }
        })
        .min_by_key(|a| {
            (
                std::cmp::Reverse(a.overlap),
                a.new_strip + a.old_strip,
                a.new_strip,
            )
        })
        .unwrap_or_default();

    debug!(
        new_strip = best.new_strip,
        old_strip = best.old_strip,
        overlap = best.overlap,
        "aligned scan roots"
    );
    best
}

/// Drop the first `count` segments of a normalized path.
///
/// Returns the empty string when the path has `count` segments or fewer.
pub fn strip_segments(path: &str, count: usize) -> &str {
    if count == 0 {
        return path;
    }
    path.match_indices('/')
        .nth(count - 1)
        .map(|(i, _)| &path[i + 1..])
        .unwrap_or_default()
}

/// How many leading segments every record of a side shares, keeping at
/// least one segment of the deepest path.
fn strippable_depth(records: &[FileRecord]) -> usize {
    let mut iter = records.iter().map(|r| r.path.as_str()).filter(|p| !p.is_empty());
    let Some(first) = iter.next() else {
        return 0;
    };

    let mut common: Vec<&str> = first.split('/').collect();
    let mut deepest = common.len();
    for path in iter {
        let mut depth = 0;
        for (a, b) in common.iter().zip(path.split('/')) {
            if *a != b {
                break;
            }
            depth += 1;
        }
        common.truncate(depth);
        deepest = deepest.max(path.split('/').count());
    }

    common.len().min(deepest.saturating_sub(1))
}

fn key_set(records: &[FileRecord], strip: usize) -> HashSet<&str> {
    records
        .iter()
        .map(|r| strip_segments(&r.path, strip))
        .filter(|key| !key.is_empty())
        .collect()
}

fn overlap(new: &[FileRecord], old: &[FileRecord], new_strip: usize, old_strip: usize) -> usize {
    let old_keys = key_set(old, old_strip);
    key_set(new, new_strip)
        .into_iter()
        .filter(|key| old_keys.contains(key))
        .count()
}
