//! Outcome classification for matched pairs and singletons.

use deltacode_core::{DeltaStatus, FileRecord};

use crate::align::Alignment;
use crate::matcher::MatchKind;

/// Assign a status to one entry of the correspondence.
///
/// - new only: added
/// - old only: removed
/// - paired by checksum at a different aligned path: moved
/// - paired, equal checksums: unchanged
/// - paired directories of equal size: unchanged
/// - paired files, neither with a checksum, of equal size: unchanged
/// - anything else paired (differing or one-sided checksum, kind change): modified
///
/// # Panics
///
/// Panics if both sides are absent.
pub fn classify(
    new: Option<&FileRecord>,
    old: Option<&FileRecord>,
    via: Option<MatchKind>,
    alignment: &Alignment,
) -> DeltaStatus {
    let (new, old) = match (new, old) {
        (Some(_), None) => return DeltaStatus::Added,
        (None, Some(_)) => return DeltaStatus::Removed,
        (Some(new), Some(old)) => (new, old),
        (None, None) => unreachable!("a delta needs at least one side"),
    };

    if via == Some(MatchKind::Checksum) && alignment.new_key(new) != alignment.old_key(old) {
        return DeltaStatus::Moved;
    }

    if new.kind != old.kind {
        return DeltaStatus::Modified;
    }

    let same = match (&new.checksum, &old.checksum) {
        _ if new.is_dir() => new.size == old.size,
        (Some(a), Some(b)) => a == b,
        (None, None) => new.size == old.size,
        _ => false,
    };
    if same {
        DeltaStatus::Unchanged
    } else {
        DeltaStatus::Modified
    }
}
