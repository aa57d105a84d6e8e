//! Correspondence between new and old records.
//!
//! Matching runs as an ordered pipeline of stages. Each stage only sees the
//! records no earlier stage has paired:
//!
//! 1. Exact match on aligned comparison keys
//! 2. Checksum match across paths (rename detection, opt-in)
//! 3. Everything left over becomes a new-only or old-only singleton
//!
//! Every stage visits records in a fixed order (shortest key, then lexical),
//! so the result does not depend on scan order.

use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use deltacode_core::{Checksum, DeltaConfig, FileRecord};

use crate::align::Alignment;

/// Buckets with more candidate pairs than this are left unmatched.
const MAX_BUCKET_CANDIDATES: usize = 4096;

/// How a pair was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchKind {
    /// Identical aligned paths.
    Path,
    /// Identical checksums.
    Checksum,
}

/// One entry of the correspondence, by index into the two record slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correspondence {
    /// Records paired across the two scans.
    Pair { new: usize, old: usize, via: MatchKind },
    /// New record with no old counterpart.
    NewOnly(usize),
    /// Old record with no new counterpart.
    OldOnly(usize),
}

/// Computes the correspondence between two record sets.
pub struct Matcher<'a> {
    new: &'a [FileRecord],
    old: &'a [FileRecord],
    alignment: Alignment,
    config: &'a DeltaConfig,
}

/// Unpaired records and the pairs found so far.
struct Residual {
    new_open: Vec<bool>,
    old_open: Vec<bool>,
    pairs: Vec<Correspondence>,
}

impl Residual {
    fn pair(&mut self, new: usize, old: usize, via: MatchKind) {
        self.new_open[new] = false;
        self.old_open[old] = false;
        self.pairs.push(Correspondence::Pair { new, old, via });
    }
}

impl<'a> Matcher<'a> {
    /// Create a matcher over aligned record sets.
    pub fn new(
        new: &'a [FileRecord],
        old: &'a [FileRecord],
        alignment: Alignment,
        config: &'a DeltaConfig,
    ) -> Self {
        Self {
            new,
            old,
            alignment,
            config,
        }
    }

    /// Run all stages. Every record index appears in exactly one entry.
    pub fn run(&self) -> Vec<Correspondence> {
        let mut residual = Residual {
            new_open: vec![true; self.new.len()],
            old_open: vec![true; self.old.len()],
            pairs: Vec::with_capacity(self.new.len().max(self.old.len())),
        };

        self.match_by_path(&mut residual);
        if self.config.detect_moves {
            self.match_by_checksum(&mut residual);
        }
        self.finish(residual)
    }

    /// Stage 1: identical aligned keys. Directories pair on path alone.
    fn match_by_path(&self, residual: &mut Residual) {
        let mut old_by_key: HashMap<&str, VecDeque<usize>> = HashMap::new();
        for old in self.ordered_old(residual) {
            old_by_key
                .entry(self.alignment.old_key(&self.old[old]))
                .or_default()
                .push_back(old);
        }

        let mut matched = 0usize;
        for new in self.ordered_new(residual) {
            let key = self.alignment.new_key(&self.new[new]);
            if let Some(old) = old_by_key.get_mut(key).and_then(VecDeque::pop_front) {
                residual.pair(new, old, MatchKind::Path);
                matched += 1;
            }
        }
        debug!(matched, "path stage");
    }

    /// Stage 2: identical checksums among the remaining regular files.
    ///
    /// Buckets are independent, so they are resolved in parallel and merged
    /// back in checksum order.
    fn match_by_checksum(&self, residual: &mut Residual) {
        let mut buckets: HashMap<&Checksum, (Vec<usize>, Vec<usize>)> = HashMap::new();
        for new in self.ordered_new(residual) {
            if let Some(sum) = self.checksum_candidate(&self.new[new]) {
                buckets.entry(sum).or_default().0.push(new);
            }
        }
        for old in self.ordered_old(residual) {
            if let Some(sum) = self.checksum_candidate(&self.old[old]) {
                buckets.entry(sum).or_default().1.push(old);
            }
        }

        let buckets: Vec<_> = buckets
            .into_iter()
            .filter(|(_, (new, old))| !new.is_empty() && !old.is_empty())
            .sorted_by(|a, b| a.0.cmp(b.0))
            .collect();

        let pairs: Vec<(usize, usize)> = buckets
            .par_iter()
            .map(|(_, (new, old))| self.resolve_bucket(new, old))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect();

        debug!(buckets = buckets.len(), matched = pairs.len(), "checksum stage");
        for (new, old) in pairs {
            residual.pair(new, old, MatchKind::Checksum);
        }
    }

    /// Pair records sharing one checksum.
    ///
    /// A lone pair matches directly. With duplicate content, candidates are
    /// taken greedily by same file name first, then smallest path edit
    /// distance, then shortest and lexically first paths. Records left over
    /// stay unmatched, as do all records of oversized buckets.
    fn resolve_bucket(&self, new: &[usize], old: &[usize]) -> Vec<(usize, usize)> {
        if let ([n], [o]) = (new, old) {
            return vec![(*n, *o)];
        }
        if new.len() * old.len() > MAX_BUCKET_CANDIDATES {
            debug!(
                new = new.len(),
                old = old.len(),
                "ambiguous checksum bucket left unmatched"
            );
            return Vec::new();
        }

        let candidates = ranked_candidates(new, old, |&n, &o| {
            let new_rec = &self.new[n];
            let old_rec = &self.old[o];
            let new_key = self.alignment.new_key(new_rec);
            let old_key = self.alignment.old_key(old_rec);
            (
                new_rec.name() != old_rec.name(),
                edit_distance(new_key, old_key),
                new_key.len(),
                new_key.to_string(),
                old_key.len(),
                old_key.to_string(),
            )
        });

        let mut new_used = HashSet::new();
        let mut old_used = HashSet::new();
        let mut pairs = Vec::new();
        for (n, o) in candidates {
            if !new_used.contains(&n) && !old_used.contains(&o) {
                new_used.insert(n);
                old_used.insert(o);
                pairs.push((n, o));
            }
        }
        pairs
    }

    fn checksum_candidate<'r>(&self, record: &'r FileRecord) -> Option<&'r Checksum> {
        if !record.is_file() || (self.config.ignore_empty_files && record.has_empty_content()) {
            return None;
        }
        record.checksum.as_ref()
    }

    /// Remaining singletons, new side first.
    fn finish(&self, mut residual: Residual) -> Vec<Correspondence> {
        let added = self.ordered_new(&residual).map(Correspondence::NewOnly);
        let removed = self.ordered_old(&residual).map(Correspondence::OldOnly);
        let singles: Vec<_> = added.chain(removed).collect();
        residual.pairs.extend(singles);
        residual.pairs
    }

    fn ordered_new(&self, residual: &Residual) -> std::vec::IntoIter<usize> {
        let alignment = self.alignment;
        ordered_open(&residual.new_open, self.new, move |r| alignment.new_key(r))
    }

    fn ordered_old(&self, residual: &Residual) -> std::vec::IntoIter<usize> {
        let alignment = self.alignment;
        ordered_open(&residual.old_open, self.old, move |r| alignment.old_key(r))
    }
}

/// Open indices sorted by (key length, key, original path).
fn ordered_open<'r>(
    open: &[bool],
    records: &'r [FileRecord],
    key: impl Fn(&'r FileRecord) -> &'r str,
) -> std::vec::IntoIter<usize> {
    open.iter()
        .enumerate()
        .filter(|(_, open)| **open)
        .map(|(i, _)| i)
        .sorted_by_key(|&i| {
            let record = &records[i];
            let k = key(record);
            (k.len(), k, record.original_path.as_str())
        })
}

/// All (new, old) combinations, sorted by a scoring function.
fn ranked_candidates<K: Ord>(
    new: &[usize],
    old: &[usize],
    score: impl Fn(&usize, &usize) -> K,
) -> Vec<(usize, usize)> {
    new.iter()
        .cartesian_product(old.iter())
        .map(|(n, o)| (score(n, o), *n, *o))
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, n, o)| (n, o))
        .collect()
}

/// Levenshtein distance between two paths, by character.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
