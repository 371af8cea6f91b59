//! Occurrence index mapping canonical names to the files that use them.

use crate::types::PackageName;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Accumulator for canonical package names and their file provenance.
///
/// Backed by sorted collections, so iteration order is deterministic and
/// recording is idempotent: the same name/path pair can be merged any number
/// of times, in any order, with the same end state.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceIndex {
    occurrences: BTreeMap<PackageName, BTreeSet<PathBuf>>,
}

impl OccurrenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` was referenced by the file at `path`.
    pub fn record(&mut self, name: PackageName, path: PathBuf) {
        self.occurrences.entry(name).or_default().insert(path);
    }

    /// Distinct canonical names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &PackageName> {
        self.occurrences.keys()
    }

    /// Sorted provenance for one name; empty if the name was never recorded.
    pub fn files_for(&self, name: &PackageName) -> Vec<PathBuf> {
        self.occurrences
            .get(name)
            .map(|files| files.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `path` was recorded for `name`.
    pub fn contains(&self, name: &PackageName, path: &Path) -> bool {
        self.occurrences
            .get(name)
            .is_some_and(|files| files.contains(path))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}
