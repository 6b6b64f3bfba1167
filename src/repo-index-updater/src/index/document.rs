//! The persisted index document.

use super::IndexEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete listing of a repository at one point in time.
///
/// Entries are kept sorted by path with no duplicate paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    generated_at: DateTime<Utc>,
    #[serde(default)]
    repo: String,
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Builds an index from entries in any order.
    ///
    /// Duplicate paths are collapsed to the first occurrence before sorting.
    pub fn new(repo: impl Into<String>, entries: Vec<IndexEntry>, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            repo: repo.into(),
            entries: normalize_entries(entries),
        }
    }

    /// Returns when this index was generated.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Returns the repository in `owner/name` form.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the entries, sorted by path.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if both indexes describe the same repository listing.
    ///
    /// `generated_at` is ignored; entries are compared field by field and in
    /// order.
    pub fn same_listing(&self, other: &Index) -> bool {
        self.repo == other.repo && self.entries == other.entries
    }
}

/// Drops duplicate paths, keeping the first, then sorts by path.
fn normalize_entries(entries: Vec<IndexEntry>) -> Vec<IndexEntry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<IndexEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.path.clone()))
        .collect();
    unique.sort_by(|a, b| a.path.cmp(&b.path));
    unique
}
