//! Update outcome types.

use serde::Serialize;

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// A new index was written (or would be, in dry-run mode).
    Updated {
        /// Number of entries in the new index.
        entry_count: usize,
    },

    /// The remote listing matches the existing index; nothing was written.
    Unchanged,
}

impl UpdateOutcome {
    /// Returns the outcome as a short lowercase label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated { .. } => "updated",
            Self::Unchanged => "unchanged",
        }
    }

    /// Returns true if the index changed.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}
