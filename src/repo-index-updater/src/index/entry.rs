//! Index entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One indexed item, a repository file or a release asset.
///
/// Entries are identified by `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Display name, usually the file name.
    pub name: String,

    /// Unique path of the item within the repository listing.
    pub path: String,

    /// Download URL.
    pub url: String,

    /// Time the item last changed.
    pub last_modified: DateTime<Utc>,

    /// Size in bytes as reported by GitHub.
    #[serde(default)]
    pub size: u64,
}

impl IndexEntry {
    /// Creates a new entry.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        url: impl Into<String>,
        last_modified: DateTime<Utc>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: url.into(),
            last_modified,
            size,
        }
    }
}
