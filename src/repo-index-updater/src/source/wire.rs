//! GitHub REST payloads and their mapping into index entries.
//!
//! Only the fields the index needs are modelled; everything else in the
//! response is ignored.

use super::SourceError;
use crate::index::IndexEntry;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// One item of a `GET /repos/{owner}/{repo}/contents/{path}` listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub size: u64,
    pub download_url: Option<String>,
    pub html_url: Option<String>,
}

impl ContentItem {
    /// Returns true for regular files. Directories, symlinks and submodules
    /// are not indexed.
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }

    /// Converts the item into an entry stamped with its last commit time.
    pub fn into_entry(
        self,
        route: &str,
        last_modified: DateTime<Utc>,
    ) -> Result<IndexEntry, SourceError> {
        let raw_url = self
            .download_url
            .or(self.html_url)
            .ok_or_else(|| malformed(route, format!("'{}' has no download URL", self.path)))?;
        let url = checked_url(route, &raw_url)?;
        Ok(IndexEntry::new(
            self.name,
            self.path,
            url,
            last_modified,
            self.size,
        ))
    }
}

/// One item of a `GET /repos/{owner}/{repo}/commits` listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitItem {
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitDetail {
    pub author: Option<CommitSignature>,
    pub committer: Option<CommitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitSignature {
    pub date: Option<DateTime<Utc>>,
}

/// Returns the committer date of the newest commit, falling back to its
/// author date.
pub(crate) fn latest_commit_date(commits: &[CommitItem]) -> Option<DateTime<Utc>> {
    let commit = &commits.first()?.commit;
    commit
        .committer
        .as_ref()
        .and_then(|s| s.date)
        .or_else(|| commit.author.as_ref().and_then(|s| s.date))
}

/// One item of a `GET /repos/{owner}/{repo}/releases` listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ReleaseAsset {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub browser_download_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Flattens published releases into one entry per asset.
///
/// Asset paths are `{tag}/{asset name}`. Draft releases are skipped.
pub(crate) fn release_entries(
    route: &str,
    releases: Vec<Release>,
) -> Result<Vec<IndexEntry>, SourceError> {
    let mut entries = Vec::new();
    for release in releases.into_iter().filter(|r| !r.draft) {
        for asset in release.assets {
            let url = checked_url(route, &asset.browser_download_url)?;
            let path = format!("{}/{}", release.tag_name, asset.name);
            entries.push(IndexEntry::new(
                asset.name,
                path,
                url,
                asset.updated_at,
                asset.size,
            ));
        }
    }
    Ok(entries)
}

/// Deserializes a JSON response body into a wire type.
pub(crate) fn parse<T: DeserializeOwned>(
    route: &str,
    value: serde_json::Value,
) -> Result<T, SourceError> {
    serde_json::from_value(value).map_err(|e| malformed(route, e.to_string()))
}

fn checked_url(route: &str, raw: &str) -> Result<String, SourceError> {
    Url::parse(raw)
        .map(String::from)
        .map_err(|e| malformed(route, format!("invalid URL '{raw}': {e}")))
}

pub(crate) fn malformed(route: &str, message: String) -> SourceError {
    SourceError::MalformedResponse {
        route: route.to_string(),
        message,
    }
}
