//! GitHub REST implementation of [`RemoteSource`].

use super::wire::{
    latest_commit_date, malformed, parse, release_entries, CommitItem, ContentItem, Release,
};
use super::{RemoteSource, SourceError};
use crate::config::{Configuration, SourceKind};
use crate::filter::IgnoreRules;
use crate::index::IndexEntry;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

/// Page size for paginated listings.
const RESULTS_PER_PAGE: u8 = 100;

/// Upper bound on release pages fetched in one run.
const MAX_RELEASE_PAGES: u32 = 10;

/// Lists repository files or release assets through the GitHub REST API.
pub struct GitHubSource {
    octocrab: Octocrab,
    owner: String,
    repo: String,
    authenticated: bool,
    kind: SourceKind,
    reference: Option<String>,
    directory: String,
    concurrency: usize,
    rules: IgnoreRules,
}

#[derive(Serialize)]
struct ContentsQuery<'a> {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    reference: Option<&'a str>,
}

#[derive(Serialize)]
struct CommitsQuery<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    per_page: u8,
}

#[derive(Serialize)]
struct ReleasesQuery {
    per_page: u8,
    page: u32,
}

impl GitHubSource {
    /// Builds a GitHub client for the configured repository.
    ///
    /// Without a token the client is unauthenticated and limited to public
    /// repositories and the anonymous rate limit.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::RemoteUnavailable`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: &Configuration) -> Result<Self, SourceError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = config.token() {
            builder = builder.personal_token(token.to_string());
        }
        let octocrab = builder.build()?;

        Ok(Self {
            octocrab,
            owner: config.repo_owner().to_string(),
            repo: config.repo_name().to_string(),
            authenticated: config.token().is_some(),
            kind: config.source(),
            reference: config.reference().map(str::to_string),
            directory: config.directory().to_string(),
            concurrency: config.concurrency().max(1),
            rules: config.ignore_rules(),
        })
    }

    fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    fn contents_route(&self) -> String {
        if self.directory.is_empty() {
            format!("/repos/{}/{}/contents", self.owner, self.repo)
        } else {
            format!(
                "/repos/{}/{}/contents/{}",
                self.owner, self.repo, self.directory
            )
        }
    }

    /// Lists files in the configured directory and stamps each with the time
    /// of the last commit that touched it.
    async fn fetch_contents(&self) -> Result<Vec<IndexEntry>, SourceError> {
        let route = self.contents_route();
        let query = ContentsQuery {
            reference: self.reference.as_deref(),
        };
        let value = self.get_json(&route, Some(&query)).await?;
        let items: Vec<ContentItem> = parse(&route, value)?;

        let files = indexable_files(items, &self.rules);
        info!(count = files.len(), "Listed repository files");

        let source = self;
        let results: Vec<Result<IndexEntry, SourceError>> = stream::iter(files)
            .map(|item| {
                let route = route.clone();
                async move {
                    let last_modified = source.last_commit_date(&item.path).await?;
                    item.into_entry(&route, last_modified)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        results.into_iter().collect()
    }

    /// Returns the time of the newest commit touching `path`.
    async fn last_commit_date(&self, path: &str) -> Result<DateTime<Utc>, SourceError> {
        let route = format!("/repos/{}/{}/commits", self.owner, self.repo);
        let query = CommitsQuery {
            path,
            sha: self.reference.as_deref(),
            per_page: 1,
        };
        let value = self.get_json(&route, Some(&query)).await?;
        let commits: Vec<CommitItem> = parse(&route, value)?;

        latest_commit_date(&commits)
            .ok_or_else(|| malformed(&route, format!("no commit history for '{path}'")))
    }

    /// Lists assets of all published releases.
    async fn fetch_releases(&self) -> Result<Vec<IndexEntry>, SourceError> {
        let route = format!("/repos/{}/{}/releases", self.owner, self.repo);
        let mut releases = Vec::new();

        for page in 1..=MAX_RELEASE_PAGES {
            let query = ReleasesQuery {
                per_page: RESULTS_PER_PAGE,
                page,
            };
            let value = self.get_json(&route, Some(&query)).await?;
            let batch: Vec<Release> = parse(&route, value)?;
            let step = page_step(page, batch.len());
            releases.extend(batch);

            match step {
                PageStep::Next => {}
                PageStep::Last => break,
                PageStep::Capped => {
                    warn!(
                        max_pages = MAX_RELEASE_PAGES,
                        "Reached maximum release pages, older releases are not indexed"
                    );
                    break;
                }
            }
        }
        info!(count = releases.len(), "Listed releases");

        let entries = release_entries(&route, releases)?;
        Ok(entries
            .into_iter()
            .filter(|entry| !self.rules.is_ignored(&entry.name))
            .collect())
    }

    async fn get_json<P: Serialize + ?Sized>(
        &self,
        route: &str,
        parameters: Option<&P>,
    ) -> Result<serde_json::Value, SourceError> {
        debug!(route, "GitHub request");
        self.octocrab
            .get::<serde_json::Value, _, _>(route, parameters)
            .await
            .map_err(|e| self.classify(e))
    }

    fn classify(&self, error: octocrab::Error) -> SourceError {
        if requires_token(status_code(&error), self.authenticated) {
            warn!(repo = %self.full_name(), error = %error, "Request rejected without a token");
            SourceError::AuthMissing {
                repo: self.full_name(),
            }
        } else {
            error.into()
        }
    }
}

impl RemoteSource for GitHubSource {
    async fn fetch(&self) -> Result<Vec<IndexEntry>, SourceError> {
        let span = info_span!(
            "fetch",
            repo = %self.full_name(),
            source = %self.kind,
            reference = self.reference.as_deref().unwrap_or("default")
        );

        async {
            match self.kind {
                SourceKind::Contents => self.fetch_contents().await,
                SourceKind::Releases => self.fetch_releases().await,
            }
        }
        .instrument(span)
        .await
    }
}

/// Keeps regular files that the ignore rules let through.
fn indexable_files(items: Vec<ContentItem>, rules: &IgnoreRules) -> Vec<ContentItem> {
    items
        .into_iter()
        .filter(ContentItem::is_file)
        .filter(|item| {
            let ignored = rules.is_ignored(&item.name);
            if ignored {
                debug!(path = %item.path, "Ignoring file");
            }
            !ignored
        })
        .collect()
}

/// What to do after one page of a paginated listing.
#[derive(Debug, PartialEq, Eq)]
enum PageStep {
    /// The page was full; request the next one.
    Next,
    /// A short page ends the listing.
    Last,
    /// The page was full but the page cap is reached.
    Capped,
}

fn page_step(page: u32, batch_len: usize) -> PageStep {
    if batch_len < usize::from(RESULTS_PER_PAGE) {
        PageStep::Last
    } else if page >= MAX_RELEASE_PAGES {
        PageStep::Capped
    } else {
        PageStep::Next
    }
}

/// Extracts the HTTP status of a GitHub API error response.
fn status_code(error: &octocrab::Error) -> Option<u16> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// GitHub answers 404 for private repositories when no token is sent.
fn requires_token(status: Option<u16>, authenticated: bool) -> bool {
    !authenticated && matches!(status, Some(401 | 403 | 404))
}
