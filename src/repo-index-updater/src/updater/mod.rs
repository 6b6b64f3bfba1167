//! Orchestrates a fetch, compare and write cycle.
//!
//! A run fetches the remote listing, builds a fresh [`Index`] from it and
//! compares that against the index already on disk. The file is replaced
//! only when the listing changed, so repeated runs against an unchanged
//! repository leave it untouched.

mod error;
mod outcome;

pub use error::UpdateError;
pub use outcome::UpdateOutcome;

use crate::config::Configuration;
use crate::filter::IgnoreRules;
use crate::index::{load_index, write_atomically, write_index, Index};
use crate::render::MarkdownRenderer;
use crate::source::{GitHubSource, RemoteSource};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, info, info_span, warn, Instrument};

/// Runs one update against GitHub with the given configuration.
///
/// # Errors
///
/// Returns [`UpdateError`] if the configuration is invalid, the remote
/// cannot be read, or the index cannot be written.
pub async fn run(config: Configuration) -> Result<UpdateOutcome, UpdateError> {
    Updater::new(config)?.run().await
}

/// Keeps an index file in sync with a remote listing.
pub struct Updater<S> {
    config: Configuration,
    source: S,
    rules: IgnoreRules,
    renderer: Option<MarkdownRenderer>,
}

impl Updater<GitHubSource> {
    /// Builds an updater backed by the GitHub REST API.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Config`] for invalid configuration and
    /// [`UpdateError::RemoteUnavailable`] if the GitHub client cannot be built.
    pub fn new(config: Configuration) -> Result<Self, UpdateError> {
        config.validate()?;
        let source = GitHubSource::new(&config)?;
        Self::with_source(config, source)
    }
}

impl<S: RemoteSource> Updater<S> {
    /// Builds an updater that reads from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError::Config`] for invalid configuration and
    /// [`UpdateError::Render`] if a Markdown page is requested with a template
    /// that does not compile.
    pub fn with_source(config: Configuration, source: S) -> Result<Self, UpdateError> {
        config.validate()?;
        let renderer = match config.markdown_path() {
            Some(_) => Some(MarkdownRenderer::new(
                config.settings().markdown_template.as_deref(),
            )?),
            None => None,
        };
        let rules = config.ignore_rules();

        Ok(Self {
            config,
            source,
            rules,
            renderer,
        })
    }

    /// Returns the configuration this updater runs with.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Executes one fetch, compare and write cycle.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] on any failure; the existing index is left
    /// untouched in that case.
    pub async fn run(&self) -> Result<UpdateOutcome, UpdateError> {
        let span = info_span!(
            "update_index",
            repo = %self.config.full_name(),
            output = %self.config.output_path().display()
        );

        async {
            info!(source = %self.config.source(), "Fetching remote listing");
            let mut entries = self.source.fetch().await?;
            let fetched = entries.len();
            entries.retain(|entry| !self.rules.is_ignored(&entry.name));
            debug!(fetched, kept = entries.len(), "Applied ignore rules");

            let index = Index::new(self.config.full_name(), entries, Utc::now());

            if let Some(previous) = self.load_previous() {
                if previous.same_listing(&index) {
                    info!(entries = index.len(), "Index is up to date");
                    if !self.config.dry_run() {
                        self.write_missing_page(&previous)?;
                    }
                    return Ok(UpdateOutcome::Unchanged);
                }
            }

            let outcome = UpdateOutcome::Updated {
                entry_count: index.len(),
            };

            if self.config.dry_run() {
                info!(entries = index.len(), "Dry run, index not written");
                return Ok(outcome);
            }

            self.write(&index)?;
            info!(entries = index.len(), "Index updated");
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    /// Reads the existing index; an unreadable one counts as absent.
    fn load_previous(&self) -> Option<Index> {
        let path = self.config.output_path();
        match load_index(path) {
            Ok(previous) => previous,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable index");
                None
            }
        }
    }

    /// Writes the Markdown page (if any) first, then the index.
    ///
    /// A failed page write leaves the previous index in place.
    fn write(&self, index: &Index) -> Result<(), UpdateError> {
        if let (Some(renderer), Some(path)) = (&self.renderer, self.config.markdown_path()) {
            write_page(renderer, path, index)?;
        }

        write_index(self.config.output_path(), index).map_err(UpdateError::WriteFailed)
    }

    /// Renders the page for an unchanged index when the page file is absent.
    fn write_missing_page(&self, index: &Index) -> Result<(), UpdateError> {
        match (&self.renderer, self.config.markdown_path()) {
            (Some(renderer), Some(path)) if !path.exists() => {
                info!(path = %path.display(), "Markdown page missing, rendering it");
                write_page(renderer, path, index)
            }
            _ => Ok(()),
        }
    }
}

fn write_page(renderer: &MarkdownRenderer, path: &Path, index: &Index) -> Result<(), UpdateError> {
    let page = renderer.render(index)?;
    write_atomically(path, page.as_bytes()).map_err(UpdateError::WriteFailed)?;
    debug!(path = %path.display(), "Wrote Markdown page");
    Ok(())
}
