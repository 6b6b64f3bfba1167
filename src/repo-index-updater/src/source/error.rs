//! Remote source error types.

use thiserror::Error;

/// Errors that can occur while fetching a remote listing.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The repository is not visible without a token.
    #[error("{repo} is not accessible without authentication; set GITHUB_TOKEN")]
    AuthMissing { repo: String },

    /// Network or GitHub API failure.
    #[error("GitHub API request failed: {0}")]
    RemoteUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response could not be mapped to index entries.
    #[error("Unexpected response from {route}: {message}")]
    MalformedResponse { route: String, message: String },
}

impl From<octocrab::Error> for SourceError {
    fn from(error: octocrab::Error) -> Self {
        Self::RemoteUnavailable(Box::new(error))
    }
}
