//! Updater error types.

use crate::config::ConfigError;
use crate::index::IndexError;
use crate::render::RenderError;
use crate::source::SourceError;
use thiserror::Error;

/// Errors that abort an index update run.
///
/// None of these leave a partially written index behind.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Invalid configuration or settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The remote requires a token that is not configured.
    #[error("{repo} is not accessible without authentication; set GITHUB_TOKEN")]
    AuthMissing { repo: String },

    /// Network or GitHub API failure.
    #[error("Remote source unavailable: {0}")]
    RemoteUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The remote payload could not be mapped to index entries.
    #[error("Malformed response from {route}: {message}")]
    MalformedResponse { route: String, message: String },

    /// The Markdown page could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Writing the index or Markdown page failed.
    #[error("Failed to write index: {0}")]
    WriteFailed(#[source] IndexError),
}

impl From<SourceError> for UpdateError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::AuthMissing { repo } => Self::AuthMissing { repo },
            SourceError::RemoteUnavailable(source) => Self::RemoteUnavailable(source),
            SourceError::MalformedResponse { route, message } => {
                Self::MalformedResponse { route, message }
            }
        }
    }
}
