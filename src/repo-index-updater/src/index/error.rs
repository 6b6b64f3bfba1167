//! Index storage error types.

use thiserror::Error;

/// Errors that can occur while reading or writing an index file.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to read an existing index.
    #[error("Failed to read index '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An existing index is not valid JSON or has the wrong shape.
    #[error("Failed to parse index '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize an index.
    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write or replace a file.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
