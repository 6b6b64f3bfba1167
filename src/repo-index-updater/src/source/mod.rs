//! Remote listings that feed the index.
//!
//! The updater only depends on [`RemoteSource`]; [`GitHubSource`] is the
//! production implementation backed by the GitHub REST API.

mod error;
mod github;
mod wire;

pub use error::SourceError;
pub use github::GitHubSource;

use crate::index::IndexEntry;

/// A listing of items that can be indexed.
///
/// Implementations return entries in whatever order the remote produced
/// them; ordering and de-duplication happen in [`crate::index::Index`].
#[allow(async_fn_in_trait)]
pub trait RemoteSource {
    /// Fetches the current listing.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the listing cannot be fetched or mapped.
    async fn fetch(&self) -> Result<Vec<IndexEntry>, SourceError>;
}
