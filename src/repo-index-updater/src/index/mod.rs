//! Index data model and on-disk storage.
//!
//! An [`Index`] is rebuilt from scratch on every run. The previous index file
//! is only read for comparison; a changed index replaces it atomically.

mod document;
mod entry;
mod error;
mod store;

pub use document::Index;
pub use entry::IndexEntry;
pub use error::IndexError;
pub use store::{encode_index, load_index, write_atomically, write_index};
