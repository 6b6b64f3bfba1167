#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod filter;
pub mod index;
pub mod render;
pub mod source;
pub mod updater;

pub use config::{load_settings, ConfigError, Configuration, IndexSettings, SourceKind};
pub use filter::IgnoreRules;
pub use index::{load_index, write_index, Index, IndexEntry, IndexError};
pub use render::{
    group_by_date, pair_entries, DateGroup, FileKind, MarkdownRenderer, NodeModule, RenderError,
};
pub use source::{GitHubSource, RemoteSource, SourceError};
pub use updater::{run, UpdateError, UpdateOutcome, Updater};
