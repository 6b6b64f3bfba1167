//! Run configuration and settings loading.
//!
//! A [`Configuration`] is built once at process start, from environment
//! variables or command line arguments, and optionally enriched with an
//! `index.toml` settings file.

mod configuration;
mod error;
mod settings;

pub use configuration::{
    Configuration, SourceKind, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_PATH, DEFAULT_REPO_NAME,
    DEFAULT_REPO_OWNER,
};
pub use error::ConfigError;
pub use settings::{default_ignore_extensions, default_ignore_names, IndexSettings};

use std::path::Path;
use tracing::{debug, info};

/// Loads an `index.toml` settings file.
///
/// ```toml
/// ignore-names = ["README.md", "LICENSE"]
/// ignore-extensions = [".log", ".bak"]
/// extra-ignore-names = ["notes.txt"]
/// markdown-template = "# {{repo}}"
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if the file does not exist,
/// [`ConfigError::IoError`] if it cannot be read and [`ConfigError::TomlError`]
/// if it is not valid settings TOML.
pub fn load_settings(path: &Path) -> Result<IndexSettings, ConfigError> {
    info!(path = %path.display(), "Loading index settings");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let settings: IndexSettings = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    if let Some(template) = &settings.markdown_template {
        if template.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "markdown-template",
                message: format!("empty template in '{}'", path.display()),
            });
        }
    }

    debug!(
        ignore_names = settings.ignore_names.len(),
        ignore_extensions = settings.ignore_extensions.len(),
        "Loaded index settings"
    );
    Ok(settings)
}
