//! `index.toml` settings deserialization.

use serde::Deserialize;

/// Parsed contents of an optional `index.toml` settings file.
///
/// Every key is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IndexSettings {
    /// File names that are never indexed. Replaces the built-in list.
    #[serde(default = "default_ignore_names")]
    pub ignore_names: Vec<String>,

    /// File name suffixes that are never indexed. Replaces the built-in list.
    #[serde(default = "default_ignore_extensions")]
    pub ignore_extensions: Vec<String>,

    /// Additional file names appended to `ignore_names`.
    #[serde(default)]
    pub extra_ignore_names: Vec<String>,

    /// Handlebars template used for the Markdown page.
    pub markdown_template: Option<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            ignore_names: default_ignore_names(),
            ignore_extensions: default_ignore_extensions(),
            extra_ignore_names: Vec::new(),
            markdown_template: None,
        }
    }
}

/// Repository housekeeping files that are not part of the published listing.
pub fn default_ignore_names() -> Vec<String> {
    [
        ".gitignore",
        "README.md",
        "index.html",
        "update-index.html",
        "style.css",
        "script.js",
        "files_info.json",
        "requirements.txt",
        ".env",
        ".env.example",
        "package.json",
        "package-lock.json",
        "yarn.lock",
        "config.json",
        "settings.json",
        "index.toml",
        "index.md",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Scratch and backup suffixes.
pub fn default_ignore_extensions() -> Vec<String> {
    [".log", ".tmp", ".temp", ".bak"]
        .into_iter()
        .map(String::from)
        .collect()
}
