//! Run configuration.

use crate::config::{ConfigError, IndexSettings};
use crate::filter::IgnoreRules;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Owner used when `REPO_OWNER` is not set.
pub const DEFAULT_REPO_OWNER: &str = "DaiZhouHui";

/// Repository used when `REPO_NAME` is not set.
pub const DEFAULT_REPO_NAME: &str = "CustomNode";

/// Index file written when no output path is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "files_info.json";

/// Default number of in-flight commit lookups.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Which listing of the remote repository is indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// Files in a repository directory.
    #[default]
    Contents,
    /// Assets attached to the repository's releases.
    Releases,
}

impl SourceKind {
    /// Returns the kind as used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contents => "contents",
            Self::Releases => "releases",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contents" => Ok(Self::Contents),
            "releases" => Ok(Self::Releases),
            other => Err(format!(
                "unknown source '{other}', expected 'contents' or 'releases'"
            )),
        }
    }
}

/// Immutable configuration for one index update run.
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Repository owner (user or organization).
    repo_owner: String,
    /// Repository name.
    repo_name: String,
    /// GitHub token; `None` restricts the run to public API access.
    token: Option<String>,
    /// Listing to index.
    source: SourceKind,
    /// Branch, tag or commit used for contents listings.
    reference: Option<String>,
    /// Repository directory listed by the contents source.
    directory: String,
    /// JSON index file.
    output_path: PathBuf,
    /// Optional Markdown page rendered next to the index.
    markdown_path: Option<PathBuf>,
    /// Whether to compute the outcome without writing.
    dry_run: bool,
    /// Maximum concurrent commit lookups.
    concurrency: usize,
    /// Ignore rules and template overrides.
    settings: IndexSettings,
}

impl Configuration {
    /// Creates a configuration with default output settings.
    pub fn new(repo_owner: String, repo_name: String, token: Option<String>) -> Self {
        Self {
            repo_owner,
            repo_name,
            token: token.filter(|t| !t.trim().is_empty()),
            source: SourceKind::default(),
            reference: None,
            directory: String::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            markdown_path: None,
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
            settings: IndexSettings::default(),
        }
    }

    /// Builds a configuration from `REPO_OWNER`, `REPO_NAME` and `GITHUB_TOKEN`.
    ///
    /// Unset or blank owner/name variables fall back to the built-in defaults.
    pub fn from_env() -> Self {
        let owner = env_or_default("REPO_OWNER", DEFAULT_REPO_OWNER);
        let name = env_or_default("REPO_NAME", DEFAULT_REPO_NAME);
        let token = std::env::var("GITHUB_TOKEN").ok();
        Self::new(owner, name, token)
    }

    /// Sets the listing to index.
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    /// Sets the branch, tag or commit to list.
    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference.filter(|r| !r.trim().is_empty());
        self
    }

    /// Sets the repository directory listed by the contents source.
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into().trim_matches('/').to_string();
        self
    }

    /// Sets the JSON index path.
    pub fn with_output_path(mut self, output_path: PathBuf) -> Self {
        self.output_path = output_path;
        self
    }

    /// Sets the Markdown page path.
    pub fn with_markdown_path(mut self, markdown_path: Option<PathBuf>) -> Self {
        self.markdown_path = markdown_path;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the maximum concurrent commit lookups.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Replaces the ignore rules and template overrides.
    pub fn with_settings(mut self, settings: IndexSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the repository owner.
    pub fn repo_owner(&self) -> &str {
        &self.repo_owner
    }

    /// Returns the repository name.
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Returns the repository in `owner/name` form.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Returns the configured GitHub token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the listing to index.
    pub fn source(&self) -> SourceKind {
        self.source
    }

    /// Returns the configured reference.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Returns the listed directory, without leading or trailing slashes.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Returns the JSON index path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the Markdown page path.
    pub fn markdown_path(&self) -> Option<&Path> {
        self.markdown_path.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the maximum concurrent commit lookups.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the loaded settings.
    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// Builds the ignore rules for this run.
    ///
    /// The index and Markdown artifacts are always ignored.
    pub fn ignore_rules(&self) -> IgnoreRules {
        let artifacts = [Some(self.output_path.as_path()), self.markdown_path()]
            .into_iter()
            .flatten()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        IgnoreRules::from_settings(&self.settings).with_names(artifacts)
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty or malformed owner or
    /// repository name, or a zero concurrency limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_slug("repo-owner", &self.repo_owner)?;
        validate_slug("repo-name", &self.repo_name)?;

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                message: "must be at least 1".to_string(),
            });
        }

        if self.output_path.file_name().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "output",
                message: format!("'{}' is not a file path", self.output_path.display()),
            });
        }

        Ok(())
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn validate_slug(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            message: "must not be empty".to_string(),
        });
    }

    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            field,
            message: format!("'{value}' must not contain '/' or whitespace"),
        });
    }

    Ok(())
}
