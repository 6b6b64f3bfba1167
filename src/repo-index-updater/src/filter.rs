//! Ignore rules for remote items.

use crate::config::IndexSettings;
use std::collections::HashSet;

/// Decides which remote items are left out of the index.
///
/// Names are matched exactly against the item's file name (not its path);
/// extensions are plain suffix matches, so `.tar.gz` works as expected.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    names: HashSet<String>,
    extensions: Vec<String>,
}

impl IgnoreRules {
    /// Builds rules from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &IndexSettings) -> Self {
        let names = settings
            .ignore_names
            .iter()
            .chain(&settings.extra_ignore_names)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let extensions = settings
            .ignore_extensions
            .iter()
            .map(|ext| ext.trim().to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { names, extensions }
    }

    /// Adds exact names to ignore.
    #[must_use]
    pub fn with_names(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.names.extend(names);
        self
    }

    /// Returns true if an item with this file name must not be indexed.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.names.contains(name) || self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_skip_housekeeping_files() {
        let rules = IgnoreRules::from_settings(&IndexSettings::default());

        assert!(rules.is_ignored("README.md"));
        assert!(rules.is_ignored(".gitignore"));
        assert!(rules.is_ignored("debug.log"));
        assert!(rules.is_ignored("nodes.bak"));
        assert!(!rules.is_ignored("20240101"));
        assert!(!rules.is_ignored("node-01.yaml"));
    }

    #[test]
    fn extra_names_extend_defaults() {
        let settings = IndexSettings {
            extra_ignore_names: vec!["LICENSE".to_string()],
            ..IndexSettings::default()
        };
        let rules = IgnoreRules::from_settings(&settings);

        assert!(rules.is_ignored("LICENSE"));
        assert!(rules.is_ignored("README.md"));
    }

    #[test]
    fn replaced_lists_drop_defaults() {
        let settings = IndexSettings {
            ignore_names: vec![],
            ignore_extensions: vec![".yaml".to_string(), " ".to_string()],
            ..IndexSettings::default()
        };
        let rules = IgnoreRules::from_settings(&settings);

        assert!(!rules.is_ignored("README.md"));
        assert!(rules.is_ignored("node-01.yaml"));
        assert!(!rules.is_ignored("node-01"));
    }
}
