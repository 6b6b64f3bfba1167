//! Pairing of node files with their `.yaml` configs.

use crate::index::IndexEntry;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Suffix of a node's config file.
const YAML_SUFFIX: &str = ".yaml";

/// Kind of an indexed file, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A node file.
    Node,
    /// A `.yaml` config.
    Yaml,
    /// A node file with an all-digit name.
    Numeric,
}

impl FileKind {
    /// Classifies a file by name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if name.ends_with(YAML_SUFFIX) {
            Self::Yaml
        } else if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            Self::Numeric
        } else {
            Self::Node
        }
    }

    /// Returns the kind as shown on the page.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Yaml => "yaml",
            Self::Numeric => "numeric",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node and its config, either of which may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeModule<'a> {
    /// Display name: the node's name, or the config's name without `.yaml`.
    pub name: String,
    /// Path shared by the pair, without the `.yaml` suffix.
    pub path: String,
    /// The node file.
    pub node: Option<&'a IndexEntry>,
    /// The node's `.yaml` config.
    pub yaml: Option<&'a IndexEntry>,
    /// Time shown for the module. The node's time wins over the config's.
    pub last_modified: DateTime<Utc>,
}

impl NodeModule<'_> {
    /// Returns true when both the node and its config exist.
    #[must_use]
    pub fn is_pair(&self) -> bool {
        self.node.is_some() && self.yaml.is_some()
    }

    /// Kind of the module; a config without a node is [`FileKind::Yaml`].
    #[must_use]
    pub fn kind(&self) -> FileKind {
        match self.node {
            Some(node) => FileKind::of(&node.name),
            None => FileKind::Yaml,
        }
    }
}

/// Pairs every node `X` with `X.yaml` when present.
///
/// Nodes come first in listing order, followed by configs that have no node.
#[must_use]
pub fn pair_entries(entries: &[IndexEntry]) -> Vec<NodeModule<'_>> {
    let configs: HashMap<&str, &IndexEntry> = entries
        .iter()
        .filter(|entry| FileKind::of(&entry.name) == FileKind::Yaml)
        .map(|entry| (entry.path.as_str(), entry))
        .collect();
    let mut claimed: HashSet<&str> = HashSet::new();

    let mut modules: Vec<NodeModule<'_>> = entries
        .iter()
        .filter(|entry| FileKind::of(&entry.name) != FileKind::Yaml)
        .map(|node| {
            let yaml = configs
                .get(format!("{}{YAML_SUFFIX}", node.path).as_str())
                .copied();
            if let Some(yaml) = yaml {
                claimed.insert(yaml.path.as_str());
            }
            NodeModule {
                name: node.name.clone(),
                path: node.path.clone(),
                node: Some(node),
                yaml,
                last_modified: node.last_modified,
            }
        })
        .collect();

    modules.extend(
        entries
            .iter()
            .filter(|entry| FileKind::of(&entry.name) == FileKind::Yaml)
            .filter(|yaml| !claimed.contains(yaml.path.as_str()))
            .map(|yaml| NodeModule {
                name: strip_yaml(&yaml.name).to_string(),
                path: strip_yaml(&yaml.path).to_string(),
                node: None,
                yaml: Some(yaml),
                last_modified: yaml.last_modified,
            }),
    );

    modules
}

fn strip_yaml(name: &str) -> &str {
    name.strip_suffix(YAML_SUFFIX).unwrap_or(name)
}
