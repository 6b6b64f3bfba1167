//! Markdown rendering of an index using Handlebars.
//!
//! Node files are paired with their `.yaml` configs, and the resulting
//! modules are grouped by the UTC day they last changed, newest day first,
//! so the page reads like a changelog of the repository.

mod error;
mod pairing;
mod renderer;

pub use error::RenderError;
pub use pairing::{pair_entries, FileKind, NodeModule};
pub use renderer::{create_handlebars_registry, MarkdownRenderer, DEFAULT_MARKDOWN_TEMPLATE};

use crate::index::IndexEntry;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Modules that last changed on the same UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup<'a> {
    /// Day shared by all modules.
    pub date: NaiveDate,
    /// Modules, newest first.
    pub modules: Vec<NodeModule<'a>>,
}

/// Pairs entries into modules and groups them by day, newest day first.
///
/// Within a day, modules are ordered newest first; ties fall back to path.
#[must_use]
pub fn group_by_date(entries: &[IndexEntry]) -> Vec<DateGroup<'_>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<NodeModule<'_>>> = BTreeMap::new();
    for module in pair_entries(entries) {
        grouped
            .entry(module.last_modified.date_naive())
            .or_default()
            .push(module);
    }

    grouped
        .into_iter()
        .rev()
        .map(|(date, mut modules)| {
            modules.sort_by(|a, b| {
                b.last_modified
                    .cmp(&a.last_modified)
                    .then_with(|| a.path.cmp(&b.path))
            });
            DateGroup { date, modules }
        })
        .collect()
}

/// Formats a byte count for display, e.g. `1.5 KiB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
