//! Markdown renderer.

use super::{format_size, group_by_date, NodeModule, RenderError};
use crate::index::{Index, IndexEntry};
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::{json, Value};

/// Name the page template is registered under.
const TEMPLATE_NAME: &str = "index";

/// Template used when `index.toml` does not provide one.
pub const DEFAULT_MARKDOWN_TEMPLATE: &str = "# {{repo}}

Generated at {{generated_at}} ({{entry_count}} entries)

{{module_count}} modules: {{pair_count}} paired, {{node_count}} with node, {{yaml_count}} with config
{{#each groups}}

## {{date}} ({{count}})

| Name | Type | Node | Config | Updated (UTC) |
| --- | --- | --- | --- | --- |
{{#each modules}}
| {{name}} | {{kind}} | {{#if node}}[{{node.name}}]({{node.url}}) {{filesize node.size}}{{else}}-{{/if}} | {{#if yaml}}[{{yaml.name}}]({{yaml.url}}) {{filesize yaml.size}}{{else}}-{{/if}} | {{time}} |
{{/each}}
{{/each}}
";

handlebars_helper!(filesize: |bytes: u64| format_size(bytes));

/// Creates a configured Handlebars registry with custom helpers.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
/// - `filesize` helper for human readable sizes
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs.register_helper("filesize", Box::new(filesize));

    hbs
}

/// Renders an [`Index`] as a Markdown page.
pub struct MarkdownRenderer {
    handlebars: Handlebars<'static>,
}

impl MarkdownRenderer {
    /// Compiles the page template, or the default one when `template` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidTemplate`] if the template does not parse.
    pub fn new(template: Option<&str>) -> Result<Self, RenderError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(
            TEMPLATE_NAME,
            template.unwrap_or(DEFAULT_MARKDOWN_TEMPLATE),
        )?;
        Ok(Self { handlebars })
    }

    /// Renders the page for an index.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Page`] if the template references data that
    /// does not exist.
    pub fn render(&self, index: &Index) -> Result<String, RenderError> {
        self.handlebars
            .render(TEMPLATE_NAME, &page_data(index))
            .map_err(|source| RenderError::Page {
                repo: index.repo().to_string(),
                source,
            })
    }
}

/// Builds the template context for an index.
fn page_data(index: &Index) -> Value {
    let groups = group_by_date(index.entries());
    let all_modules = || groups.iter().flat_map(|group| group.modules.iter());

    let group_data: Vec<Value> = groups
        .iter()
        .map(|group| {
            let modules: Vec<Value> = group.modules.iter().map(module_data).collect();
            json!({
                "date": group.date.format("%Y-%m-%d").to_string(),
                "count": modules.len(),
                "modules": modules,
            })
        })
        .collect();

    json!({
        "repo": index.repo(),
        "generated_at": index.generated_at().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        "entry_count": index.len(),
        "module_count": all_modules().count(),
        "pair_count": all_modules().filter(|m| m.is_pair()).count(),
        "node_count": all_modules().filter(|m| m.node.is_some()).count(),
        "yaml_count": all_modules().filter(|m| m.yaml.is_some()).count(),
        "groups": group_data,
    })
}

fn module_data(module: &NodeModule<'_>) -> Value {
    json!({
        "name": module.name,
        "path": module.path,
        "kind": module.kind().as_str(),
        "is_pair": module.is_pair(),
        "time": module.last_modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        "node": module.node.map(file_data),
        "yaml": module.yaml.map(file_data),
    })
}

fn file_data(entry: &IndexEntry) -> Value {
    json!({
        "name": entry.name,
        "path": entry.path,
        "url": entry.url,
        "size": entry.size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_index() -> Index {
        let day_one = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let day_two = Utc.with_ymd_and_hms(2024, 5, 2, 21, 0, 5).unwrap();
        Index::new(
            "octo/nodes",
            vec![
                IndexEntry::new("node-01", "node-01", "https://example.com/node-01", day_one, 2048),
                IndexEntry::new("node-02", "node-02", "https://example.com/node-02", day_two, 10),
            ],
            day_two,
        )
    }

    #[test]
    fn default_template_groups_by_date() {
        let renderer = MarkdownRenderer::new(None).unwrap();

        let page = renderer.render(&sample_index()).unwrap();

        assert!(page.starts_with("# octo/nodes"));
        assert!(page.contains("(2 entries)"));
        assert!(page.contains("## 2024-05-02 (1)"));
        assert!(page.contains(
            "| node-01 | node | [node-01](https://example.com/node-01) 2.0 KiB | - | 2024-05-01 08:30:00 |"
        ));
        let newer = page.find("## 2024-05-02").unwrap();
        let older = page.find("## 2024-05-01").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn default_template_shows_pairs() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let index = Index::new(
            "octo/nodes",
            vec![
                IndexEntry::new("node-01", "node-01", "https://example.com/node-01", time, 10),
                IndexEntry::new("node-01.yaml", "node-01.yaml", "https://example.com/node-01.yaml", time, 20),
                IndexEntry::new("node-02.yaml", "node-02.yaml", "https://example.com/node-02.yaml", time, 30),
            ],
            time,
        );
        let renderer = MarkdownRenderer::new(None).unwrap();

        let page = renderer.render(&index).unwrap();

        assert!(page.contains("2 modules: 1 paired, 1 with node, 2 with config"));
        assert!(page.contains(
            "| node-01 | node | [node-01](https://example.com/node-01) 10 B | [node-01.yaml](https://example.com/node-01.yaml) 20 B |"
        ));
        assert!(page.contains("| node-02 | yaml | - | [node-02.yaml](https://example.com/node-02.yaml) 30 B |"));
    }

    #[test]
    fn can_render_custom_template() {
        let renderer =
            MarkdownRenderer::new(Some("{{repo}}:{{#each groups}} {{date}}={{count}}{{/each}}"))
                .unwrap();

        let page = renderer.render(&sample_index()).unwrap();

        assert_eq!(page, "octo/nodes: 2024-05-02=1 2024-05-01=1");
    }

    #[test]
    fn no_html_escaping() {
        let renderer = MarkdownRenderer::new(Some("{{repo}}")).unwrap();
        let index = Index::new("<b>octo</b>/nodes", vec![], Utc::now());

        assert_eq!(renderer.render(&index).unwrap(), "<b>octo</b>/nodes");
    }

    #[test]
    fn invalid_template_fails_registration() {
        let result = MarkdownRenderer::new(Some("{{#each groups}}"));
        assert!(matches!(result, Err(RenderError::InvalidTemplate(_))));
    }

    #[test]
    fn unknown_variable_fails_in_strict_mode() {
        let renderer = MarkdownRenderer::new(Some("{{owner}}")).unwrap();

        let result = renderer.render(&sample_index());
        assert!(matches!(result, Err(RenderError::Page { .. })));
    }
}
