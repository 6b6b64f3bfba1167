//! Markdown page error types.

/// Failure to build or render the Markdown page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The page template does not compile.
    #[error("Markdown template does not compile: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),

    /// The template referenced data the page does not provide.
    #[error("Failed to render Markdown page for {repo}: {source}")]
    Page {
        repo: String,
        #[source]
        source: handlebars::RenderError,
    },
}
