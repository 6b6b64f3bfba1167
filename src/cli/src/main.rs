//! CLI for the repository index updater.
//!
//! Lists a GitHub repository's files (or release assets) and rewrites the
//! local index file when the listing changed. Intended to be run on a
//! schedule, e.g. from a GitHub Actions workflow.

use clap::Parser;
use repo_index_updater::config::{
    DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_PATH, DEFAULT_REPO_NAME, DEFAULT_REPO_OWNER,
};
use repo_index_updater::{
    load_settings, Configuration, SourceKind, UpdateError, UpdateOutcome, Updater,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Repository Index Updater - Keep a JSON index of a GitHub repository's files up to date.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository owner.
    #[arg(long, env = "REPO_OWNER", default_value = DEFAULT_REPO_OWNER)]
    owner: String,

    /// Repository name.
    #[arg(long, env = "REPO_NAME", default_value = DEFAULT_REPO_NAME)]
    repo: String,

    /// GitHub Personal Access Token. Without it only public data is reachable.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Listing to index: `contents` or `releases`.
    #[arg(long, default_value_t = SourceKind::Contents)]
    source: SourceKind,

    /// Branch, tag or commit to list (contents only).
    #[arg(long = "ref")]
    reference: Option<String>,

    /// Repository directory to list (contents only).
    #[arg(long, default_value = "")]
    directory: String,

    /// Path of the JSON index file.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Also render a Markdown page to this path.
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Path to an `index.toml` settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute the outcome without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Maximum concurrent commit lookups.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    // The GitHub client needs a process-wide rustls provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    init_tracing();

    let args = Args::parse();
    let repository = format!("{}/{}", args.owner, args.repo);
    let dry_run = args.dry_run;

    match run(args).await {
        Ok(outcome) => {
            print_summary(&repository, dry_run, outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Index update failed");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<UpdateOutcome, UpdateError> {
    let mut config = Configuration::new(args.owner, args.repo, args.token)
        .with_source(args.source)
        .with_reference(args.reference)
        .with_directory(args.directory)
        .with_output_path(args.output)
        .with_markdown_path(args.markdown)
        .with_dry_run(args.dry_run)
        .with_concurrency(args.concurrency);
    if let Some(path) = args.config {
        config = config.with_settings(load_settings(&path)?);
    }
    if config.token().is_none() {
        warn!("GITHUB_TOKEN is not set, using unauthenticated API access");
    }

    let updater = Updater::new(config)?;
    updater.run().await
}

/// Prints the final run summary.
fn print_summary(repository: &str, dry_run: bool, outcome: UpdateOutcome) {
    println!("\nSummary:");
    println!("  Repository: {repository}");
    println!("  Mode: {}", if dry_run { "Dry Run" } else { "Live" });
    match outcome {
        UpdateOutcome::Updated { entry_count } => {
            println!("  Outcome: {} ({entry_count} entries)", outcome.as_str());
        }
        UpdateOutcome::Unchanged => println!("  Outcome: {}", outcome.as_str()),
    }
}
