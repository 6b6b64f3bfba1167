use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use repo_index_updater::{
    load_index, Configuration, IndexEntry, RemoteSource, SourceError, UpdateError, UpdateOutcome,
    Updater,
};
use tempfile::TempDir;

/// Serves a listing that tests can swap between runs.
struct FakeSource {
    listing: Mutex<Result<Vec<IndexEntry>, ErrorKind>>,
}

impl FakeSource {
    fn new(entries: Vec<IndexEntry>) -> Self {
        Self {
            listing: Mutex::new(Ok(entries)),
        }
    }

    fn set(&self, listing: Result<Vec<IndexEntry>, ErrorKind>) {
        *self.listing.lock().unwrap() = listing;
    }
}

impl RemoteSource for &FakeSource {
    async fn fetch(&self) -> Result<Vec<IndexEntry>, SourceError> {
        match &*self.listing.lock().unwrap() {
            Ok(entries) => Ok(entries.clone()),
            Err(kind) => Err(SourceError::RemoteUnavailable(Box::new(Error::new(
                *kind,
                "connection refused",
            )))),
        }
    }
}

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
}

fn entry(path: &str, url: &str, last_modified: DateTime<Utc>) -> IndexEntry {
    IndexEntry::new(path, path, url, last_modified, 0)
}

fn config(output: &Path) -> Configuration {
    Configuration::new("octo".to_string(), "nodes".to_string(), None)
        .with_output_path(output.to_path_buf())
}

fn output_in(temp: &TempDir) -> PathBuf {
    temp.path().join("files_info.json")
}

#[tokio::test]
async fn first_run_creates_index() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![entry("a.txt", "u1", t1())]);

    let updater = Updater::with_source(config(&output), &source).unwrap();
    let outcome = updater.run().await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated { entry_count: 1 });
    let index = load_index(&output).unwrap().unwrap();
    assert_eq!(index.entries(), &[entry("a.txt", "u1", t1())]);
    assert_eq!(index.repo(), "octo/nodes");
}

#[tokio::test]
async fn second_run_against_same_listing_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![entry("a.txt", "u1", t1())]);
    let updater = Updater::with_source(config(&output), &source).unwrap();

    updater.run().await.unwrap();
    let bytes_before = std::fs::read(&output).unwrap();
    let modified_before = std::fs::metadata(&output).unwrap().modified().unwrap();

    let outcome = updater.run().await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert_eq!(std::fs::read(&output).unwrap(), bytes_before);
    assert_eq!(
        std::fs::metadata(&output).unwrap().modified().unwrap(),
        modified_before
    );
}

#[tokio::test]
async fn changed_listing_rewrites_index() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![entry("a.txt", "u1", t1())]);
    let updater = Updater::with_source(config(&output), &source).unwrap();
    updater.run().await.unwrap();

    let t2 = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
    source.set(Ok(vec![entry("a.txt", "u1", t2), entry("b.txt", "u2", t2)]));
    let outcome = updater.run().await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated { entry_count: 2 });
    let index = load_index(&output).unwrap().unwrap();
    assert_eq!(index.entries()[0].last_modified, t2);
}

#[tokio::test]
async fn entries_are_written_sorted_by_path() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![
        entry("zeta", "u3", t1()),
        entry("alpha", "u1", t1()),
        entry("mid/node", "u2", t1()),
    ]);

    let updater = Updater::with_source(config(&output), &source).unwrap();
    updater.run().await.unwrap();

    let index = load_index(&output).unwrap().unwrap();
    let paths: Vec<&str> = index.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["alpha", "mid/node", "zeta"]);
}

#[tokio::test]
async fn remote_order_does_not_cause_rewrite() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![entry("a", "u1", t1()), entry("b", "u2", t1())]);
    let updater = Updater::with_source(config(&output), &source).unwrap();
    updater.run().await.unwrap();

    source.set(Ok(vec![entry("b", "u2", t1()), entry("a", "u1", t1())]));

    assert_eq!(updater.run().await.unwrap(), UpdateOutcome::Unchanged);
}

#[tokio::test]
async fn network_failure_leaves_index_untouched() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![entry("a.txt", "u1", t1())]);
    let updater = Updater::with_source(config(&output), &source).unwrap();
    updater.run().await.unwrap();
    let bytes_before = std::fs::read(&output).unwrap();

    source.set(Err(ErrorKind::ConnectionRefused));
    let result = updater.run().await;

    assert!(matches!(result, Err(UpdateError::RemoteUnavailable(_))));
    assert_eq!(std::fs::read(&output).unwrap(), bytes_before);
}

#[tokio::test]
async fn network_failure_without_index_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![]);
    source.set(Err(ErrorKind::TimedOut));

    let updater = Updater::with_source(config(&output), &source).unwrap();
    let result = updater.run().await;

    assert!(matches!(result, Err(UpdateError::RemoteUnavailable(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn empty_listing_writes_empty_index() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let source = FakeSource::new(vec![]);

    let updater = Updater::with_source(config(&output), &source).unwrap();

    assert_eq!(
        updater.run().await.unwrap(),
        UpdateOutcome::Updated { entry_count: 0 }
    );
    assert!(load_index(&output).unwrap().unwrap().is_empty());
    assert_eq!(updater.run().await.unwrap(), UpdateOutcome::Unchanged);
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let markdown = temp.path().join("index.md");
    let source = FakeSource::new(vec![entry("a.txt", "https://example.com/a.txt", t1())]);
    let config = config(&output)
        .with_markdown_path(Some(markdown.clone()))
        .with_dry_run(true);

    let updater = Updater::with_source(config, &source).unwrap();
    let outcome = updater.run().await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Updated { entry_count: 1 });
    assert!(!output.exists());
    assert!(!markdown.exists());
}

#[tokio::test]
async fn markdown_page_is_written_with_index() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let markdown = temp.path().join("index.md");
    let source = FakeSource::new(vec![entry("a.txt", "https://example.com/a.txt", t1())]);
    let config = config(&output).with_markdown_path(Some(markdown.clone()));

    let updater = Updater::with_source(config, &source).unwrap();
    updater.run().await.unwrap();

    let page = std::fs::read_to_string(&markdown).unwrap();
    assert!(page.contains("# octo/nodes"));
    assert!(page.contains("## 2024-05-01 (1)"));
    assert!(page.contains("[a.txt](https://example.com/a.txt)"));
}

#[tokio::test]
async fn own_artifacts_are_not_indexed() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("listing.json");
    let source = FakeSource::new(vec![
        entry("listing.json", "u0", t1()),
        entry("node-01", "u1", t1()),
    ]);

    let updater = Updater::with_source(config(&output), &source).unwrap();

    assert_eq!(
        updater.run().await.unwrap(),
        UpdateOutcome::Updated { entry_count: 1 }
    );
}

#[tokio::test]
async fn write_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    std::fs::write(&blocker, "file").unwrap();
    let output = blocker.join("files_info.json");
    let source = FakeSource::new(vec![entry("a.txt", "u1", t1())]);

    let updater = Updater::with_source(config(&output), &source).unwrap();
    let result = updater.run().await;

    assert!(matches!(result, Err(UpdateError::WriteFailed(_))));
    assert_eq!(std::fs::read_to_string(&blocker).unwrap(), "file");
}

#[tokio::test]
async fn missing_markdown_page_is_written_for_unchanged_listing() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let markdown = temp.path().join("index.md");
    let source = FakeSource::new(vec![entry("a.txt", "https://example.com/a.txt", t1())]);
    Updater::with_source(config(&output), &source)
        .unwrap()
        .run()
        .await
        .unwrap();
    let index_before = std::fs::read(&output).unwrap();

    let updater =
        Updater::with_source(config(&output).with_markdown_path(Some(markdown.clone())), &source)
            .unwrap();
    let outcome = updater.run().await.unwrap();

    assert_eq!(outcome, UpdateOutcome::Unchanged);
    assert_eq!(std::fs::read(&output).unwrap(), index_before);
    let page = std::fs::read_to_string(&markdown).unwrap();
    assert!(page.contains("[a.txt](https://example.com/a.txt)"));

    std::fs::write(&markdown, "kept").unwrap();
    assert_eq!(updater.run().await.unwrap(), UpdateOutcome::Unchanged);
    assert_eq!(std::fs::read_to_string(&markdown).unwrap(), "kept");
}

#[tokio::test]
async fn node_and_config_share_a_row_on_the_page() {
    let temp = TempDir::new().unwrap();
    let output = output_in(&temp);
    let markdown = temp.path().join("index.md");
    let source = FakeSource::new(vec![
        entry("node-01", "https://example.com/node-01", t1()),
        entry("node-01.yaml", "https://example.com/node-01.yaml", t1()),
    ]);
    let config = config(&output).with_markdown_path(Some(markdown.clone()));

    let updater = Updater::with_source(config, &source).unwrap();
    updater.run().await.unwrap();

    assert_eq!(load_index(&output).unwrap().unwrap().len(), 2);
    let page = std::fs::read_to_string(&markdown).unwrap();
    assert!(page.contains("## 2024-05-01 (1)"));
    assert!(page.contains("1 paired"));
}
