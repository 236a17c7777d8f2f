//! Pipeline orchestration.
//!
//! Drives materialize + filter over the full source set under a bounded
//! worker pool, then runs the sequential classification pass once every
//! worker has finished. Item-level failures (descriptor, extraction, I/O)
//! skip that item and continue; classification failures abort the run.

use crate::error::{ErrorKind, Result};
use crate::filter::{FolderFate, filter_media};
use crate::materialize::materialize;
use crate::policy::RetentionPolicy;
use crate::shard::{ClassifyEvent, ShardAllocator, Terminal, classify};
use crate::title::resolve_title;
use futures::{TryStreamExt, pin_mut};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use wallshard_extract::ExtractorHandle;

/// Final counts for one full run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Source items discovered.
    pub items: u64,
    /// Output folders that survived filtering.
    pub survived: u64,
    /// Items skipped due to item-level failures.
    pub skipped: u64,
    /// Folders classified as video.
    pub video: u64,
    /// Folders reduced to a single selected file.
    pub selected: u64,
    /// Folders kept intact as groups.
    pub group: u64,
}

/// The full materialize → filter → classify pipeline.
pub struct Pipeline {
    extractor: ExtractorHandle,
    policy: RetentionPolicy,
    shard_capacity: u64,
    workers: usize,
}

impl Pipeline {
    /// Assemble a pipeline. A worker count of zero means one worker per
    /// available CPU.
    pub fn new(extractor: ExtractorHandle, policy: RetentionPolicy, shard_capacity: u64, workers: usize) -> Self {
        let workers = match workers {
            0 => std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(4),
            n => n,
        };
        Self { extractor, policy, shard_capacity, workers }
    }

    /// Process every item under `source_root` into `output_root`.
    ///
    /// Phase one materializes and filters items concurrently; each worker
    /// owns one item end-to-end and items never share destination
    /// directories, so the filesystem is the only shared state. The
    /// survivor counter is the one cross-worker entity and its increments
    /// are atomic — survivor sequence therefore depends on completion
    /// order, which is explicitly best-effort. Phase two classifies
    /// sequentially and starts only after every worker has finished.
    ///
    /// # Errors
    /// Returns [`Io`](ErrorKind::Io) when the source set cannot be
    /// enumerated or the classification phase fails. Item-level failures
    /// are logged, counted in [`Summary::skipped`], and never abort the
    /// run.
    pub async fn run(&self, source_root: &Path, output_root: &Path) -> Result<Summary> {
        fs::create_dir_all(output_root).await.map_err(ErrorKind::Io)?;
        let items = list_source_items(source_root).await?;
        let mut summary = Summary { items: items.len() as u64, ..Summary::default() };
        tracing::info!(items = summary.items, workers = self.workers, "starting materialize/filter phase");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let survivors = Arc::new(ShardAllocator::new(self.shard_capacity));
        let mut workers = JoinSet::new();
        for (source_dir, name) in items {
            let semaphore = semaphore.clone();
            let extractor = self.extractor.clone();
            let survivors = survivors.clone();
            let output_root = output_root.to_path_buf();
            let policy = self.policy;
            workers.spawn(async move {
                // The semaphore is never closed, so a failed acquire can't
                // happen; `ok()` just avoids pretending otherwise.
                let _permit = semaphore.acquire_owned().await.ok();
                process_item(&extractor, &source_dir, &name, &output_root, policy, &survivors).await
            });
        }
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(ItemOutcome::Survived | ItemOutcome::Empty) => {},
                Ok(ItemOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    tracing::error!(error = %e, "worker panicked; counting item as skipped");
                    summary.skipped += 1;
                },
            }
        }
        summary.survived = survivors.assigned();
        tracing::info!(survived = summary.survived, skipped = summary.skipped, "materialize/filter phase complete");

        // Classification owns its own counter; shard indices restart at
        // zero by design.
        let classifier = ShardAllocator::new(self.shard_capacity);
        let events = classify(output_root, &classifier);
        pin_mut!(events);
        while let Some(event) = events.try_next().await? {
            if let ClassifyEvent::Classified { terminal, .. } = event {
                match terminal {
                    Terminal::Video => summary.video += 1,
                    Terminal::Selected => summary.selected += 1,
                    Terminal::Group => summary.group += 1,
                }
            }
        }
        Ok(summary)
    }
}

enum ItemOutcome {
    Survived,
    Empty,
    Skipped,
}

/// One worker's whole job: title → materialize → filter → count survival.
async fn process_item(
    extractor: &ExtractorHandle,
    source_dir: &Path,
    name: &str,
    output_root: &Path,
    policy: RetentionPolicy,
    survivors: &ShardAllocator,
) -> ItemOutcome {
    match process_item_inner(extractor, source_dir, name, output_root, policy).await {
        Ok(FolderFate::Survived) => {
            survivors.assign();
            ItemOutcome::Survived
        },
        Ok(FolderFate::Removed) => ItemOutcome::Empty,
        Err(e) => {
            tracing::warn!(item = name, error = ?e, "item failed; skipping");
            ItemOutcome::Skipped
        },
    }
}

async fn process_item_inner(
    extractor: &ExtractorHandle,
    source_dir: &Path,
    name: &str,
    output_root: &Path,
    policy: RetentionPolicy,
) -> Result<FolderFate> {
    let title = resolve_title(source_dir, name, policy).await?;
    if title.is_empty() {
        // An empty title would make the destination the output root itself,
        // putting sibling items' in-flight folders in the filter's path.
        exn::bail!(ErrorKind::EmptyTitle(name.to_owned()));
    }
    let destination = output_root.join(&title);
    fs::create_dir_all(&destination).await.map_err(ErrorKind::Io)?;
    materialize(extractor, source_dir, &destination).await?;
    filter_media(&destination, policy).await
}

async fn list_source_items(source_root: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut items = Vec::new();
    let mut entries = fs::read_dir(source_root).await.map_err(ErrorKind::Io)?;
    while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
        if entry.file_type().await.map_err(ErrorKind::Io)?.is_dir() {
            items.push((entry.path(), entry.file_name().to_string_lossy().into_owned()));
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallshard_extract::MockExtractor;

    async fn seed_plain_item(source_root: &Path, name: &str, files: &[(&str, usize)]) {
        let item = source_root.join(name);
        fs::create_dir_all(&item).await.unwrap();
        for (file, size) in files {
            fs::write(item.join(file), vec![0u8; *size]).await.unwrap();
        }
    }

    #[tokio::test]
    async fn full_run_produces_classified_shards() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        // Archive-backed item whose extracted payload carries a video.
        seed_plain_item(source.path(), "archived", &[("scene.pkg", 8)]).await;
        // Plain item that reduces to preview + one big still.
        seed_plain_item(
            source.path(),
            "stills",
            &[("art.png", 30 * 1024), ("preview.jpg", 5 * 1024), ("note.txt", 100)],
        )
        .await;
        // Plain item with nothing worth keeping.
        seed_plain_item(source.path(), "junk", &[("tiny.png", 1024), ("readme.txt", 64)]).await;

        let extractor: ExtractorHandle =
            Arc::new(MockExtractor::with_payload([("anim.mp4", vec![0u8; 30 * 1024])]));
        let pipeline = Pipeline::new(extractor, RetentionPolicy::Strict, 100, 2);
        let summary = pipeline.run(source.path(), output.path()).await.unwrap();

        assert_eq!(summary.items, 3);
        assert_eq!(summary.survived, 2);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.video, 1);
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.group, 0);
        assert!(output.path().join("output0/mp4/archived/anim.mp4").exists());
        assert!(output.path().join("output0/selected/stills.png").exists());
    }

    #[tokio::test]
    async fn extraction_failure_skips_only_that_item() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        seed_plain_item(source.path(), "broken", &[("scene.pkg", 8)]).await;
        seed_plain_item(source.path(), "fine", &[("art.png", 30 * 1024)]).await;

        let extractor: ExtractorHandle = Arc::new(MockExtractor::failing(1));
        let pipeline = Pipeline::new(extractor, RetentionPolicy::Strict, 100, 2);
        let summary = pipeline.run(source.path(), output.path()).await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.survived, 1);
        assert_eq!(summary.selected, 1);
        assert!(output.path().join("output0/selected/fine.png").exists());
    }

    #[tokio::test]
    async fn bad_descriptor_skips_only_that_item() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        seed_plain_item(source.path(), "untitled", &[("art.png", 30 * 1024)]).await;
        fs::write(source.path().join("untitled/project.json"), br#"{"type": "scene"}"#).await.unwrap();
        seed_plain_item(source.path(), "named", &[("art.png", 30 * 1024)]).await;
        fs::write(source.path().join("named/project.json"), br#"{"title": "City"}"#).await.unwrap();

        let extractor: ExtractorHandle = Arc::new(MockExtractor::default());
        let pipeline = Pipeline::new(extractor, RetentionPolicy::Strict, 100, 2);
        let summary = pipeline.run(source.path(), output.path()).await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.survived, 1);
        assert!(output.path().join("output0/selected/City_named.png").exists());
    }

    #[tokio::test]
    async fn unnameable_item_is_skipped_without_touching_siblings() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        // Whitespace-only folder name sanitizes down to an empty title.
        seed_plain_item(source.path(), "   ", &[("art.png", 30 * 1024)]).await;
        seed_plain_item(source.path(), "fine", &[("art.png", 30 * 1024)]).await;

        let extractor: ExtractorHandle = Arc::new(MockExtractor::default());
        let pipeline = Pipeline::new(extractor, RetentionPolicy::Strict, 100, 2);
        let summary = pipeline.run(source.path(), output.path()).await.unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.survived, 1);
        assert!(output.path().join("output0/selected/fine.png").exists());
    }

    #[tokio::test]
    async fn empty_source_set_is_a_clean_run() {
        let source = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let extractor: ExtractorHandle = Arc::new(MockExtractor::default());
        let pipeline = Pipeline::new(extractor, RetentionPolicy::Strict, 100, 2);
        let summary = pipeline.run(source.path(), output.path()).await.unwrap();
        assert_eq!(summary, Summary::default());
    }
}
