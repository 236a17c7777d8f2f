use crate::consts::SHARD_PREFIX;
use crate::error::{ErrorKind, Result};
use crate::shard::allocator::ShardAllocator;
use crate::shard::folder::{Terminal, classify_folder};
use async_stream::stream;
use futures::Stream;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Progress events from the sequential classification pass.
pub enum ClassifyEvent {
    Started,
    /// One folder received its terminal classification.
    Classified { folder: PathBuf, terminal: Terminal, shard: u64 },
    /// The pass finished; carries the number of folders classified.
    Complete(u64),
}

/// Classifies every surviving output folder under `output_root` into the
/// current shard, sequentially and in listing order.
///
/// The folder set is snapshotted before any shard directory is created, and
/// `output<N>` directories are never consumed — re-running over an
/// already-classified tree classifies nothing. The first error terminates
/// the stream: later shard state depends on earlier steps completing, so
/// classification failures are fatal to the run.
pub fn classify<'a>(
    output_root: &'a Path,
    allocator: &'a ShardAllocator,
) -> impl Stream<Item = Result<ClassifyEvent>> + 'a {
    stream! {
        yield Ok(ClassifyEvent::Started);
        let folders = match snapshot(output_root).await {
            Ok(folders) => folders,
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        let mut classified = 0u64;
        for (path, name) in folders {
            let slot = allocator.assign();
            let shard_dir = output_root.join(format!("{SHARD_PREFIX}{}", slot.shard));
            match classify_folder(&path, &name, &shard_dir).await {
                Ok(terminal) => {
                    classified += 1;
                    tracing::debug!(folder = %path.display(), ?terminal, shard = slot.shard, "classified");
                    yield Ok(ClassifyEvent::Classified { folder: path, terminal, shard: slot.shard });
                },
                Err(e) => {
                    yield Err(e);
                    return;
                },
            }
        }
        yield Ok(ClassifyEvent::Complete(classified));
    }
}

/// Immediate subdirectories of the output root, excluding shard containers.
async fn snapshot(output_root: &Path) -> Result<Vec<(PathBuf, OsString)>> {
    let mut folders = Vec::new();
    let mut entries = fs::read_dir(output_root).await.map_err(ErrorKind::Io)?;
    while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
        if !entry.file_type().await.map_err(ErrorKind::Io)?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if is_shard_name(&name.to_string_lossy()) {
            continue;
        }
        folders.push((entry.path(), name));
    }
    Ok(folders)
}

/// Matches `output<N>` exactly: the classifier must never consume its own
/// prior output.
fn is_shard_name(name: &str) -> bool {
    name.strip_prefix(SHARD_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{TryStreamExt, pin_mut};
    use rstest::rstest;

    async fn seed_folders(root: &Path, count: usize) {
        for index in 0..count {
            let folder = root.join(format!("item{index:03}"));
            fs::create_dir_all(&folder).await.unwrap();
            fs::write(folder.join("a.png"), b"a").await.unwrap();
            fs::write(folder.join("b.png"), b"b").await.unwrap();
        }
    }

    async fn drain(root: &Path, allocator: &ShardAllocator) -> (u64, u64) {
        let stream = classify(root, allocator);
        pin_mut!(stream);
        let mut classified = 0;
        let mut complete = 0;
        while let Some(event) = stream.try_next().await.unwrap() {
            match event {
                ClassifyEvent::Classified { .. } => classified += 1,
                ClassifyEvent::Complete(total) => complete = total,
                ClassifyEvent::Started => {},
            }
        }
        (classified, complete)
    }

    #[rstest]
    #[case("output0", true)]
    #[case("output12", true)]
    #[case("output", false)]
    #[case("outputx", false)]
    #[case("output1x", false)]
    #[case("item", false)]
    fn shard_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_shard_name(name), expected);
    }

    #[tokio::test]
    async fn capacity_boundary_rolls_to_next_shard() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_folders(temp_dir.path(), 5).await;
        let allocator = ShardAllocator::new(2);
        let (classified, complete) = drain(temp_dir.path(), &allocator).await;
        assert_eq!(classified, 5);
        assert_eq!(complete, 5);
        // 2 + 2 + 1 folders across three shards.
        for shard in ["output0", "output1", "output2"] {
            assert!(temp_dir.path().join(shard).join("group").exists(), "{shard}");
        }
        assert!(!temp_dir.path().join("output3").exists());
    }

    #[tokio::test]
    async fn rerun_over_classified_tree_is_a_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        seed_folders(temp_dir.path(), 3).await;
        let (classified, _) = drain(temp_dir.path(), &ShardAllocator::new(100)).await;
        assert_eq!(classified, 3);
        let (reclassified, complete) = drain(temp_dir.path(), &ShardAllocator::new(100)).await;
        assert_eq!(reclassified, 0);
        assert_eq!(complete, 0);
        // Prior shard output is untouched.
        for index in 0..3 {
            assert!(temp_dir.path().join(format!("output0/group/item{index:03}")).exists());
        }
    }

    #[tokio::test]
    async fn mixed_terminals_land_in_their_subdirectories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let video = temp_dir.path().join("vid");
        fs::create_dir_all(&video).await.unwrap();
        fs::write(video.join("loop.mp4"), b"v").await.unwrap();
        let single = temp_dir.path().join("single");
        fs::create_dir_all(&single).await.unwrap();
        fs::write(single.join("preview.jpg"), b"p").await.unwrap();
        fs::write(single.join("art.png"), b"a").await.unwrap();
        let group = temp_dir.path().join("grp");
        fs::create_dir_all(&group).await.unwrap();
        for file in ["a.png", "b.png", "c.png"] {
            fs::write(group.join(file), b"g").await.unwrap();
        }

        let (classified, _) = drain(temp_dir.path(), &ShardAllocator::new(100)).await;
        assert_eq!(classified, 3);
        let shard = temp_dir.path().join("output0");
        assert!(shard.join("mp4/vid/loop.mp4").exists());
        assert!(shard.join("selected/single.png").exists());
        assert!(shard.join("group/grp/a.png").exists());
    }
}
