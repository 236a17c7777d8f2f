//! Source item materialization.
//!
//! Produces the working copy of one source item inside its destination
//! folder. Items carrying a packed scene archive are delegated to the
//! injected [`Extractor`](wallshard_extract::Extractor); everything else is
//! copied verbatim, merging into any content already at the destination.

use crate::consts::ARCHIVE_FILE;
use crate::error::{ErrorKind, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use wallshard_extract::ExtractorHandle;

/// Populates `destination` with the contents of one source item.
///
/// When `source` contains the archive marker file, the archive is handed to
/// the extractor (overwrite + flatten semantics); otherwise the whole source
/// tree is copied recursively. The caller is expected to have created
/// `destination` already.
///
/// # Errors
/// Returns [`Extraction`](ErrorKind::Extraction) when the external
/// extractor reports failure, or [`Io`](ErrorKind::Io) for any filesystem
/// failure during the copy. Both are item-scoped: the orchestrator logs and
/// skips, never aborts the run.
pub async fn materialize(extractor: &ExtractorHandle, source: &Path, destination: &Path) -> Result<()> {
    let archive = source.join(ARCHIVE_FILE);
    if fs::try_exists(&archive).await.map_err(ErrorKind::Io)? {
        return extractor.extract(&archive, destination).await.map_err(ErrorKind::extraction);
    }
    copy_tree(source, destination).await
}

/// Recursively copies `source` into `destination`, merging with existing
/// content rather than failing on overlap.
async fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    // Iterative walk; recursing in an async fn would need boxed futures.
    let mut stack: Vec<(PathBuf, PathBuf)> = vec![(source.to_path_buf(), destination.to_path_buf())];
    while let Some((from, to)) = stack.pop() {
        fs::create_dir_all(&to).await.map_err(ErrorKind::Io)?;
        let mut entries = fs::read_dir(&from).await.map_err(ErrorKind::Io)?;
        while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
            let target = to.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(ErrorKind::Io)?;
            if file_type.is_dir() {
                stack.push((entry.path(), target));
            } else if file_type.is_file() {
                fs::copy(entry.path(), &target).await.map_err(ErrorKind::Io)?;
            }
            // Note: silently drop what is most likely a broken symlink.
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wallshard_extract::MockExtractor;

    #[tokio::test]
    async fn archive_marker_routes_to_extractor() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        fs::write(source.path().join(ARCHIVE_FILE), b"pkg").await.unwrap();
        let mock = Arc::new(MockExtractor::with_payload([("wall.png", b"png".as_slice())]));
        let handle: ExtractorHandle = mock.clone();
        materialize(&handle, source.path(), destination.path()).await.unwrap();
        assert!(destination.path().join("wall.png").exists());
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, source.path().join(ARCHIVE_FILE));
    }

    #[tokio::test]
    async fn extractor_failure_is_item_scoped_error() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        fs::write(source.path().join(ARCHIVE_FILE), b"pkg").await.unwrap();
        let handle: ExtractorHandle = Arc::new(MockExtractor::failing(1));
        let err = materialize(&handle, source.path(), destination.path()).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Extraction));
    }

    #[tokio::test]
    async fn plain_folder_is_copied_recursively() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        fs::create_dir_all(source.path().join("materials/deep")).await.unwrap();
        fs::write(source.path().join("top.png"), b"a").await.unwrap();
        fs::write(source.path().join("materials/deep/leaf.jpg"), b"b").await.unwrap();
        let mock = Arc::new(MockExtractor::default());
        let handle: ExtractorHandle = mock.clone();
        materialize(&handle, source.path(), destination.path()).await.unwrap();
        assert!(destination.path().join("top.png").exists());
        assert!(destination.path().join("materials/deep/leaf.jpg").exists());
        // No archive marker means the extractor is never consulted.
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn copy_merges_into_existing_content() {
        let source = tempfile::tempdir().unwrap();
        let destination = tempfile::tempdir().unwrap();
        fs::write(source.path().join("new.png"), b"new").await.unwrap();
        fs::write(destination.path().join("old.png"), b"old").await.unwrap();
        let handle: ExtractorHandle = Arc::new(MockExtractor::default());
        materialize(&handle, source.path(), destination.path()).await.unwrap();
        assert!(destination.path().join("new.png").exists());
        assert!(destination.path().join("old.png").exists());
    }
}
