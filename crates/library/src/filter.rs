//! Media retention filtering.
//!
//! Walks a materialized output folder bottom-up, keeps only media files
//! that pass the [`RetentionPolicy`], deletes everything else, prunes
//! now-empty subdirectories, and reports whether the folder survived at
//! all. Retained files are relocated into the folder root so the
//! classification pass only ever has to look at one level.

use crate::consts::PRESERVED_STEM;
use crate::error::{ErrorKind, Result};
use crate::policy::RetentionPolicy;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Whether an output folder survived filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FolderFate {
    /// At least one file remained; the folder is handed to classification.
    Survived,
    /// Every file was deleted and the folder itself has been removed.
    Removed,
}

/// Applies the retention policy to every file under `root`, bottom-up.
///
/// Directory listings are snapshotted on the way down and processed
/// deepest-first, so a directory's emptiness is decided after its own files
/// (and all its children) have been handled. Files relocated into the root
/// during the walk are not re-examined. Empty directories are pruned; if
/// the root itself ends up empty it is deleted and
/// [`FolderFate::Removed`] is returned.
///
/// # Errors
/// Any filesystem failure is returned as [`Io`](ErrorKind::Io); the caller
/// treats it as item-scoped.
pub async fn filter_media(root: &Path, policy: RetentionPolicy) -> Result<FolderFate> {
    let mut dirs: Vec<(PathBuf, Vec<(PathBuf, OsString)>)> = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(ErrorKind::Io)?;
        while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
            if entry.file_type().await.map_err(ErrorKind::Io)?.is_dir() {
                stack.push(entry.path());
            } else {
                files.push((entry.path(), entry.file_name()));
            }
        }
        dirs.push((dir, files));
    }

    // Every directory was recorded before its children, so the reverse
    // order is children-before-parents.
    for (dir, files) in dirs.iter().rev() {
        for (path, name) in files {
            apply_retention(root, path, name, policy).await?;
        }
        if dir != root && is_empty(dir).await? {
            fs::remove_dir(dir).await.map_err(ErrorKind::Io)?;
        }
    }

    if is_empty(root).await? {
        fs::remove_dir(root).await.map_err(ErrorKind::Io)?;
        return Ok(FolderFate::Removed);
    }
    Ok(FolderFate::Survived)
}

/// Keep, relocate, or delete a single file according to the policy.
async fn apply_retention(root: &Path, path: &Path, name: &OsString, policy: RetentionPolicy) -> Result<()> {
    let name_str = name.to_string_lossy();
    let stem = Path::new(name).file_stem().map(|s| s.to_string_lossy().to_lowercase()).unwrap_or_default();
    let ext = Path::new(name).extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();

    // Reserved for the classification pass: never deleted, never relocated.
    if policy.preserves_preview() && stem == PRESERVED_STEM {
        return Ok(());
    }
    if !policy.is_media(&ext) || policy.excludes(&name_str) {
        fs::remove_file(path).await.map_err(ErrorKind::Io)?;
        return Ok(());
    }
    let size = fs::metadata(path).await.map_err(ErrorKind::Io)?.len();
    if size > policy.min_size_bytes() {
        // Relocation overwrites any same-named file already at the root.
        fs::rename(path, root.join(name)).await.map_err(ErrorKind::Io)?;
    } else {
        fs::remove_file(path).await.map_err(ErrorKind::Io)?;
    }
    Ok(())
}

async fn is_empty(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).await.map_err(ErrorKind::Io)?;
    Ok(entries.next_entry().await.map_err(ErrorKind::Io)?.is_none())
}
