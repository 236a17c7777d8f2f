use crate::consts::{GROUP_DIR, PRESERVED_STEM, SELECTED_DIR, VIDEO_DIR, VIDEO_EXTENSIONS};
use crate::error::{ErrorKind, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio::fs;

/// The final bucket assigned to a surviving folder. Classification is
/// terminal: folders are never revisited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminal {
    /// The folder contains video media and moved under `mp4` intact.
    Video,
    /// The folder reduced to one file, renamed and moved under `selected`.
    Selected,
    /// Two or more files remain; the folder moved under `group` intact.
    Group,
}

/// Classifies one surviving output folder into `shard_dir`.
///
/// Decision order:
/// 1. any `.mp4`/`.gif` entry → move the whole folder under `mp4`;
/// 2. exactly two entries with one of them `preview`-stemmed → delete the
///    preview, it is redundant once another single file represents the item;
/// 3. exactly one entry left → rename it `<folder-name><ext>`, move it under
///    `selected`, delete the emptied folder;
/// 4. otherwise → move the whole folder under `group`.
///
/// The shard subdirectories are created lazily, on first use.
pub(crate) async fn classify_folder(folder: &Path, name: &OsStr, shard_dir: &Path) -> Result<Terminal> {
    if contains_video(folder).await? {
        move_into(folder, &shard_dir.join(VIDEO_DIR), name).await?;
        return Ok(Terminal::Video);
    }

    let entries = list_entries(folder).await?;
    if entries.len() == 2
        && let Some((preview, _)) = entries.iter().find(|(_, entry_name)| is_preview(entry_name))
    {
        fs::remove_file(preview).await.map_err(ErrorKind::Io)?;
    }

    let remaining = list_entries(folder).await?;
    if let [(path, entry_name)] = remaining.as_slice() {
        let mut target_name = name.to_os_string();
        if let Some(ext) = Path::new(entry_name).extension() {
            target_name.push(".");
            target_name.push(ext);
        }
        move_into(path, &shard_dir.join(SELECTED_DIR), &target_name).await?;
        fs::remove_dir(folder).await.map_err(ErrorKind::Io)?;
        return Ok(Terminal::Selected);
    }

    move_into(folder, &shard_dir.join(GROUP_DIR), name).await?;
    Ok(Terminal::Group)
}

async fn contains_video(folder: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(folder).await.map_err(ErrorKind::Io)?;
    while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
        let name = entry.file_name();
        let ext = Path::new(&name).extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_preview(name: &OsStr) -> bool {
    Path::new(name)
        .file_stem()
        .is_some_and(|stem| stem.to_string_lossy().to_lowercase() == PRESERVED_STEM)
}

async fn list_entries(folder: &Path) -> Result<Vec<(PathBuf, OsString)>> {
    let mut listed = Vec::new();
    let mut entries = fs::read_dir(folder).await.map_err(ErrorKind::Io)?;
    while let Some(entry) = entries.next_entry().await.map_err(ErrorKind::Io)? {
        listed.push((entry.path(), entry.file_name()));
    }
    Ok(listed)
}

/// Create `dest_root` if needed and move `source` under it as `name`.
async fn move_into(source: &Path, dest_root: &Path, name: &OsStr) -> Result<()> {
    fs::create_dir_all(dest_root).await.map_err(ErrorKind::Io)?;
    fs::rename(source, dest_root.join(name)).await.map_err(ErrorKind::Io)?;
    Ok(())
}
