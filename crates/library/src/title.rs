//! Canonical title resolution.
//!
//! A source item's canonical title comes from its `project.json` sidecar
//! when one exists: `"{title}_{folder_name}"`. A missing or unparsable
//! descriptor falls back to the raw folder name — workshop items in the
//! wild frequently ship truncated or damaged descriptors and they are
//! still worth processing. A descriptor that parses but carries no usable
//! `title` is an item-level failure. Every result passes through the
//! sanitizer before use.

use crate::consts::DESCRIPTOR_FILE;
use crate::error::{ErrorKind, Result};
use crate::policy::RetentionPolicy;
use crate::sanitize::sanitize_name;
use serde::Deserialize;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize)]
struct Descriptor {
    title: Option<String>,
}

/// Derives the sanitized canonical title for one source item.
///
/// # Errors
/// Returns [`Descriptor`](ErrorKind::Descriptor) when the sidecar parses
/// but has no string `title` field, or [`Io`](ErrorKind::Io) when the
/// sidecar exists but cannot be read.
pub async fn resolve_title(source: &Path, folder_name: &str, policy: RetentionPolicy) -> Result<String> {
    let raw = match descriptor_title(source).await? {
        Some(title) => format!("{title}_{folder_name}"),
        None => folder_name.to_string(),
    };
    Ok(sanitize_name(&raw, policy.name_cap()))
}

async fn descriptor_title(source: &Path) -> Result<Option<String>> {
    let path = source.join(DESCRIPTOR_FILE);
    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ErrorKind::Io(e))?,
    };
    let descriptor: Descriptor = match serde_json::from_slice(&bytes) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unparsable descriptor; using folder name");
            return Ok(None);
        },
    };
    match descriptor.title {
        Some(title) => Ok(Some(title)),
        None => exn::bail!(ErrorKind::Descriptor(path)),
    }
}
