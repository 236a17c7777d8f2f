//! In-process extractor for testing.

use crate::Extractor;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

/// An [`Extractor`] that writes a fixed payload instead of invoking any
/// external binary.
///
/// Each `extract` call recreates the configured payload files (relative
/// paths, joined onto the destination) and records the invocation. A mock
/// constructed with [`failing`](MockExtractor::failing) reports a non-zero
/// exit status instead, for exercising item-level skip behaviour.
///
/// # Examples
///
/// ```
/// use wallshard_extract::{Extractor, MockExtractor};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp_dir = tempfile::tempdir()?;
/// let mock = MockExtractor::with_payload([
///     ("materials/wall.png", b"png bytes".as_slice()),
/// ]);
/// mock.extract(Path::new("scene.pkg"), temp_dir.path()).await?;
/// assert!(temp_dir.path().join("materials/wall.png").exists());
/// assert_eq!(mock.calls().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockExtractor {
    payload: Vec<(PathBuf, Vec<u8>)>,
    fail_with: Option<i32>,
    calls: Mutex<Vec<(PathBuf, PathBuf)>>,
}

impl MockExtractor {
    /// Create a mock that "extracts" the given relative-path payload files.
    pub fn with_payload(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            payload: files.into_iter().map(|(path, data)| (path.into(), data.into())).collect(),
            ..Self::default()
        }
    }

    /// Create a mock that always reports the given non-zero exit code.
    pub fn failing(code: i32) -> Self {
        Self { fail_with: Some(code), ..Self::default() }
    }

    /// Every `(archive, destination)` pair this mock has been asked to
    /// extract, in call order.
    pub fn calls(&self) -> Vec<(PathBuf, PathBuf)> {
        // The panic here is DELIBERATE. MockExtractor is intended to be used
        // in tests; a poisoned lock means a test already failed.
        self.calls.lock().expect("mock call log poisoned").clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push((archive.to_path_buf(), destination.to_path_buf()));
        if let Some(code) = self.fail_with {
            exn::bail!(ErrorKind::ExitStatus(Some(code)));
        }
        for (relative, data) in &self.payload {
            let target = destination.join(relative);
            if let Some(parent) = target.parent() {
                // Payload I/O failures panic rather than masquerade as an
                // extractor error kind; the mock only ever runs in tests.
                fs::create_dir_all(parent).await.expect("mock payload directory");
            }
            fs::write(&target, data).await.expect("mock payload write");
        }
        Ok(())
    }
}
