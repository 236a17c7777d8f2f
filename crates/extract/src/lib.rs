//! Out-of-process archive extraction.
//!
//! The pipeline treats "extract this archive into that directory" as an
//! opaque capability with a success/failure outcome. This crate defines the
//! [`Extractor`] trait for that capability, a [`RePkg`] implementation that
//! shells out to the RePKG binary, and (behind the `mock` feature) a
//! [`MockExtractor`] so the filtering and classification core can be tested
//! without any real external binary installed.

pub mod error;
#[cfg(feature = "mock")]
mod mock;
mod repkg;

#[cfg(feature = "mock")]
pub use crate::mock::MockExtractor;
pub use crate::repkg::RePkg;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub type ExtractorHandle = Arc<dyn Extractor + Send + Sync>;

/// An injected capability that unpacks one archive into one directory.
///
/// Implementations must overwrite files already present at the destination
/// and flatten any container directories the archive format nests its
/// entries under. Diagnostic output from the underlying tool is discarded;
/// callers only ever observe success or an [`error::ErrorKind`].
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the extractor implementation (used for logging only).
    fn name(&self) -> &str;

    /// Extract `archive` into `destination`.
    ///
    /// # Errors
    /// Returns [`ExitStatus`](error::ErrorKind::ExitStatus) when the
    /// underlying tool runs but reports failure, or
    /// [`Spawn`](error::ErrorKind::Spawn) when it could not be started
    /// at all.
    async fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;
}
