//! RePKG command-line extractor.
//!
//! Invokes the RePKG binary as `RePKG extract <archive> -o <dest> -c
//! --overwrite`. Exit code 0 is success; everything else is an item-level
//! failure for the caller to log and skip. Stdout and stderr are discarded —
//! RePKG's diagnostics are not part of the contract.

use crate::Extractor;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Name of the RePKG binary as found on `$PATH`.
const BINARY_NAME: &str = "RePKG";

/// The RePKG out-of-process extractor.
///
/// # Examples
///
/// ```no_run
/// use wallshard_extract::RePkg;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Explicit binary path from configuration:
/// let repkg = RePkg::new("/opt/repkg/RePKG");
/// // Or discovered on $PATH:
/// let repkg = RePkg::locate()?;
/// # Ok(())
/// # }
/// ```
pub struct RePkg {
    binary: PathBuf,
}

impl RePkg {
    /// Create an extractor using an explicit binary path.
    ///
    /// The path is not checked for existence here; a missing binary
    /// surfaces as a [`Spawn`](ErrorKind::Spawn) error on first use.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    /// Locate the RePKG binary on `$PATH`.
    ///
    /// # Errors
    /// Returns [`BinaryNotFound`](ErrorKind::BinaryNotFound) when no
    /// executable named `RePKG` is on the search path.
    pub fn locate() -> Result<Self> {
        let binary =
            which::which(BINARY_NAME).map_err(|_| ErrorKind::BinaryNotFound(BINARY_NAME.to_string()))?;
        tracing::debug!(binary = %binary.display(), "located extractor binary");
        Ok(Self::new(binary))
    }
}

#[async_trait]
impl Extractor for RePkg {
    fn name(&self) -> &str {
        "repkg"
    }

    async fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let status = Command::new(&self.binary)
            .arg("extract")
            .arg(archive)
            .arg("-o")
            .arg(destination)
            .arg("-c")
            .arg("--overwrite")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(ErrorKind::Spawn)?;
        if !status.success() {
            tracing::warn!(
                archive = %archive.display(),
                code = ?status.code(),
                "extractor reported failure"
            );
            exn::bail!(ErrorKind::ExitStatus(status.code()));
        }
        Ok(())
    }
}
