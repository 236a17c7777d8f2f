//! Extractor Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The extractor binary could not be located on this system.
    #[display("extractor binary not found: {_0}")]
    BinaryNotFound(#[error(not(source))] String),
    /// The extractor process could not be started.
    #[display("failed to spawn extractor: {_0}")]
    Spawn(IoError),
    /// The extractor ran but reported failure via its exit status.
    #[display("extractor exited with status {_0:?}")]
    ExitStatus(#[error(not(source))] Option<i32>),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A non-zero exit on the same archive will produce the same non-zero
        // exit; only a failure to start the process at all might be transient.
        matches!(self, Self::Spawn(_))
    }
}
