//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;
use wallshard_extract::error::Error as ExtractionError;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// All of these are item-scoped during the materialize/filter phase: the
/// orchestrator logs them and skips the item. Any error surfacing from the
/// sequential classification phase is fatal to the run, since later shard
/// state depends on earlier steps completing.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The sidecar descriptor exists and parses but carries no usable title.
    #[display("descriptor missing `title` field: {}", _0.display())]
    Descriptor(#[error(not(source))] PathBuf),
    /// The resolved title sanitized down to an empty string, leaving the
    /// item with no destination of its own.
    #[display("item name sanitizes to nothing: {_0:?}")]
    EmptyTitle(#[error(not(source))] String),
    /// The external extractor reported failure for this item's archive.
    #[display("archive extraction failed")]
    Extraction,
    /// Underlying I/O error during copy, move, or delete.
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Convert an extractor error into a pipeline error, preserving the
    /// extract crate's `Exn` frame as a child in its own error tree.
    #[track_caller]
    pub fn extraction(err: ExtractionError) -> Error {
        err.raise(ErrorKind::Extraction)
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
