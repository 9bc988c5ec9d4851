//! Error types for the ingestion engine.
//!
//! Only configuration-level faults ever reach a caller as `Err`. Record-level
//! faults are counted and skipped by the parsers, and file-level faults are
//! turned into [`FileFailure`](crate::ingest::FileFailure) diagnostics by the
//! coordinator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while ingesting or aggregating logs.
#[derive(Debug, Error)]
pub enum SiftError {
    /// A timestamp did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A required field was not provided.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The root folder could not be enumerated.
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        /// Folder that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A log file could not be opened or read.
    #[error("cannot read file {}: {source}", .path.display())]
    FileUnreadable {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A whole document failed to parse (e.g. malformed JSON).
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An explicitly requested file type has no parser.
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The requested grouping dimension is not one of user/address/level.
    #[error("unknown grouping dimension: {0}")]
    UnknownDimension(String),

    /// A date range was malformed or inverted.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// A text dialect name was not recognized.
    #[error("unknown text dialect: {0}")]
    UnknownDialect(String),

    /// A parse worker failed to complete.
    #[error("ingestion task failed: {0}")]
    Task(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SiftError {
    /// Returns true if this error indicates a misconfigured request rather
    /// than imperfect log data.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DirectoryUnreadable { .. }
                | Self::NotADirectory(_)
                | Self::UnsupportedFormat(_)
                | Self::UnknownDimension(_)
                | Self::InvalidDateRange(_)
                | Self::UnknownDialect(_)
        )
    }
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, SiftError>;
