//! Ingestion configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiftError;

/// Which delimited-text layout a text file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDialect {
    /// Pick one dialect per file from its first non-blank line.
    #[default]
    Detect,
    /// `TIMESTAMP | LEVEL | MESSAGE | UserID: <id> | IP: <addr>`
    Pipe,
    /// `user,address,level,timestamp`
    Comma,
}

impl TextDialect {
    /// Returns the string representation of this dialect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::Pipe => "pipe",
            Self::Comma => "comma",
        }
    }
}

impl fmt::Display for TextDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextDialect {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detect" | "auto" => Ok(Self::Detect),
            "pipe" => Ok(Self::Pipe),
            "comma" | "csv" => Ok(Self::Comma),
            other => Err(SiftError::UnknownDialect(other.to_string())),
        }
    }
}

/// Configuration for a folder ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Descend into subdirectories of the root folder.
    pub recursive: bool,
    /// Maximum number of files parsed at once. `None` spawns one task per
    /// file with no bound.
    pub max_concurrency: Option<usize>,
    /// Layout assumed for delimited-text files.
    pub text_dialect: TextDialect,
}

impl IngestConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recursive: true,
            max_concurrency: None,
            text_dialect: TextDialect::Detect,
        }
    }

    /// Sets whether subdirectories are walked.
    #[must_use]
    pub const fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Bounds the number of files parsed concurrently. Zero is treated as one.
    #[must_use]
    pub const fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(if limit == 0 { 1 } else { limit });
        self
    }

    /// Sets the delimited-text dialect.
    #[must_use]
    pub const fn with_text_dialect(mut self, dialect: TextDialect) -> Self {
        self.text_dialect = dialect;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::new()
    }
}
