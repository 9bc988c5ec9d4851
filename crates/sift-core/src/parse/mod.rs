//! Format parsers and file classification.
//!
//! This module provides:
//! - [`LogParser`] — Text in, normalized records out
//! - [`DelimitedParser`], [`JsonParser`], [`TagScanParser`] — The three formats
//! - [`FileFormat`] — Extension-based classification
//! - [`parse_file`] — Read one file and dispatch to its parser

mod delimited;
mod json;
mod tagscan;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TextDialect;
use crate::error::{Result, SiftError};
use crate::types::LogRecord;

pub use delimited::DelimitedParser;
pub use json::JsonParser;
pub use tagscan::TagScanParser;

/// Records produced from one document, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    /// Records that parsed cleanly, in document order
    pub records: Vec<LogRecord>,
    /// Records skipped for a bad timestamp or missing required field
    pub skipped: usize,
}

impl ParseOutcome {
    fn push(&mut self, record: Option<LogRecord>) {
        match record {
            Some(r) => self.records.push(r),
            None => self.skipped += 1,
        }
    }
}

/// A parser for one log file format.
///
/// Malformed records are skipped and counted; only a document that cannot be
/// read as a whole yields an error.
pub trait LogParser: Send + Sync {
    /// Parses a complete document.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::MalformedDocument`] if the document as a whole
    /// is unparseable.
    fn parse(&self, input: &str) -> Result<ParseOutcome>;
}

/// Supported on-disk log formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Pipe- or comma-delimited text, one record per line
    Delimited,
    /// JSON array, `{"logs": [...]}` wrapper, or single object
    Json,
    /// `<log>...</log>` blocks
    TagScan,
}

impl FileFormat {
    /// Classifies a file by its extension: `.json` and `.xml` select their
    /// parsers, everything else (including no extension) is delimited text.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Self::Json,
            Some("xml") => Self::TagScan,
            _ => Self::Delimited,
        }
    }

    /// Returns the string representation of this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Delimited => "txt",
            Self::Json => "json",
            Self::TagScan => "xml",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an explicitly named file type. Unlike [`FileFormat::from_path`],
/// unknown names are an error rather than a fallback.
impl FromStr for FileFormat {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" | "text" | "log" | "csv" => Ok(Self::Delimited),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::TagScan),
            other => Err(SiftError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parses text already loaded in memory with the parser for `format`.
///
/// # Errors
///
/// Returns an error if the document as a whole is unparseable.
pub fn parse_text(input: &str, format: FileFormat, dialect: TextDialect) -> Result<ParseOutcome> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    match format {
        FileFormat::Delimited => DelimitedParser::new(dialect).parse(input),
        FileFormat::Json => JsonParser.parse(input),
        FileFormat::TagScan => TagScanParser.parse(input),
    }
}

/// Reads one file and parses it with the parser for `format`.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
///
/// # Errors
///
/// Returns [`SiftError::FileUnreadable`] if the file cannot be read, or
/// [`SiftError::MalformedDocument`] if its contents are unparseable.
pub fn parse_file(path: &Path, format: FileFormat, dialect: TextDialect) -> Result<ParseOutcome> {
    let bytes = fs::read(path).map_err(|source| SiftError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    parse_text(&text, format, dialect)
}
