//! Delimited-text parser.
//!
//! Two line layouts are supported, one per file:
//!
//! ```text
//! 2024-01-01 10:00:00 | ERROR | disk full | UserID: 42 | IP: 10.0.0.7
//! alice,10.0.0.7,ERROR,2024-01-01 10:00:00
//! ```

use crate::config::TextDialect;
use crate::error::Result;
use crate::parse::{LogParser, ParseOutcome};
use crate::timestamp::parse_timestamp;
use crate::types::LogRecord;

const USER_LABEL: &str = "UserID:";
const ADDRESS_LABEL: &str = "IP:";
const PIPE_MIN_FIELDS: usize = 5;
const COMMA_FIELDS: usize = 4;

/// Parser for pipe- and comma-delimited text logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedParser {
    dialect: TextDialect,
}

impl DelimitedParser {
    /// Creates a parser for the given dialect.
    #[must_use]
    pub const fn new(dialect: TextDialect) -> Self {
        Self { dialect }
    }

    /// Resolves [`TextDialect::Detect`] against a document: a `|` on the
    /// first non-blank line selects the pipe layout, anything else comma.
    #[must_use]
    pub fn resolve_dialect(&self, input: &str) -> TextDialect {
        match self.dialect {
            TextDialect::Detect => {
                let first = input.lines().find(|line| !line.trim().is_empty());
                match first {
                    Some(line) if line.contains('|') => TextDialect::Pipe,
                    _ => TextDialect::Comma,
                }
            }
            fixed => fixed,
        }
    }

    /// Parses one pipe-delimited line.
    fn parse_pipe_line(line: &str) -> Option<LogRecord> {
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < PIPE_MIN_FIELDS {
            return None;
        }

        let timestamp = parse_timestamp(parts[0]).ok()?;
        let mut builder = LogRecord::builder()
            .timestamp(timestamp)
            .level(parts[1])
            .message(parts[2]);

        if let Some(id) = labeled_value(parts[3], USER_LABEL) {
            builder = builder.user_id(id);
        }
        if let Some(address) = labeled_value(parts[4], ADDRESS_LABEL) {
            builder = builder.address(address);
        }

        builder.build().ok()
    }

    /// Parses one comma-delimited line.
    fn parse_comma_line(line: &str) -> Option<LogRecord> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() != COMMA_FIELDS {
            return None;
        }

        let timestamp = parse_timestamp(parts[3]).ok()?;
        LogRecord::builder()
            .timestamp(timestamp)
            .user(parts[0])
            .address(parts[1])
            .level(parts[2])
            .build()
            .ok()
    }
}

/// Returns the trimmed text after `label`, if the label is present and
/// followed by something.
fn labeled_value<'a>(field: &'a str, label: &str) -> Option<&'a str> {
    let start = field.find(label)? + label.len();
    let value = field[start..].trim();
    (!value.is_empty()).then_some(value)
}

impl LogParser for DelimitedParser {
    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let parse_line: fn(&str) -> Option<LogRecord> = match self.resolve_dialect(input) {
            TextDialect::Comma => Self::parse_comma_line,
            _ => Self::parse_pipe_line,
        };

        let mut outcome = ParseOutcome::default();
        for line in input.lines().filter(|l| !l.trim().is_empty()) {
            outcome.push(parse_line(line));
        }
        Ok(outcome)
    }
}
