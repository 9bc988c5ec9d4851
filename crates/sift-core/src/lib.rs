//! # sift-core
//!
//! Multi-format log ingestion and aggregation engine.
//!
//! This crate provides:
//!
//! - [`LogRecord`] — The normalized record every parser produces
//! - [`DelimitedParser`], [`JsonParser`], [`TagScanParser`] — Format parsers
//! - [`FileFormat`] — Extension-based file classification
//! - [`discover_files`] — Directory walking
//! - [`Ingestor`] — Concurrent, per-file ingestion of a folder
//! - [`aggregate`] / [`analyze`] — Grouped counts and response-time statistics
//!
//! ## Example
//!
//! ```rust
//! use sift_core::{GroupBy, JsonParser, LogParser, aggregate};
//!
//! let doc = r#"[
//!     {"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":5,"response_time":100},
//!     {"timestamp":"2024-01-01 10:05:00","ip_address":"1.1.1.1","username":"bob","response_time":50}
//! ]"#;
//!
//! let outcome = JsonParser.parse(doc).unwrap();
//! let by_address = aggregate(&outcome.records, GroupBy::Address);
//!
//! let group = &by_address.groups["1.1.1.1"];
//! assert_eq!(group.count, 2);
//! assert_eq!(group.response_time_stats.unwrap().median, 75.0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod parse;
pub mod stats;
pub mod timestamp;
pub mod types;
pub mod walk;

// Re-export main types
pub use aggregate::{AggregationResult, GroupBy, GroupSummary, aggregate, analyze};
pub use config::{IngestConfig, TextDialect};
pub use error::{Result, SiftError};
pub use ingest::{FileFailure, IngestReport, Ingestor};
pub use parse::{
    DelimitedParser, FileFormat, JsonParser, LogParser, ParseOutcome, TagScanParser, parse_file,
    parse_text,
};
pub use stats::ResponseTimeStats;
pub use timestamp::{format_timestamp, parse_timestamp};
pub use types::{DateRange, LogRecord, LogRecordBuilder};
pub use walk::discover_files;
