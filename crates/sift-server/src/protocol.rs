//! Wire protocol: one JSON object per line in each direction.
//!
//! Requests are tagged by `request_type`:
//!
//! ```text
//! {"request_type":"analyze","analysis_type":"ip","log_folder":"logs","start_date":"","end_date":""}
//! {"request_type":"parse","file_path":"logs/app.json","file_type":"json"}
//! ```
//!
//! Every response carries `status` (`success` or `error`) plus either a
//! payload or a `message`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sift_core::{
    AggregationResult, DateRange, FileFailure, FileFormat, GroupBy, GroupSummary, IngestReport,
    LogRecord, ParseOutcome, Result as CoreResult, SiftError, analyze,
};

/// `analysis_type` value that selects every dimension.
pub const ANALYSIS_ALL: &str = "all";

/// A client request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type", rename_all = "lowercase")]
pub enum Request {
    /// Ingest a folder and aggregate it.
    Analyze(AnalyzeRequest),
    /// Parse one file and return its records.
    Parse(ParseRequest),
}

/// Parameters of an `analyze` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// `user`, `ip`/`address`, `level` or `all`
    pub analysis_type: String,
    /// Folder to ingest
    pub log_folder: String,
    /// Inclusive lower bound; empty means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound; empty means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl AnalyzeRequest {
    /// Creates a request over every dimension with no date range.
    #[must_use]
    pub fn new(log_folder: impl Into<String>) -> Self {
        Self {
            analysis_type: ANALYSIS_ALL.to_string(),
            log_folder: log_folder.into(),
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the analysis type.
    #[must_use]
    pub fn with_analysis_type(mut self, analysis_type: impl Into<String>) -> Self {
        self.analysis_type = analysis_type.into();
        self
    }

    /// Sets both date bounds.
    #[must_use]
    pub fn with_date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self.end_date = Some(end.into());
        self
    }

    /// Resolves `analysis_type` into the dimensions to report.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::UnknownDimension`] for an unrecognized type.
    pub fn dimensions(&self) -> CoreResult<Vec<GroupBy>> {
        if self.analysis_type.trim().eq_ignore_ascii_case(ANALYSIS_ALL) {
            return Ok(GroupBy::ALL.to_vec());
        }
        Ok(vec![self.analysis_type.parse()?])
    }

    /// Builds the date filter. Both bounds or neither must be given.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::InvalidDateRange`] if only one bound is set, a
    /// bound fails to parse, or the bounds are inverted.
    pub fn date_range(&self) -> CoreResult<Option<DateRange>> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.filter(|s| !s.trim().is_empty())
        }

        match (present(self.start_date.as_deref()), present(self.end_date.as_deref())) {
            (Some(start), Some(end)) => DateRange::parse(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(SiftError::InvalidDateRange(
                "start_date and end_date must be given together".to_string(),
            )),
        }
    }
}

/// Parameters of a `parse` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    /// File to parse
    pub file_path: String,
    /// Explicit parser name: `json`, `txt` or `xml`
    pub file_type: String,
}

impl ParseRequest {
    /// Creates a parse request.
    #[must_use]
    pub fn new(file_path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            file_type: file_type.into(),
        }
    }

    /// Resolves the explicitly named parser.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::UnsupportedFormat`] for an unknown name.
    pub fn format(&self) -> CoreResult<FileFormat> {
        self.file_type.parse()
    }
}

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request succeeded
    Success,
    /// The request failed; see `message`
    Error,
}

/// A server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome
    pub status: Status,
    /// Error description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Result of an `analyze` request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisPayload>,
    /// Result of a `parse` request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<ParsePayload>,
}

impl Response {
    /// Creates an error response.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            analysis: None,
            parse: None,
        }
    }

    /// Creates a successful `analyze` response.
    #[must_use]
    pub const fn analysis(payload: AnalysisPayload) -> Self {
        Self {
            status: Status::Success,
            message: None,
            analysis: Some(payload),
            parse: None,
        }
    }

    /// Creates a successful `parse` response.
    #[must_use]
    pub const fn parse(payload: ParsePayload) -> Self {
        Self {
            status: Status::Success,
            message: None,
            analysis: None,
            parse: Some(payload),
        }
    }

    /// Returns true for a success response.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Aggregated view of one ingested folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    /// Records kept after date filtering
    pub total_records: usize,
    /// Files parsed without a file-level error
    pub files_processed: usize,
    /// Files that contributed nothing
    pub files_failed: usize,
    /// Why each failed file failed
    #[serde(default)]
    pub failures: Vec<FileFailure>,
    /// One entry per requested dimension
    pub results: Vec<DimensionPayload>,
}

impl AnalysisPayload {
    /// Aggregates an ingestion report over `dimensions`.
    #[must_use]
    pub fn from_report(report: IngestReport, dimensions: &[GroupBy]) -> Self {
        let results = analyze(&report.records, dimensions)
            .into_iter()
            .map(DimensionPayload::from)
            .collect();
        Self {
            total_records: report.total_records(),
            files_processed: report.files_processed,
            files_failed: report.files_failed(),
            failures: report.failures,
            results,
        }
    }
}

/// Groups for one dimension, with totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionPayload {
    /// The dimension
    pub dimension: GroupBy,
    /// Number of distinct keys
    pub unique_groups: usize,
    /// Sum of group counts
    pub total_records: u64,
    /// Key to summary
    pub groups: BTreeMap<String, GroupSummary>,
}

impl From<AggregationResult> for DimensionPayload {
    fn from(result: AggregationResult) -> Self {
        Self {
            dimension: result.dimension,
            unique_groups: result.unique_groups(),
            total_records: result.total_records(),
            groups: result.groups,
        }
    }
}

/// Records parsed from one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsePayload {
    /// The parsed file
    pub file_path: String,
    /// Parser used
    pub file_type: FileFormat,
    /// Records parsed
    pub count: usize,
    /// Records included in `entries`
    pub sent_count: usize,
    /// Records the parser dropped
    pub skipped: usize,
    /// The first `sent_count` records
    pub entries: Vec<LogRecord>,
}

impl ParsePayload {
    /// Builds a payload holding at most `limit` of the parsed records.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        file_type: FileFormat,
        outcome: ParseOutcome,
        limit: usize,
    ) -> Self {
        let count = outcome.records.len();
        let mut entries = outcome.records;
        entries.truncate(limit);
        Self {
            file_path: file_path.into(),
            file_type,
            count,
            sent_count: entries.len(),
            skipped: outcome.skipped,
            entries,
        }
    }
}
