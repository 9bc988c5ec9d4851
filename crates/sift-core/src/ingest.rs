//! Parallel ingestion coordinator.
//!
//! One blocking task per discovered file parses and date-filters its own
//! records, then appends them to a shared [`MergeState`] under a single
//! mutex. That append is the only critical section; parsing and filtering
//! happen outside it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{IngestConfig, TextDialect};
use crate::error::{Result, SiftError};
use crate::parse::{FileFormat, parse_file};
use crate::types::{DateRange, LogRecord};
use crate::walk::discover_files;

/// A file that contributed no records because it could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    /// The failing file
    pub path: PathBuf,
    /// Human-readable cause
    pub reason: String,
}

/// Merged records from one ingestion run, plus counters.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Records that parsed and fell inside the date range, in no particular order
    pub records: Vec<LogRecord>,
    /// Files found by the walker
    pub files_discovered: usize,
    /// Files parsed without a file-level error
    pub files_processed: usize,
    /// Records parsed before date filtering
    pub records_parsed: usize,
    /// Records dropped by the parsers (bad timestamp, missing field)
    pub records_skipped: usize,
    /// Records outside the date range
    pub records_filtered: usize,
    /// Per-file diagnostics, sorted by path
    pub failures: Vec<FileFailure>,
}

impl IngestReport {
    /// Number of files that contributed nothing due to an error.
    #[must_use]
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of records kept.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Default)]
struct MergeState {
    records: Vec<LogRecord>,
    files_processed: usize,
    records_parsed: usize,
    records_skipped: usize,
    records_filtered: usize,
    failures: Vec<FileFailure>,
    settled: HashSet<PathBuf>,
}

/// Fans ingestion of a folder out over the blocking thread pool.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    config: Arc<IngestConfig>,
}

impl Ingestor {
    /// Creates an ingestor with the given configuration.
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingests every file under `root`, keeping records inside `range`.
    ///
    /// A file that fails to open or parse becomes a [`FileFailure`] and does
    /// not fail the run. The run completes only after every file task has
    /// finished.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` cannot be enumerated.
    pub async fn ingest(&self, root: &Path, range: Option<DateRange>) -> Result<IngestReport> {
        let started = Instant::now();

        let walk_root = root.to_path_buf();
        let recursive = self.config.recursive;
        let files = tokio::task::spawn_blocking(move || discover_files(&walk_root, recursive))
            .await
            .map_err(|e| SiftError::Task(e.to_string()))??;

        let state = Arc::new(Mutex::new(MergeState::default()));
        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let dialect = self.config.text_dialect;

        let mut tasks = JoinSet::new();
        for path in files.iter().cloned() {
            let permit = match &limiter {
                Some(semaphore) => Some(
                    Arc::clone(semaphore)
                        .acquire_owned()
                        .await
                        .map_err(|e| SiftError::Task(e.to_string()))?,
                ),
                None => None,
            };
            let state = Arc::clone(&state);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                ingest_one(&path, dialect, range, &state);
            });
        }

        let mut join_errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                join_errors.push(e.to_string());
            }
        }

        let mut merged = std::mem::take(&mut *state.lock());
        if !join_errors.is_empty() {
            let reason = join_errors.join("; ");
            for path in files.iter().filter(|p| !merged.settled.contains(*p)) {
                warn!(path = %path.display(), error = %reason, "file task did not complete");
                merged.failures.push(FileFailure {
                    path: path.clone(),
                    reason: SiftError::Task(reason.clone()).to_string(),
                });
            }
        }
        merged.failures.sort_by(|a, b| a.path.cmp(&b.path));

        let report = IngestReport {
            records: merged.records,
            files_discovered: files.len(),
            files_processed: merged.files_processed,
            records_parsed: merged.records_parsed,
            records_skipped: merged.records_skipped,
            records_filtered: merged.records_filtered,
            failures: merged.failures,
        };

        info!(
            root = %root.display(),
            files_discovered = report.files_discovered,
            files_processed = report.files_processed,
            files_failed = report.files_failed(),
            records_kept = report.total_records(),
            records_skipped = report.records_skipped,
            records_filtered = report.records_filtered,
            elapsed_ms = started.elapsed().as_millis(),
            "ingestion complete"
        );

        Ok(report)
    }
}

fn ingest_one(
    path: &Path,
    dialect: TextDialect,
    range: Option<DateRange>,
    state: &Mutex<MergeState>,
) {
    let format = FileFormat::from_path(path);
    match parse_file(path, format, dialect) {
        Ok(outcome) => {
            let parsed = outcome.records.len();
            let kept: Vec<LogRecord> = match range {
                Some(range) => outcome
                    .records
                    .into_iter()
                    .filter(|r| range.contains(r.timestamp))
                    .collect(),
                None => outcome.records,
            };
            let filtered = parsed - kept.len();

            debug!(
                path = %path.display(),
                %format,
                parsed,
                skipped = outcome.skipped,
                filtered,
                "parsed file"
            );

            let mut merged = state.lock();
            merged.records.extend(kept);
            merged.files_processed += 1;
            merged.records_parsed += parsed;
            merged.records_skipped += outcome.skipped;
            merged.records_filtered += filtered;
            merged.settled.insert(path.to_path_buf());
        }
        Err(e) => {
            warn!(path = %path.display(), %format, error = %e, "failed to parse file");
            let mut merged = state.lock();
            merged.failures.push(FileFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            merged.settled.insert(path.to_path_buf());
        }
    }
}
