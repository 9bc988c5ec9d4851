//! Analyze command implementation.
//!
//! Ingests a folder in-process and prints grouped statistics.

use std::io::Write;

use sift_core::{IngestConfig, Ingestor};
use sift_server::AnalysisPayload;
use tracing::debug;

use crate::cli::{AnalyzeArgs, resolve_dimensions};
use crate::commands::date_range;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the analyze command.
pub struct AnalyzeCommand<'a> {
    args: &'a AnalyzeArgs,
}

impl<'a> AnalyzeCommand<'a> {
    /// Creates a new analyze command handler.
    #[must_use]
    pub const fn new(args: &'a AnalyzeArgs) -> Self {
        Self { args }
    }

    /// Builds the ingestion configuration from the flags.
    #[must_use]
    pub fn ingest_config(&self) -> IngestConfig {
        let config = IngestConfig::new()
            .with_recursive(!self.args.no_recursive)
            .with_text_dialect(self.args.dialect);
        match self.args.max_concurrency {
            Some(limit) => config.with_max_concurrency(limit),
            None => config,
        }
    }

    /// Executes the analyze command.
    ///
    /// # Errors
    ///
    /// Returns error if the flags are invalid or the folder cannot be read.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let dimensions = resolve_dimensions(&self.args.by)?;
        let range = date_range(&self.args.range)?;
        let config = self.ingest_config();
        debug!(?config, ?dimensions, "Running local analysis");

        let report = Ingestor::new(config).ingest(&self.args.folder, range).await?;
        let analysis = AnalysisPayload::from_report(report, &dimensions);
        format.write(out, &analysis)
    }
}
