//! Query command implementation.
//!
//! Sends an `analyze` request to a running server.

use std::io::Write;

use sift_server::AnalyzeRequest;
use sift_server::protocol::ANALYSIS_ALL;

use crate::cli::{QueryArgs, resolve_dimensions};
use crate::client::AnalysisClient;
use crate::commands::date_range;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the query command.
pub struct QueryCommand<'a> {
    args: &'a QueryArgs,
}

impl<'a> QueryCommand<'a> {
    /// Creates a new query command handler.
    #[must_use]
    pub const fn new(args: &'a QueryArgs) -> Self {
        Self { args }
    }

    /// Builds the wire request from the flags.
    ///
    /// A single dimension is asked for by name; several are asked for as
    /// `all` and narrowed by [`Self::execute`].
    ///
    /// # Errors
    ///
    /// Returns error if a dimension or the date flags are invalid.
    pub fn request(&self) -> Result<AnalyzeRequest, CliError> {
        let dimensions = resolve_dimensions(&self.args.by)?;
        // Validate locally so a bad range never costs a round trip.
        date_range(&self.args.range)?;

        let analysis_type = match dimensions.as_slice() {
            [single] => single.as_str(),
            _ => ANALYSIS_ALL,
        };
        let request = AnalyzeRequest::new(self.args.folder.clone()).with_analysis_type(analysis_type);
        Ok(match (&self.args.range.start, &self.args.range.end) {
            (Some(start), Some(end)) => request.with_date_range(start.clone(), end.clone()),
            _ => request,
        })
    }

    /// Executes the query command.
    ///
    /// # Errors
    ///
    /// Returns error if the server is unreachable or reports an error.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let request = self.request()?;
        let dimensions = resolve_dimensions(&self.args.by)?;
        let mut client = AnalysisClient::connect(&self.args.server).await?;
        let mut analysis = client.analyze(request).await?;
        analysis.results = dimensions
            .iter()
            .filter_map(|d| analysis.results.iter().find(|r| r.dimension == *d).cloned())
            .collect();
        format.write(out, &analysis)
    }
}
