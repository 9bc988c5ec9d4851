//! Request handlers for the analysis server.

use std::sync::Arc;

use sift_core::{Ingestor, SiftError, parse_file};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::protocol::{
    AnalysisPayload, AnalyzeRequest, ParsePayload, ParseRequest, Request, Response,
};

/// Turns requests into responses. Shared by every connection.
#[derive(Debug, Clone)]
pub struct AnalysisService {
    config: Arc<ServerConfig>,
    ingestor: Ingestor,
}

impl AnalysisService {
    /// Create a service from the server configuration.
    #[must_use]
    pub fn new(config: Arc<ServerConfig>) -> Self {
        let ingestor = Ingestor::new(config.ingest.clone());
        Self { config, ingestor }
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Decode one request line and handle it. Never fails: decoding and
    /// handling errors become error responses.
    pub async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "Rejected undecodable request");
                Response::error(format!("invalid request: {e}"))
            }
        }
    }

    /// Handle a decoded request.
    pub async fn handle(&self, request: Request) -> Response {
        let result = match request {
            Request::Analyze(req) => self.handle_analyze(req).await,
            Request::Parse(req) => self.handle_parse(req).await,
        };
        result.unwrap_or_else(|e| {
            debug!(error = %e, "Request failed");
            Response::error(e.to_string())
        })
    }

    /// Handle an `analyze` request.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown analysis type, a bad date range or an
    /// unreadable folder.
    pub async fn handle_analyze(&self, request: AnalyzeRequest) -> ServerResult<Response> {
        let dimensions = request.dimensions()?;
        let range = request.date_range()?;
        let folder = self.config.resolve_path(&request.log_folder);

        info!(
            folder = %folder.display(),
            analysis_type = %request.analysis_type,
            ranged = range.is_some(),
            "Analyze request"
        );

        let report = self.ingestor.ingest(&folder, range).await?;
        Ok(Response::analysis(AnalysisPayload::from_report(
            report,
            &dimensions,
        )))
    }

    /// Handle a `parse` request.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported file type or an unreadable or
    /// malformed file.
    pub async fn handle_parse(&self, request: ParseRequest) -> ServerResult<Response> {
        let format = request.format()?;
        let path = self.config.resolve_path(&request.file_path);
        let dialect = self.config.ingest.text_dialect;

        info!(path = %path.display(), %format, "Parse request");

        let outcome = tokio::task::spawn_blocking(move || parse_file(&path, format, dialect))
            .await
            .map_err(|e| ServerError::Core(SiftError::Task(e.to_string())))??;

        Ok(Response::parse(ParsePayload::new(
            request.file_path,
            format,
            outcome,
            self.config.max_entries_per_parse,
        )))
    }
}
