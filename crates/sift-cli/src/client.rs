//! TCP client for a running logsift server.
//!
//! # Example
//!
//! ```rust,no_run
//! use sift_cli::client::AnalysisClient;
//! use sift_server::AnalyzeRequest;
//!
//! # async fn example() -> Result<(), sift_cli::CliError> {
//! let mut client = AnalysisClient::connect("127.0.0.1:54000").await?;
//! let analysis = client.analyze(AnalyzeRequest::new("logs")).await?;
//! println!("Records: {}", analysis.total_records);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use sift_server::{AnalysisPayload, AnalyzeRequest, ParsePayload, ParseRequest, Request, Response};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, trace};

use crate::error::CliError;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request timeout. Large folders take a while to ingest.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Line-oriented JSON client.
#[derive(Debug)]
pub struct AnalysisClient {
    lines: Framed<TcpStream, LinesCodec>,
    request_timeout: Duration,
}

impl AnalysisClient {
    /// Connect to the server at `addr` (`host:port`).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or times out.
    pub async fn connect(addr: &str) -> Result<Self, CliError> {
        Self::connect_with_timeout(addr, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or times out.
    pub async fn connect_with_timeout(
        addr: &str,
        connect_timeout: Duration,
    ) -> Result<Self, CliError> {
        if addr.trim().is_empty() {
            return Err(CliError::Config("server address is empty".into()));
        }

        debug!(addr = %addr, "Connecting to server");
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| CliError::Timeout(format!("connecting to {addr}")))?
            .map_err(|e| CliError::Connection(format!("{addr}: {e}")))?;

        Ok(Self {
            lines: Framed::new(stream, LinesCodec::new()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Send one request and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns an error if sending fails, the server disconnects, or the
    /// response cannot be decoded.
    pub async fn send_request(&mut self, request: &Request) -> Result<Response, CliError> {
        let text = serde_json::to_string(request)
            .map_err(|e| CliError::Format(format!("failed to encode request: {e}")))?;
        trace!(request = %text, "Sending request");

        self.lines
            .send(text)
            .await
            .map_err(|e| CliError::Connection(e.to_string()))?;

        let line = timeout(self.request_timeout, self.lines.next())
            .await
            .map_err(|_| CliError::Timeout("waiting for response".into()))?
            .ok_or_else(|| CliError::Connection("server closed the connection".into()))?
            .map_err(|e| CliError::Connection(e.to_string()))?;

        serde_json::from_str(&line)
            .map_err(|e| CliError::Format(format!("invalid response: {e}")))
    }

    /// Run an `analyze` request.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Server`] if the server reports an error.
    pub async fn analyze(&mut self, request: AnalyzeRequest) -> Result<AnalysisPayload, CliError> {
        let response = self.send_request(&Request::Analyze(request)).await?;
        into_success(response)?
            .analysis
            .ok_or_else(|| CliError::Command("response has no analysis payload".into()))
    }

    /// Run a `parse` request.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Server`] if the server reports an error.
    pub async fn parse(&mut self, request: ParseRequest) -> Result<ParsePayload, CliError> {
        let response = self.send_request(&Request::Parse(request)).await?;
        into_success(response)?
            .parse
            .ok_or_else(|| CliError::Command("response has no parse payload".into()))
    }
}

fn into_success(response: Response) -> Result<Response, CliError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(CliError::Server(
            response.message.unwrap_or_else(|| "unspecified error".into()),
        ))
    }
}
