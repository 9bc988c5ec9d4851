//! TCP accept loop and per-connection request processing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handlers::AnalysisService;
use crate::protocol::Response;

type LineStream = Framed<TcpStream, LinesCodec>;

/// Analysis server bound to a listening socket.
#[derive(Debug)]
pub struct AnalysisServer {
    listener: TcpListener,
    service: AnalysisService,
    connections: Arc<Semaphore>,
    config: Arc<ServerConfig>,
}

impl AnalysisServer {
    /// Bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::BindFailed`] if the address cannot be bound.
    pub async fn bind(config: ServerConfig) -> ServerResult<Self> {
        let addr = config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(addr, e))?;

        let config = Arc::new(config);
        Ok(Self {
            listener,
            service: AnalysisService::new(Arc::clone(&config)),
            connections: Arc::new(Semaphore::new(config.max_connections)),
            config,
        })
    }

    /// Get the address actually bound, useful after binding port 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve connections until the process is stopped.
    ///
    /// # Errors
    ///
    /// Currently never returns an error; accept failures are logged.
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve connections until `shutdown` completes. Connections already
    /// being served run to completion on their own tasks.
    ///
    /// # Errors
    ///
    /// Currently never returns an error; accept failures are logged.
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!(addr = %addr, "Analysis server listening");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => self.handle_connection(stream, peer_addr),
                        Err(e) => warn!(error = %e, "Failed to accept connection"),
                    }
                }
                () = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Analysis server shutting down");
        Ok(())
    }

    /// Spawn a task for a new connection, or reject it if at capacity.
    fn handle_connection(&self, stream: TcpStream, peer_addr: SocketAddr) {
        let span = info_span!("connection", id = %Uuid::new_v4(), peer = %peer_addr);
        let max_request_bytes = self.config.max_request_bytes;

        let Ok(permit) = Arc::clone(&self.connections).try_acquire_owned() else {
            warn!(
                peer = %peer_addr,
                max = self.config.max_connections,
                "Connection rejected: max connections reached"
            );
            tokio::spawn(
                async move {
                    let mut lines = Framed::new(stream, LinesCodec::new());
                    let response = Response::error("server busy: too many connections");
                    if let Err(e) = send(&mut lines, &response).await {
                        debug!(error = %e, "Failed to send rejection");
                    }
                }
                .instrument(span),
            );
            return;
        };

        let service = self.service.clone();
        tokio::spawn(
            async move {
                let _permit = permit;
                debug!("Connection opened");
                match serve_connection(stream, &service, max_request_bytes).await {
                    Ok(()) => debug!("Connection closed normally"),
                    Err(e) => debug!(error = %e, "Connection ended with error"),
                }
            }
            .instrument(span),
        );
    }
}

/// Answer each request line on `stream` until the client disconnects.
async fn serve_connection(
    stream: TcpStream,
    service: &AnalysisService,
    max_request_bytes: usize,
) -> ServerResult<()> {
    let mut lines = Framed::new(stream, LinesCodec::new_with_max_length(max_request_bytes));

    while let Some(frame) = lines.next().await {
        let line = match frame {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                let response =
                    Response::error(format!("request exceeds {max_request_bytes} bytes"));
                send(&mut lines, &response).await?;
                return Err(LinesCodecError::MaxLineLengthExceeded.into());
            }
            Err(e) => return Err(e.into()),
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = service.handle_line(&line).await;
        send(&mut lines, &response).await?;
    }

    Ok(())
}

async fn send(lines: &mut LineStream, response: &Response) -> ServerResult<()> {
    let text = serde_json::to_string(response)?;
    lines.send(text).await?;
    Ok(())
}
