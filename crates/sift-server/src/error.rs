//! Error types for the analysis server.

use std::net::SocketAddr;

use sift_core::SiftError;
use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Errors that can occur in the analysis server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {0}: {1}")]
    BindFailed(SocketAddr, std::io::Error),

    /// Socket I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request line could not be framed (e.g. it was too long).
    #[error("codec error: {0}")]
    Codec(String),

    /// Failed to serialize or deserialize a message.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The ingestion engine rejected the request.
    #[error(transparent)]
    Core(#[from] SiftError),
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<LinesCodecError> for ServerError {
    fn from(err: LinesCodecError) -> Self {
        match err {
            LinesCodecError::Io(e) => Self::Io(e),
            LinesCodecError::MaxLineLengthExceeded => {
                Self::Codec("request line exceeds maximum length".to_string())
            }
        }
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
