//! CLI error types.

use std::fmt;

use sift_core::SiftError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Server connection failed.
    Connection(String),
    /// Server did not answer in time.
    Timeout(String),
    /// Invalid configuration.
    Config(String),
    /// Command execution failed.
    Command(String),
    /// Output formatting error.
    Format(String),
    /// Invalid argument.
    InvalidArgument(String),
    /// The server answered with an error response.
    Server(String),
    /// The ingestion engine failed.
    Core(SiftError),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "connection error: {msg}"),
            Self::Timeout(msg) => write!(f, "timeout: {msg}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Command(msg) => write!(f, "command error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::Server(msg) => write!(f, "server error: {msg}"),
            Self::Core(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<SiftError> for CliError {
    fn from(err: SiftError) -> Self {
        match err {
            SiftError::UnknownDimension(_)
            | SiftError::UnsupportedFormat(_)
            | SiftError::UnknownDialect(_)
            | SiftError::InvalidDateRange(_) => Self::InvalidArgument(err.to_string()),
            other => Self::Core(other),
        }
    }
}
