//! Server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use sift_core::IngestConfig;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 54000;

/// Default maximum concurrent connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 256;

/// Default maximum request line length: 64KB.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Default cap on entries returned by one `parse` request.
pub const DEFAULT_MAX_ENTRIES_PER_PARSE: usize = 1000;

/// Configuration for the analysis server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,
    /// Connections beyond this are answered with an error and closed.
    pub max_connections: usize,
    /// Longest accepted request line, in bytes.
    pub max_request_bytes: usize,
    /// Entries returned by a `parse` request are truncated to this many.
    pub max_entries_per_parse: usize,
    /// Relative request paths are resolved against this folder.
    pub log_root: Option<PathBuf>,
    /// Settings for folder ingestion.
    pub ingest: IngestConfig,
}

impl ServerConfig {
    /// Create a new server configuration with the specified bind address.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            max_entries_per_parse: DEFAULT_MAX_ENTRIES_PER_PARSE,
            log_root: None,
            ingest: IngestConfig::new(),
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the maximum request line length.
    #[must_use]
    pub const fn with_max_request_bytes(mut self, max: usize) -> Self {
        self.max_request_bytes = max;
        self
    }

    /// Set the cap on entries returned by a `parse` request.
    #[must_use]
    pub const fn with_max_entries_per_parse(mut self, max: usize) -> Self {
        self.max_entries_per_parse = max;
        self
    }

    /// Set the folder relative request paths resolve against.
    #[must_use]
    pub fn with_log_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.log_root = Some(root.into());
        self
    }

    /// Set the ingestion configuration.
    #[must_use]
    pub const fn with_ingest(mut self, ingest: IngestConfig) -> Self {
        self.ingest = ingest;
        self
    }

    /// Resolves a path from a request against [`Self::log_root`].
    #[must_use]
    pub fn resolve_path(&self, requested: &str) -> PathBuf {
        let path = Path::new(requested);
        match &self.log_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(([0, 0, 0, 0], DEFAULT_PORT).into())
    }
}
