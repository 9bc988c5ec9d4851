//! Logsift analysis server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sift_core::{IngestConfig, TextDialect};
use sift_server::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_MAX_ENTRIES_PER_PARSE};
use sift_server::{AnalysisServer, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve log analysis requests over TCP.
#[derive(Debug, Parser)]
#[command(name = "logsift-server", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "LOGSIFT_BIND", default_value = "0.0.0.0:54000")]
    bind: SocketAddr,

    /// Folder that relative request paths resolve against
    #[arg(long, env = "LOGSIFT_LOG_ROOT")]
    log_root: Option<PathBuf>,

    /// Maximum files parsed at once per request (unbounded if unset)
    #[arg(long, env = "LOGSIFT_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Delimited-text layout: detect, pipe or comma
    #[arg(long, env = "LOGSIFT_DIALECT", default_value = "detect")]
    dialect: TextDialect,

    /// Maximum concurrent connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    max_connections: usize,

    /// Maximum entries returned by a parse request
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES_PER_PARSE)]
    max_entries: usize,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut ingest = IngestConfig::new().with_text_dialect(self.dialect);
        if let Some(limit) = self.max_concurrency {
            ingest = ingest.with_max_concurrency(limit);
        }

        let mut config = ServerConfig::new(self.bind)
            .with_max_connections(self.max_connections)
            .with_max_entries_per_parse(self.max_entries)
            .with_ingest(ingest);
        if let Some(root) = self.log_root {
            config = config.with_log_root(root);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    info!(
        bind = %config.bind_addr,
        log_root = ?config.log_root,
        dialect = %config.ingest.text_dialect,
        "Starting logsift server"
    );

    let server = AnalysisServer::bind(config)
        .await
        .context("failed to start server")?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("server failed")?;

    Ok(())
}
