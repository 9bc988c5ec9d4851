//! # sift-server
//!
//! Newline-delimited JSON request/response server over the `sift-core`
//! ingestion engine.
//!
//! Each TCP connection carries any number of requests, one JSON object per
//! line, each answered by one JSON response line. See [`protocol`] for the
//! message shapes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sift_server::{AnalysisServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default().with_log_root("/var/log/app");
//!     let server = AnalysisServer::bind(config).await.unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handlers::AnalysisService;
pub use protocol::{
    AnalysisPayload, AnalyzeRequest, DimensionPayload, ParsePayload, ParseRequest, Request,
    Response, Status,
};
pub use server::AnalysisServer;
