//! # sift-cli
//!
//! logsift command-line interface.
//!
//! Provides commands for:
//! - Local analysis of a log folder
//! - Remote analysis through a running `logsift-server`
//! - Parsing a single file
//!
//! # Architecture
//!
//! `analyze` and `parse` call `sift-core` in-process. `query` talks to a
//! `sift-server` over TCP with the newline-delimited JSON protocol from
//! `sift_server::protocol`, via [`client::AnalysisClient`]. Both paths print
//! the same payload types.
//!
//! ```text
//! ┌───────────┐   JSON lines over TCP   ┌───────────────┐
//! │  logsift  │◄───────────────────────►│ logsift-server│
//! └─────┬─────┘                         └───────┬───────┘
//!       │                                       │
//!       └──────────────► sift-core ◄────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{AnalyzeArgs, Cli, Commands, Format, ParseArgs, QueryArgs, RangeArgs};
pub use client::AnalysisClient;
pub use error::CliError;
pub use output::OutputFormat;
