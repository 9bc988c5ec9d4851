//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sift_core::{GroupBy, TextDialect};

use crate::error::CliError;

/// Default analysis server address.
pub const DEFAULT_SERVER: &str = "127.0.0.1:54000";

/// logsift - multi-format log analysis.
#[derive(Parser, Debug, Clone)]
#[command(name = "logsift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ingest a folder locally and print grouped statistics.
    Analyze(AnalyzeArgs),

    /// Ask a running logsift server to analyze a folder.
    Query(QueryArgs),

    /// Parse a single file and print its normalized records.
    Parse(ParseArgs),
}

/// Inclusive time window shared by `analyze` and `query`.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Keep records at or after this time (YYYY-MM-DD HH:MM:SS).
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Keep records at or before this time (YYYY-MM-DD HH:MM:SS).
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}

/// Arguments for `analyze`.
#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Folder to ingest.
    pub folder: PathBuf,

    /// Dimension to group by: user, address (ip), level or all. Repeatable.
    #[arg(long = "by", value_name = "DIMENSION", default_value = "all")]
    pub by: Vec<String>,

    /// Time window.
    #[command(flatten)]
    pub range: RangeArgs,

    /// Only read files directly inside the folder.
    #[arg(long)]
    pub no_recursive: bool,

    /// Delimited-text layout: detect, pipe or comma.
    #[arg(long, env = "LOGSIFT_DIALECT", default_value = "detect")]
    pub dialect: TextDialect,

    /// Maximum files parsed at once (unbounded if unset).
    #[arg(long, env = "LOGSIFT_MAX_CONCURRENCY")]
    pub max_concurrency: Option<usize>,
}

/// Arguments for `query`.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Folder to analyze, as seen by the server.
    pub folder: String,

    /// Server address.
    #[arg(short, long, env = "LOGSIFT_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Dimension to group by: user, address (ip), level or all. Repeatable.
    #[arg(long = "by", value_name = "DIMENSION", default_value = "all")]
    pub by: Vec<String>,

    /// Time window.
    #[command(flatten)]
    pub range: RangeArgs,
}

/// Arguments for `parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// File to parse.
    pub file: PathBuf,

    /// Parser to use: json, txt or xml. Chosen by extension if omitted.
    #[arg(long = "type", value_name = "TYPE")]
    pub file_type: Option<String>,

    /// Print at most this many records.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Delimited-text layout: detect, pipe or comma.
    #[arg(long, env = "LOGSIFT_DIALECT", default_value = "detect")]
    pub dialect: TextDialect,
}

/// Expands `--by` values into distinct dimensions, keeping first-seen order.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] for an unknown dimension.
pub fn resolve_dimensions(values: &[String]) -> Result<Vec<GroupBy>, CliError> {
    let mut dimensions = Vec::new();
    for value in values {
        let expanded = if value.trim().eq_ignore_ascii_case("all") {
            GroupBy::ALL.to_vec()
        } else {
            vec![value.parse::<GroupBy>()?]
        };
        for dimension in expanded {
            if !dimensions.contains(&dimension) {
                dimensions.push(dimension);
            }
        }
    }
    Ok(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_all() {
        let dims = resolve_dimensions(&["all".into()]).expect("dims");
        assert_eq!(dims, GroupBy::ALL.to_vec());
    }

    #[test]
    fn resolve_dedupes_in_order() {
        let dims = resolve_dimensions(&["level".into(), "ip".into(), "address".into()])
            .expect("dims");
        assert_eq!(dims, vec![GroupBy::Level, GroupBy::Address]);
    }

    #[test]
    fn resolve_rejects_unknown() {
        let result = resolve_dimensions(&["host".into()]);
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn parse_analyze_flags() {
        let cli = Cli::parse_from([
            "logsift",
            "analyze",
            "logs",
            "--by",
            "user",
            "--by",
            "level",
            "--start",
            "2024-01-01 00:00:00",
            "--end",
            "2024-01-31 23:59:59",
            "--no-recursive",
            "--dialect",
            "comma",
            "--max-concurrency",
            "4",
        ]);

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.folder, PathBuf::from("logs"));
        assert_eq!(args.by, vec!["user", "level"]);
        assert_eq!(args.range.start.as_deref(), Some("2024-01-01 00:00:00"));
        assert!(args.no_recursive);
        assert_eq!(args.dialect, TextDialect::Comma);
        assert_eq!(args.max_concurrency, Some(4));
    }

    #[test]
    fn analyze_defaults_to_all() {
        let cli = Cli::parse_from(["logsift", "analyze", "logs"]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze command");
        };
        assert_eq!(args.by, vec!["all"]);
        assert!(!args.no_recursive);
    }

    #[test]
    fn start_requires_end() {
        let result = Cli::try_parse_from(["logsift", "analyze", "logs", "--start", "2024-01-01 00:00:00"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_query_flags() {
        let cli = Cli::parse_from(["logsift", "query", "logs", "-s", "10.0.0.1:54000", "--by", "ip"]);
        let Commands::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.server, "10.0.0.1:54000");
        assert_eq!(args.by, vec!["ip"]);
    }

    #[test]
    fn query_by_is_repeatable() {
        let cli = Cli::parse_from(["logsift", "query", "logs", "--by", "user", "--by", "level"]);
        let Commands::Query(args) = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(args.by, vec!["user", "level"]);
    }

    #[test]
    fn parse_parse_flags() {
        let cli = Cli::parse_from(["logsift", "--format", "json", "parse", "a.log", "--type", "txt", "--limit", "5"]);
        assert_eq!(cli.format, Format::Json);
        let Commands::Parse(args) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(args.file_type.as_deref(), Some("txt"));
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn format_flag_after_subcommand() {
        let cli = Cli::parse_from(["logsift", "analyze", "logs", "-f", "json"]);
        assert_eq!(cli.format, Format::Json);
    }
}
