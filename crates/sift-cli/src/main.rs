//! logsift CLI binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sift_cli::cli::{Cli, Commands};
use sift_cli::commands::{AnalyzeCommand, ParseCommand, QueryCommand};
use sift_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), sift_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Analyze(args) => {
            AnalyzeCommand::new(args).execute(&mut stdout, &format).await?;
        }
        Commands::Query(args) => {
            QueryCommand::new(args).execute(&mut stdout, &format).await?;
        }
        Commands::Parse(args) => {
            ParseCommand::new(args).execute(&mut stdout, &format).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_cli::cli::Format;

    #[test]
    fn cli_parses_analyze() {
        let cli = Cli::parse_from(["logsift", "analyze", "logs"]);
        assert!(matches!(cli.command, Commands::Analyze(_)));
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["logsift", "--format", "json", "parse", "a.json"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[tokio::test]
    async fn run_analyze_missing_folder_fails() {
        let cli = Cli::parse_from(["logsift", "analyze", "/definitely/not/a/real/folder"]);
        assert!(run(cli).await.is_err());
    }

    #[tokio::test]
    async fn run_query_without_server_fails() {
        let cli = Cli::parse_from(["logsift", "query", "logs", "--server", "127.0.0.1:1"]);
        assert!(run(cli).await.is_err());
    }
}
