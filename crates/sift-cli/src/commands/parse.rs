//! Parse command implementation.
//!
//! Parses one file locally and prints its normalized records.

use std::io::Write;

use sift_core::{FileFormat, SiftError, parse_file};
use sift_server::ParsePayload;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the parse command.
pub struct ParseCommand<'a> {
    args: &'a ParseArgs,
}

impl<'a> ParseCommand<'a> {
    /// Creates a new parse command handler.
    #[must_use]
    pub const fn new(args: &'a ParseArgs) -> Self {
        Self { args }
    }

    /// Picks the parser: `--type` if given, else the file extension.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown `--type`.
    pub fn format(&self) -> Result<FileFormat, CliError> {
        match &self.args.file_type {
            Some(name) => Ok(name.parse()?),
            None => Ok(FileFormat::from_path(&self.args.file)),
        }
    }

    /// Executes the parse command.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub async fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let file_format = self.format()?;
        let path = self.args.file.clone();
        let dialect = self.args.dialect;

        let outcome = tokio::task::spawn_blocking(move || parse_file(&path, file_format, dialect))
            .await
            .map_err(|e| CliError::Core(SiftError::Task(e.to_string())))??;

        let payload = ParsePayload::new(
            self.args.file.display().to_string(),
            file_format,
            outcome,
            self.args.limit.unwrap_or(usize::MAX),
        );
        format.write(out, &payload)
    }
}
