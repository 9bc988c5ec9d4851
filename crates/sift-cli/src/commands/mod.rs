//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`analyze`] - Local folder analysis
//! - [`query`] - Folder analysis on a remote server
//! - [`parse`] - Single-file parsing

pub mod analyze;
pub mod parse;
pub mod query;

pub use analyze::AnalyzeCommand;
pub use parse::ParseCommand;
pub use query::QueryCommand;

use sift_core::DateRange;

use crate::cli::RangeArgs;
use crate::error::CliError;

/// Builds the date filter from `--start`/`--end`.
///
/// # Errors
///
/// Returns [`CliError::InvalidArgument`] if only one bound is given, a bound
/// fails to parse, or the bounds are inverted.
pub fn date_range(args: &RangeArgs) -> Result<Option<DateRange>, CliError> {
    match (&args.start, &args.end) {
        (Some(start), Some(end)) => Ok(Some(DateRange::parse(start, end)?)),
        (None, None) => Ok(None),
        _ => Err(CliError::InvalidArgument(
            "--start and --end must be given together".into(),
        )),
    }
}
