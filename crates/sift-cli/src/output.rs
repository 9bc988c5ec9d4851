//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;
use sift_core::{GroupSummary, format_timestamp};
use sift_server::{AnalysisPayload, DimensionPayload, ParsePayload};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

const RULE: &str = "══════════════════════════════════";

impl TableDisplay for AnalysisPayload {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Log Analysis")?;
        writeln!(writer, "{RULE}")?;
        writeln!(writer, "Records:          {}", self.total_records)?;
        writeln!(writer, "Files processed:  {}", self.files_processed)?;
        writeln!(writer, "Files failed:     {}", self.files_failed)?;

        for dimension in &self.results {
            writeln!(writer)?;
            dimension.write_table(writer)?;
        }

        if !self.failures.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Failures")?;
            for failure in &self.failures {
                writeln!(writer, "  {}: {}", failure.path.display(), failure.reason)?;
            }
        }
        Ok(())
    }
}

impl TableDisplay for DimensionPayload {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "By {} ({} groups, {} records)",
            self.dimension, self.unique_groups, self.total_records
        )?;

        if self.groups.is_empty() {
            writeln!(writer, "  (no records)")?;
            return Ok(());
        }

        let key_width = self
            .groups
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("KEY".len());

        writeln!(
            writer,
            "  {:<key_width$}  {:>7}  {:>10}  {:>10}  {:>10}  {:>10}",
            "KEY", "COUNT", "MIN", "MAX", "AVG", "MEDIAN"
        )?;
        for (key, summary) in &self.groups {
            writeln!(writer, "  {key:<key_width$}  {}", summary_columns(summary))?;
        }
        Ok(())
    }
}

fn summary_columns(summary: &GroupSummary) -> String {
    match &summary.response_time_stats {
        Some(s) => format!(
            "{:>7}  {:>10.2}  {:>10.2}  {:>10.2}  {:>10.2}",
            summary.count, s.min, s.max, s.average, s.median
        ),
        None => format!(
            "{:>7}  {:>10}  {:>10}  {:>10}  {:>10}",
            summary.count, "-", "-", "-", "-"
        ),
    }
}

impl TableDisplay for ParsePayload {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{} ({})", self.file_path, self.file_type)?;
        writeln!(writer, "{RULE}")?;
        writeln!(
            writer,
            "Parsed: {}  Shown: {}  Skipped: {}",
            self.count, self.sent_count, self.skipped
        )?;
        writeln!(writer)?;

        for entry in &self.entries {
            let latency = if entry.has_response_time() {
                format!(" {:.0}ms", entry.response_time_ms)
            } else {
                String::new()
            };
            writeln!(
                writer,
                "{}  {:<5}  {}@{}{}  {}",
                format_timestamp(entry.timestamp),
                entry.level,
                entry.user,
                entry.address,
                latency,
                entry.message
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{FileFormat, IngestReport, JsonParser, LogParser, ParseOutcome};

    fn render<T: Serialize + TableDisplay>(format: Format, value: &T) -> String {
        let mut buf = Vec::new();
        OutputFormat::new(format).write(&mut buf, value).expect("render");
        String::from_utf8(buf).expect("utf-8")
    }

    fn sample_outcome() -> ParseOutcome {
        JsonParser
            .parse(
                r#"[
                    {"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":5,"response_time":100},
                    {"timestamp":"2024-01-01 10:05:00","ip_address":"1.1.1.1","username":"bob","response_time":50},
                    {"timestamp":"2024-01-01 10:06:00","ip_address":"2.2.2.2","username":"bob","message":"done"}
                ]"#,
            )
            .expect("parse")
    }

    fn sample_analysis() -> AnalysisPayload {
        let report = IngestReport {
            records: sample_outcome().records,
            files_discovered: 1,
            files_processed: 1,
            ..IngestReport::default()
        };
        AnalysisPayload::from_report(report, &[sift_core::GroupBy::Address])
    }

    #[test]
    fn analysis_table_lists_groups() {
        let text = render(Format::Table, &sample_analysis());

        assert!(text.contains("Records:          3"));
        assert!(text.contains("By address (2 groups, 3 records)"));
        assert!(text.contains("1.1.1.1"));
        assert!(text.contains("75.00"));
        // 2.2.2.2 has no measured response times
        let line = text.lines().find(|l| l.contains("2.2.2.2")).expect("row");
        assert!(line.contains('-'));
    }

    #[test]
    fn analysis_json_is_wire_shape() {
        let text = render(Format::Json, &sample_analysis());
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");

        assert_eq!(value["total_records"], 3);
        assert_eq!(value["results"][0]["dimension"], "address");
        assert_eq!(
            value["results"][0]["groups"]["1.1.1.1"]["response_time_stats"]["median"],
            75.0
        );
    }

    #[test]
    fn parse_table_shows_entries() {
        let payload = ParsePayload::new("app.json", FileFormat::Json, sample_outcome(), 2);
        let text = render(Format::Table, &payload);

        assert!(text.contains("app.json (json)"));
        assert!(text.contains("Parsed: 3  Shown: 2  Skipped: 0"));
        assert!(text.contains("user_5@1.1.1.1 100ms"));
        assert!(!text.contains("done"));
    }
}
