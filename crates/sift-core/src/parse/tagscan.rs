//! Tag-scanning parser for XML-ish logs.
//!
//! This is deliberately not an XML parser: it walks successive
//! `<log>...</log>` blocks by substring search and pulls the text between
//! simple `<tag>` / `</tag>` pairs. Attributes, namespaces, CDATA and entity
//! decoding are not supported.

use crate::error::Result;
use crate::parse::{LogParser, ParseOutcome};
use crate::timestamp::parse_timestamp;
use crate::types::LogRecord;

const OPEN_BLOCK: &str = "<log>";
const CLOSE_BLOCK: &str = "</log>";

/// Parser for `<log>` block documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagScanParser;

impl TagScanParser {
    fn parse_block(block: &str) -> Option<LogRecord> {
        let user = tag_text(block, "username")?;
        let address = tag_text(block, "ip_address")?;
        let level = tag_text(block, "log_level")?;
        let timestamp = parse_timestamp(tag_text(block, "timestamp")?).ok()?;

        let response_time = tag_text(block, "response_time")
            .and_then(|t| t.parse::<f64>().ok())
            .unwrap_or(0.0);

        LogRecord::builder()
            .timestamp(timestamp)
            .user(user)
            .address(address)
            .level(level)
            .message(tag_text(block, "message").unwrap_or_default())
            .response_time_ms(response_time)
            .build()
            .ok()
    }
}

/// Returns the trimmed, non-empty text of the first `<name>...</name>` pair.
fn tag_text<'a>(block: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");

    let start = block.find(&open)? + open.len();
    let len = block[start..].find(&close)?;
    let text = block[start..start + len].trim();
    (!text.is_empty()).then_some(text)
}

impl LogParser for TagScanParser {
    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let mut outcome = ParseOutcome::default();
        let mut rest = input;

        while let Some(open) = rest.find(OPEN_BLOCK) {
            let body_start = open + OPEN_BLOCK.len();
            let Some(len) = rest[body_start..].find(CLOSE_BLOCK) else {
                break;
            };
            outcome.push(Self::parse_block(&rest[body_start..body_start + len]));
            rest = &rest[body_start + len + CLOSE_BLOCK.len()..];
        }

        Ok(outcome)
    }
}
