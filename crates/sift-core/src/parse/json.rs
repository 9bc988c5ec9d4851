//! JSON log parser.
//!
//! Accepts a top-level array of record objects, an object wrapping such an
//! array under `logs`, or a single record object.

use serde_json::{Map, Value};

use crate::error::{Result, SiftError};
use crate::parse::{LogParser, ParseOutcome};
use crate::timestamp::parse_timestamp;
use crate::types::LogRecord;

/// Parser for JSON log documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Converts one record object. Returns `None` if `timestamp` or
    /// `ip_address` is absent, blank or unusable.
    fn parse_object(value: &Value) -> Option<LogRecord> {
        let obj = value.as_object()?;

        let timestamp = obj
            .get("timestamp")
            .and_then(Value::as_str)
            .and_then(|s| parse_timestamp(s).ok())?;
        let address = obj
            .get("ip_address")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        let mut builder = LogRecord::builder().timestamp(timestamp).address(address);

        if let Some(user) = Self::extract_user(obj) {
            builder = builder.user(user);
        }
        if let Some(level) = obj.get("log_level").and_then(Value::as_str) {
            builder = builder.level(level);
        }
        if let Some(message) = obj.get("message").and_then(Value::as_str) {
            builder = builder.message(message);
        }
        if let Some(millis) = obj.get("response_time").and_then(Self::extract_number) {
            builder = builder.response_time_ms(millis);
        }

        builder.build().ok()
    }

    /// A numeric `user_id` wins over `username`.
    fn extract_user(obj: &Map<String, Value>) -> Option<String> {
        let from_id = obj.get("user_id").and_then(|id| match id {
            Value::Number(n) => n
                .as_i64()
                .map(|v| v.to_string())
                .or_else(|| n.as_u64().map(|v| v.to_string())),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        });

        match from_id {
            Some(id) => Some(crate::types::user_from_id(id)),
            None => obj
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    fn extract_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl LogParser for JsonParser {
    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let document: Value = serde_json::from_str(input)
            .map_err(|e| SiftError::MalformedDocument(format!("invalid JSON: {e}")))?;

        let items: Vec<&Value> = match &document {
            Value::Array(items) => items.iter().collect(),
            Value::Object(obj) => match obj.get("logs") {
                Some(Value::Array(items)) => items.iter().collect(),
                _ => vec![&document],
            },
            other => {
                return Err(SiftError::MalformedDocument(format!(
                    "expected an array or object, found {}",
                    json_kind(other)
                )));
            }
        };

        let mut outcome = ParseOutcome::default();
        for item in items {
            outcome.push(Self::parse_object(item));
        }
        Ok(outcome)
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::format_timestamp;

    fn parse(input: &str) -> ParseOutcome {
        JsonParser.parse(input).expect("document should parse")
    }

    #[test]
    fn parses_array_in_order() {
        let outcome = parse(
            r#"[
                {"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":5,"response_time":100},
                {"timestamp":"2024-01-01 10:05:00","ip_address":"1.1.1.1","username":"bob","response_time":50}
            ]"#,
        );

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 0);

        let first = &outcome.records[0];
        assert_eq!(first.user, "user_5");
        assert_eq!(first.address, "1.1.1.1");
        assert_eq!(first.level, "INFO");
        assert_eq!(first.message, "");
        assert_eq!(first.response_time_ms, 100.0);

        let second = &outcome.records[1];
        assert_eq!(second.user, "bob");
        assert_eq!(format_timestamp(second.timestamp), "2024-01-01 10:05:00");
        assert_eq!(second.response_time_ms, 50.0);
    }

    #[test]
    fn drops_objects_missing_required_keys() {
        let outcome = parse(
            r#"[
                {"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1"},
                {"ip_address":"2.2.2.2"},
                {"timestamp":"2024-01-01 10:00:00"},
                {},
                {"timestamp":"2024-01-01 11:00:00","ip_address":"3.3.3.3"}
            ]"#,
        );

        let addresses: Vec<&str> = outcome.records.iter().map(|r| r.address.as_str()).collect();
        assert_eq!(addresses, vec!["1.1.1.1", "3.3.3.3"]);
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn drops_objects_with_blank_address() {
        let outcome = parse(
            r#"[
                {"timestamp":"2024-01-01 10:00:00","ip_address":""},
                {"timestamp":"2024-01-01 10:00:00","ip_address":"   "},
                {"timestamp":"2024-01-01 10:00:00","ip_address":" 4.4.4.4 "}
            ]"#,
        );

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].address, "4.4.4.4");
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn drops_objects_with_bad_timestamp() {
        let outcome = parse(r#"[{"timestamp":"soon","ip_address":"1.1.1.1"}]"#);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn user_id_takes_priority_over_username() {
        let outcome = parse(
            r#"{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":9,"username":"eve"}"#,
        );
        assert_eq!(outcome.records[0].user, "user_9");
    }

    #[test]
    fn string_user_id_is_prefixed() {
        let outcome = parse(
            r#"{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":"77"}"#,
        );
        assert_eq!(outcome.records[0].user, "user_77");
    }

    #[test]
    fn missing_identity_defaults_to_unknown() {
        let outcome = parse(r#"{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1"}"#);
        assert_eq!(outcome.records[0].user, "unknown");
    }

    #[test]
    fn single_object_yields_one_record() {
        let outcome = parse(
            r#"{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","log_level":"ERROR","message":"boom"}"#,
        );
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].level, "ERROR");
        assert_eq!(outcome.records[0].message, "boom");
    }

    #[test]
    fn logs_wrapper_is_unwrapped() {
        let outcome = parse(
            r#"{"logs":[
                {"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1"},
                {"timestamp":"2024-01-01 10:00:01","ip_address":"1.1.1.2"}
            ]}"#,
        );
        assert_eq!(outcome.records.len(), 2);
    }

    #[test]
    fn response_time_variants() {
        let outcome = parse(
            r#"[
                {"timestamp":"2024-01-01 10:00:00","ip_address":"a","response_time":"12.5"},
                {"timestamp":"2024-01-01 10:00:00","ip_address":"b","response_time":"fast"},
                {"timestamp":"2024-01-01 10:00:00","ip_address":"c","response_time":-3},
                {"timestamp":"2024-01-01 10:00:00","ip_address":"d","response_time":null}
            ]"#,
        );
        let times: Vec<f64> = outcome.records.iter().map(|r| r.response_time_ms).collect();
        assert_eq!(times, vec![12.5, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn non_object_array_items_are_skipped() {
        let outcome = parse(r#"[1, "two", null, {"timestamp":"2024-01-01 10:00:00","ip_address":"x"}]"#);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = JsonParser.parse(r#"[{"timestamp": "2024-01-01 10:00:00", "#);
        assert!(matches!(result, Err(SiftError::MalformedDocument(_))));
    }

    #[test]
    fn scalar_document_is_an_error() {
        let result = JsonParser.parse("42");
        assert!(matches!(result, Err(SiftError::MalformedDocument(ref m)) if m.contains("a number")));
    }

    #[test]
    fn serialized_records_parse_back() {
        let original = parse(
            r#"[{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","username":"bob","log_level":"WARN","message":"m","response_time":7}]"#,
        );
        let text = serde_json::to_string(&original.records).expect("serialize");
        let reparsed = parse(&text);
        assert_eq!(reparsed.records, original.records);
    }
}
