//! Grouped aggregation over normalized records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiftError;
use crate::stats::ResponseTimeStats;
use crate::types::LogRecord;

/// Record field used to partition records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Group by user
    User,
    /// Group by source address
    Address,
    /// Group by severity level
    Level,
}

impl GroupBy {
    /// Every dimension, in reporting order.
    pub const ALL: [Self; 3] = [Self::User, Self::Address, Self::Level];

    /// Returns the string representation of this dimension.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Address => "address",
            Self::Level => "level",
        }
    }

    /// Returns the grouping key of `record` for this dimension.
    #[must_use]
    pub fn key<'a>(&self, record: &'a LogRecord) -> &'a str {
        match self {
            Self::User => &record.user,
            Self::Address => &record.address,
            Self::Level => &record.level,
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "address" | "ip" => Ok(Self::Address),
            "level" => Ok(Self::Level),
            other => Err(SiftError::UnknownDimension(other.to_string())),
        }
    }
}

/// Summary of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Number of records in the group, measured or not
    pub count: u64,
    /// Present only if some record in the group had a response time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_stats: Option<ResponseTimeStats>,
}

/// Result of grouping records by one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Dimension the records were grouped by
    pub dimension: GroupBy,
    /// Group key to summary
    pub groups: BTreeMap<String, GroupSummary>,
}

impl AggregationResult {
    /// Number of distinct group keys.
    #[must_use]
    pub fn unique_groups(&self) -> usize {
        self.groups.len()
    }

    /// Sum of group counts, equal to the number of records aggregated.
    #[must_use]
    pub fn total_records(&self) -> u64 {
        self.groups.values().map(|g| g.count).sum()
    }
}

/// Partitions `records` by exact match on `dimension` and summarizes each
/// group. Record order does not affect the result.
#[must_use]
pub fn aggregate(records: &[LogRecord], dimension: GroupBy) -> AggregationResult {
    let mut buckets: BTreeMap<&str, (u64, Vec<f64>)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(dimension.key(record)).or_default();
        bucket.0 += 1;
        if record.has_response_time() {
            bucket.1.push(record.response_time_ms);
        }
    }

    let groups = buckets
        .into_iter()
        .map(|(key, (count, samples))| {
            let summary = GroupSummary {
                count,
                response_time_stats: ResponseTimeStats::from_samples(&samples),
            };
            (key.to_string(), summary)
        })
        .collect();

    AggregationResult { dimension, groups }
}

/// Aggregates once per requested dimension, preserving request order.
#[must_use]
pub fn analyze(records: &[LogRecord], dimensions: &[GroupBy]) -> Vec<AggregationResult> {
    dimensions.iter().map(|d| aggregate(records, *d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{JsonParser, LogParser};
    use crate::timestamp::parse_timestamp;
    use proptest::prelude::*;
    use test_case::test_case;

    fn record(user: &str, address: &str, level: &str, millis: f64) -> LogRecord {
        LogRecord::builder()
            .timestamp(parse_timestamp("2024-01-01 10:00:00").expect("timestamp"))
            .user(user)
            .address(address)
            .level(level)
            .response_time_ms(millis)
            .build()
            .expect("record")
    }

    // ===========================================
    // GroupBy Tests
    // ===========================================

    #[test_case("user", GroupBy::User)]
    #[test_case("ip", GroupBy::Address)]
    #[test_case("Address", GroupBy::Address)]
    #[test_case(" level ", GroupBy::Level)]
    fn dimension_from_str(input: &str, expected: GroupBy) {
        assert_eq!(input.parse::<GroupBy>().ok(), Some(expected));
    }

    #[test]
    fn unknown_dimension_is_named_error() {
        let result = "host".parse::<GroupBy>();
        assert!(matches!(result, Err(SiftError::UnknownDimension(ref d)) if d == "host"));
    }

    // ===========================================
    // Aggregation Tests
    // ===========================================

    #[test]
    fn json_document_by_address() {
        let outcome = JsonParser
            .parse(
                r#"[{"timestamp":"2024-01-01 10:00:00","ip_address":"1.1.1.1","user_id":5,"response_time":100},{"timestamp":"2024-01-01 10:05:00","ip_address":"1.1.1.1","username":"bob","response_time":50}]"#,
            )
            .expect("parse");

        let result = aggregate(&outcome.records, GroupBy::Address);
        assert_eq!(result.unique_groups(), 1);

        let group = &result.groups["1.1.1.1"];
        assert_eq!(group.count, 2);
        let expected = ResponseTimeStats {
            count: 2,
            min: 50.0,
            max: 100.0,
            average: 75.0,
            median: 75.0,
        };
        assert_eq!(group.response_time_stats, Some(expected));
    }

    #[test]
    fn unmeasured_records_count_but_add_no_stats() {
        let records = vec![
            record("alice", "a", "INFO", 0.0),
            record("alice", "a", "INFO", 10.0),
            record("bob", "b", "INFO", 0.0),
        ];
        let result = aggregate(&records, GroupBy::User);

        assert_eq!(result.groups["alice"].count, 2);
        let stats = result.groups["alice"].response_time_stats.expect("stats");
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 10.0);

        assert_eq!(result.groups["bob"].count, 1);
        assert!(result.groups["bob"].response_time_stats.is_none());
    }

    #[test]
    fn grouping_is_case_sensitive() {
        let records = vec![record("u", "a", "ERROR", 0.0), record("u", "a", "error", 0.0)];
        let result = aggregate(&records, GroupBy::Level);
        assert_eq!(result.unique_groups(), 2);
    }

    #[test]
    fn empty_input_has_no_groups() {
        let result = aggregate(&[], GroupBy::User);
        assert_eq!(result.unique_groups(), 0);
        assert_eq!(result.total_records(), 0);
    }

    #[test]
    fn analyze_keeps_requested_order() {
        let records = vec![record("u", "a", "INFO", 1.0)];
        let results = analyze(&records, &[GroupBy::Level, GroupBy::User]);
        let dims: Vec<GroupBy> = results.iter().map(|r| r.dimension).collect();
        assert_eq!(dims, vec![GroupBy::Level, GroupBy::User]);
    }

    #[test]
    fn summary_omits_absent_stats_when_serialized() {
        let result = aggregate(&[record("u", "a", "INFO", 0.0)], GroupBy::User);
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["dimension"], "user");
        assert_eq!(json["groups"]["u"]["count"], 1);
        assert!(json["groups"]["u"].get("response_time_stats").is_none());
    }

    // ===========================================
    // Property Tests
    // ===========================================

    fn arb_record() -> impl Strategy<Value = LogRecord> {
        (
            prop::sample::select(vec!["alice", "bob", "carol"]),
            prop::sample::select(vec!["10.0.0.1", "10.0.0.2"]),
            prop::sample::select(vec!["INFO", "WARN", "ERROR"]),
            prop_oneof![Just(0.0), 1.0f64..500.0],
        )
            .prop_map(|(u, a, l, t)| record(u, a, l, t))
    }

    proptest! {
        #[test]
        fn counts_sum_to_record_total(records in prop::collection::vec(arb_record(), 0..100)) {
            for dimension in GroupBy::ALL {
                let result = aggregate(&records, dimension);
                prop_assert_eq!(result.total_records(), records.len() as u64);
            }
        }

        #[test]
        fn split_then_sum_matches_merged(
            records in prop::collection::vec(arb_record(), 0..100),
            split in 0usize..100,
        ) {
            let split = split.min(records.len());
            let (left, right) = records.split_at(split);

            for dimension in GroupBy::ALL {
                let merged = aggregate(&records, dimension);
                let a = aggregate(left, dimension);
                let b = aggregate(right, dimension);

                for (key, group) in &merged.groups {
                    let summed = a.groups.get(key).map_or(0, |g| g.count)
                        + b.groups.get(key).map_or(0, |g| g.count);
                    prop_assert_eq!(group.count, summed);
                }
            }
        }

        #[test]
        fn record_order_is_irrelevant(records in prop::collection::vec(arb_record(), 0..100)) {
            let mut reversed = records.clone();
            reversed.reverse();
            for dimension in GroupBy::ALL {
                prop_assert_eq!(aggregate(&records, dimension), aggregate(&reversed, dimension));
            }
        }
    }
}
