use chrono::{DateTime, Duration, Timelike, Utc};
use std::fmt;

use super::{Operator, TestEntry, Value};
use crate::utils;

/// Day tolerance of `≈` for dates
const SIMILAR_DAYS: i64 = 7;

/// Span comparison in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationTestEntry {
    operator: Operator,
    value: Duration,
}

impl DurationTestEntry {
    pub fn new(operator: Operator, value: Duration) -> Self {
        Self { operator, value }
    }

    pub fn parse(operator: Operator, value: &str) -> Option<Self> {
        utils::parse_duration(value).map(|d| Self::new(operator, d))
    }
}

impl TestEntry for DurationTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        let seconds = match value {
            Value::Number(x) => x,
            Value::Duration(d) => utils::duration_to_seconds(d),
            Value::Text(s) => match utils::parse_duration(s) {
                Some(d) => utils::duration_to_seconds(d),
                None => return false,
            },
            // time of day
            Value::Instant(t) => {
                t.num_seconds_from_midnight() as f64 + t.nanosecond() as f64 / 1e9
            }
            Value::Bool(_) => return false,
        };
        self.operator
            .test_f64(seconds, utils::duration_to_seconds(self.value))
    }
}

impl fmt::Display for DurationTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, utils::format_duration(self.value))
    }
}

/// Instant comparison, either exact (equality within a minute) or by calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateTimeTestEntry {
    operator: Operator,
    value: DateTime<Utc>,
    day_only: bool,
}

impl DateTimeTestEntry {
    pub fn new(operator: Operator, value: DateTime<Utc>, day_only: bool) -> Self {
        Self {
            operator,
            value,
            day_only,
        }
    }

    /// Day-only mode is picked when the text carries no time of day
    pub fn parse(operator: Operator, value: &str) -> Option<Self> {
        utils::parse_date(value).map(|(instant, has_time)| Self::new(operator, instant, !has_time))
    }

    pub fn is_day_only(&self) -> bool {
        self.day_only
    }

    fn resolve(&self, value: Value<'_>) -> Option<DateTime<Utc>> {
        match value {
            Value::Instant(t) => Some(t),
            Value::Number(days) => utils::days_ago(days),
            Value::Bool(b) => utils::days_ago(if b { 1.0 } else { 0.0 }),
            Value::Duration(d) => Utc::now().checked_sub_signed(d),
            Value::Text(s) => utils::parse_date(s).map(|(instant, _)| instant),
        }
    }

    fn test_instant(&self, instant: DateTime<Utc>) -> bool {
        if self.day_only {
            let (actual, reference) = (instant.date_naive(), self.value.date_naive());
            return match self.operator {
                Operator::SimilarTo => {
                    actual.signed_duration_since(reference).num_days().abs() <= SIMILAR_DAYS
                }
                operator => operator.test_ordering(actual.cmp(&reference)),
            };
        }

        let delta = instant.signed_duration_since(self.value);
        match self.operator {
            Operator::Equal => delta.num_seconds().abs() < 60,
            Operator::SimilarTo => delta.num_days().abs() <= SIMILAR_DAYS,
            operator => operator.test_ordering(instant.cmp(&self.value)),
        }
    }
}

impl TestEntry for DateTimeTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        self.resolve(value)
            .is_some_and(|instant| self.test_instant(instant))
    }
}

impl fmt::Display for DateTimeTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.day_only {
            write!(f, "{}{}", self.operator, self.value.format("%Y-%m-%d"))
        } else {
            write!(f, "{}{}", self.operator, utils::format_instant(self.value))
        }
    }
}
