//! Leaf predicates ("test entries") and the value model they are tested against
//!
//! A test entry holds an operator and a reference value for one value domain
//! and answers whether a concrete field value satisfies it. Entries are built
//! once per leaf when a query is parsed and are reused for every object the
//! filter is evaluated against, so they are immutable and `Send + Sync`.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

pub mod bool_entry;
pub mod const_entry;
pub mod distance_entry;
pub mod file_size_entry;
pub mod number_entry;
pub mod operator;
pub mod regex_entry;
pub mod string_entry;
pub mod time_entry;

pub use bool_entry::BoolTestEntry;
pub use const_entry::ConstTestEntry;
pub use distance_entry::{to_meters, DistanceRegistrar, DistanceTestEntry};
pub use file_size_entry::{to_bytes, FileSizeRegistrar, FileSizeTestEntry};
pub use number_entry::{IntTestEntry, NumberTestEntry};
pub use operator::Operator;
pub use regex_entry::RegexTestEntry;
pub use string_entry::{StringMatchMode, StringTestEntry};
pub use time_entry::{DateTimeTestEntry, DurationTestEntry};

/// A field value handed to a test entry by a tester
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Duration(Duration),
    Instant(DateTime<Utc>),
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value<'_> {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Text(value)
    }
}

impl From<Duration> for Value<'_> {
    fn from(value: Duration) -> Self {
        Value::Duration(value)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Instant(value)
    }
}

/// A leaf predicate
///
/// `test` never fails: a value that cannot be read in the entry's domain
/// simply does not match.
pub trait TestEntry: fmt::Debug + fmt::Display + Send + Sync {
    fn test(&self, value: Value<'_>) -> bool;
}
