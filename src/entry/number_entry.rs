use std::fmt;

use super::{Operator, TestEntry, Value};
use crate::utils;

/// Reads any value as a number: text flexibly, booleans as 1/0,
/// spans as seconds, instants as days ago
pub(crate) fn as_number(value: Value<'_>) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        Value::Number(x) => Some(x),
        Value::Text(s) => utils::parse_flexible_number(s),
        Value::Duration(d) => Some(utils::duration_to_seconds(d)),
        Value::Instant(t) => Some(utils::days_since(t)),
    }
}

/// Floating-point comparison with an epsilon band for equality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberTestEntry {
    operator: Operator,
    value: f64,
}

impl NumberTestEntry {
    pub fn new(operator: Operator, value: f64) -> Self {
        Self { operator, value }
    }
}

impl TestEntry for NumberTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        as_number(value).is_some_and(|x| self.operator.test_f64(x, self.value))
    }
}

impl fmt::Display for NumberTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, utils::format_number(self.value))
    }
}

/// Integer comparison; tested values are rounded to the nearest integer first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntTestEntry {
    operator: Operator,
    value: i64,
}

impl IntTestEntry {
    pub fn new(operator: Operator, value: i64) -> Self {
        Self { operator, value }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl TestEntry for IntTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        as_number(value).is_some_and(|x| self.operator.test_f64(x.round(), self.value as f64))
    }
}

impl fmt::Display for IntTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}
