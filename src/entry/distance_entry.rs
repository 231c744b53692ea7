use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::{Operator, TestEntry, Value};
use crate::registry::TestEntryRegistrar;
use crate::utils;

lazy_static! {
    static ref DISTANCE_VALUE: Regex =
        Regex::new(r"(?i)^\s*-?\d+(?:[.,]\d+)?\s*(?:km|cm|mm|m|км|см|мм|м)\s*$")
            .expect("valid distance regex");
}

const DISTANCE_KEYS: [&str; 2] = ["distance", "length"];

/// Reads a distance in metres; `km` multiplies by 1000, `cm` and `mm` divide
/// by 100, a bare number is metres. Cyrillic unit letters are accepted too.
pub fn to_meters(value: &str) -> Option<f64> {
    let number = utils::parse_flexible_number(value)?;
    let unit = utils::trailing_unit(value);

    let meters = match unit.as_str() {
        "km" | "км" => number * 1000.0,
        "cm" | "см" | "mm" | "мм" => number / 100.0,
        "" | "m" | "м" => number,
        _ => return None,
    };
    Some(meters)
}

pub fn is_distance_key(key: &str) -> bool {
    DISTANCE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// True when the value is a number followed by a distance unit
pub fn is_distance_value(value: &str) -> bool {
    DISTANCE_VALUE.is_match(value)
}

/// Distance comparison in metres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceTestEntry {
    operator: Operator,
    meters: f64,
}

impl DistanceTestEntry {
    pub fn new(operator: Operator, meters: f64) -> Self {
        Self { operator, meters }
    }

    pub fn parse(operator: Operator, value: &str) -> Option<Self> {
        to_meters(value).map(|meters| Self::new(operator, meters))
    }
}

impl TestEntry for DistanceTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        let meters = match value {
            Value::Number(x) => x,
            Value::Text(s) => match to_meters(s) {
                Some(m) => m,
                None => return false,
            },
            Value::Bool(_) | Value::Duration(_) | Value::Instant(_) => return false,
        };
        self.operator.test_f64(meters, self.meters)
    }
}

impl fmt::Display for DistanceTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}m", self.operator, utils::format_number(self.meters))
    }
}

/// Claims `distance`/`length` keys and values carrying a distance unit
#[derive(Debug, Default, Clone, Copy)]
pub struct DistanceRegistrar;

impl TestEntryRegistrar for DistanceRegistrar {
    fn name(&self) -> &'static str {
        "distance"
    }

    fn test_common_key(&self, key: &str) -> bool {
        is_distance_key(key)
    }

    fn test_value(&self, value: &str) -> bool {
        is_distance_value(value)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<Box<dyn TestEntry>> {
        DistanceTestEntry::parse(operator, value).map(|e| Box::new(e) as Box<dyn TestEntry>)
    }
}
