use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::{Operator, TestEntry, Value};
use crate::registry::TestEntryRegistrar;
use crate::utils;

lazy_static! {
    static ref FILE_SIZE_VALUE: Regex =
        Regex::new(r"(?i)^\s*\d+(?:[.,]\d+)?\s*(?:kb|mb|gb|tb|кб|мб|гб|тб)\s*$")
            .expect("valid file size regex");
}

const FILE_SIZE_KEYS: [&str; 2] = ["size", "filesize"];

/// Reads a size in bytes with decimal multipliers (`kb` = 1e3, `mb` = 1e6,
/// `gb` = 1e9, `tb` = 1e12); a bare number or `b` is bytes
pub fn to_bytes(value: &str) -> Option<f64> {
    let number = utils::parse_flexible_number(value)?;
    let unit = utils::trailing_unit(value);

    let multiplier = match unit.as_str() {
        "" | "b" | "б" | "bytes" | "байт" => 1.0,
        u if u.starts_with("kb") || u.starts_with("кб") => 1e3,
        u if u.starts_with("mb") || u.starts_with("мб") => 1e6,
        u if u.starts_with("gb") || u.starts_with("гб") => 1e9,
        u if u.starts_with("tb") || u.starts_with("тб") => 1e12,
        _ => return None,
    };
    Some(number * multiplier)
}

pub fn is_file_size_key(key: &str) -> bool {
    FILE_SIZE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// True when the value is a number followed by a size unit
pub fn is_file_size_value(value: &str) -> bool {
    FILE_SIZE_VALUE.is_match(value)
}

/// Size comparison in bytes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileSizeTestEntry {
    operator: Operator,
    bytes: f64,
}

impl FileSizeTestEntry {
    pub fn new(operator: Operator, bytes: f64) -> Self {
        Self { operator, bytes }
    }

    pub fn parse(operator: Operator, value: &str) -> Option<Self> {
        to_bytes(value).map(|bytes| Self::new(operator, bytes))
    }
}

impl TestEntry for FileSizeTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        let bytes = match value {
            Value::Number(x) => x,
            Value::Text(s) => match to_bytes(s) {
                Some(b) => b,
                None => return false,
            },
            Value::Bool(_) | Value::Duration(_) | Value::Instant(_) => return false,
        };
        self.operator.test_f64(bytes, self.bytes)
    }
}

impl fmt::Display for FileSizeTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}b", self.operator, utils::format_number(self.bytes))
    }
}

/// Claims `size`/`filesize` keys and values carrying a size unit
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSizeRegistrar;

impl TestEntryRegistrar for FileSizeRegistrar {
    fn name(&self) -> &'static str {
        "file_size"
    }

    fn test_common_key(&self, key: &str) -> bool {
        is_file_size_key(key)
    }

    fn test_value(&self, value: &str) -> bool {
        is_file_size_value(value)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<Box<dyn TestEntry>> {
        FileSizeTestEntry::parse(operator, value).map(|e| Box::new(e) as Box<dyn TestEntry>)
    }
}
