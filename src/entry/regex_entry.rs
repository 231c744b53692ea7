use regex::{Regex, RegexBuilder};
use std::fmt;

use super::{StringMatchMode, TestEntry, Value};
use crate::utils;

/// Runs a compiled pattern against the text form of any value
#[derive(Debug, Clone)]
pub struct RegexTestEntry {
    regex: Regex,
    source: String,
}

impl RegexTestEntry {
    pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }

    /// Builds the entry from a `*`/`?` wildcard pattern anchored per match mode
    pub fn from_wildcard(
        pattern: &str,
        mode: StringMatchMode,
        case_insensitive: bool,
    ) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&utils::wildcard_to_regex(pattern, mode))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }
}

impl TestEntry for RegexTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        match value {
            Value::Text(s) => self.regex.is_match(s),
            Value::Bool(b) => self.regex.is_match(if b { "true" } else { "false" }),
            Value::Number(x) => self.regex.is_match(&utils::format_number(x)),
            Value::Duration(d) => self.regex.is_match(&utils::format_duration(d)),
            Value::Instant(t) => self.regex.is_match(&utils::format_instant(t)),
        }
    }
}

impl fmt::Display for RegexTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.source)
    }
}
