use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::operator::EPSILON;
use super::{TestEntry, Value};
use crate::utils;

/// How a string pattern is matched against text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatchMode {
    /// Substring, anchored at a word start unless simple matching is on
    #[default]
    IncludedWithin,
    StartsWith,
    CompleteMatch,
}

impl FromStr for StringMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "includedwithin" | "included" | "contains" => Ok(StringMatchMode::IncludedWithin),
            "startswith" | "starts" => Ok(StringMatchMode::StartsWith),
            "completematch" | "complete" | "exact" => Ok(StringMatchMode::CompleteMatch),
            _ => Err(format!("Unknown string match mode: {}", s)),
        }
    }
}

impl fmt::Display for StringMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMatchMode::IncludedWithin => write!(f, "included_within"),
            StringMatchMode::StartsWith => write!(f, "starts_with"),
            StringMatchMode::CompleteMatch => write!(f, "complete_match"),
        }
    }
}

/// Text match with a pre-computed number and boolean reading of the pattern,
/// so numeric and boolean fields are tested consistently
#[derive(Debug, Clone)]
pub struct StringTestEntry {
    original: String,
    pattern: String,
    mode: StringMatchMode,
    case_insensitive: bool,
    strict_words: bool,
    as_number: Option<f64>,
    as_bool: Option<bool>,
}

impl StringTestEntry {
    pub fn new(pattern: impl Into<String>, mode: StringMatchMode, case_insensitive: bool) -> Self {
        Self::with_simple_matching(pattern, mode, case_insensitive, false)
    }

    /// `simple_matching` relaxes `IncludedWithin` to a plain substring search
    pub fn with_simple_matching(
        pattern: impl Into<String>,
        mode: StringMatchMode,
        case_insensitive: bool,
        simple_matching: bool,
    ) -> Self {
        let original = pattern.into();
        let pattern = if case_insensitive {
            original.to_lowercase()
        } else {
            original.clone()
        };

        Self {
            as_number: utils::parse_number(&original),
            as_bool: utils::parse_bool(&original),
            original,
            pattern,
            mode,
            case_insensitive,
            strict_words: !simple_matching,
        }
    }

    fn test_str(&self, text: &str) -> bool {
        if self.case_insensitive {
            self.matches(&text.to_lowercase())
        } else {
            self.matches(text)
        }
    }

    fn matches(&self, text: &str) -> bool {
        match self.mode {
            StringMatchMode::CompleteMatch => text == self.pattern,
            StringMatchMode::StartsWith => text.starts_with(&self.pattern),
            StringMatchMode::IncludedWithin if self.strict_words => {
                contains_at_word_start(text, &self.pattern)
            }
            StringMatchMode::IncludedWithin => text.contains(&self.pattern),
        }
    }
}

/// Substring search that only accepts matches starting a word:
/// at the beginning, after a separator, or where letters turn into digits
/// (`"458"` is found in `"F458"`, `"rari"` is not found in `"Ferrari"`)
fn contains_at_word_start(text: &str, needle: &str) -> bool {
    let Some(first) = needle.chars().next() else {
        return true;
    };

    let mut previous: Option<char> = None;
    for (index, ch) in text.char_indices() {
        if text[index..].starts_with(needle) {
            let boundary = match previous {
                None => true,
                Some(prev) if !prev.is_alphanumeric() || !first.is_alphanumeric() => true,
                Some(prev) => prev.is_alphabetic() != first.is_alphabetic(),
            };
            if boundary {
                return true;
            }
        }
        previous = Some(ch);
    }
    false
}

impl TestEntry for StringTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        match value {
            Value::Text(s) => self.test_str(s),
            Value::Number(x) => self.as_number.is_some_and(|n| (x - n).abs() < EPSILON),
            Value::Bool(b) => self.as_bool == Some(b),
            Value::Duration(d) => self.test_str(&utils::format_duration(d)),
            Value::Instant(t) => self.test_str(&utils::format_instant(t)),
        }
    }
}

impl fmt::Display for StringTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            StringMatchMode::IncludedWithin => write!(f, "{}", self.original),
            StringMatchMode::StartsWith => write!(f, "{}*", self.original),
            StringMatchMode::CompleteMatch => write!(f, "={}", self.original),
        }
    }
}
