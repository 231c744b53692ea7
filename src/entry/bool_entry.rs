use chrono::{DateTime, Duration, Utc};
use std::fmt;

use super::{TestEntry, Value};

/// Matches values whose truthiness equals the expected flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolTestEntry {
    value: bool,
}

impl BoolTestEntry {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// Truthiness of any value: nonzero numbers and spans, non-empty text,
/// instants other than the default one
pub(crate) fn truthiness(value: Value<'_>) -> bool {
    match value {
        Value::Bool(b) => b,
        Value::Number(x) => x != 0.0 && !x.is_nan(),
        Value::Text(s) => !s.is_empty(),
        Value::Duration(d) => d != Duration::zero(),
        Value::Instant(t) => t != DateTime::<Utc>::default(),
    }
}

impl TestEntry for BoolTestEntry {
    fn test(&self, value: Value<'_>) -> bool {
        truthiness(value) == self.value
    }
}

impl fmt::Display for BoolTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "={}", self.value)
    }
}
