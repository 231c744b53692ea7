use std::fmt;

use super::{TestEntry, Value};

/// Returns a fixed result for every value; the fail-closed fallback of the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstTestEntry {
    result: bool,
}

impl ConstTestEntry {
    pub const fn new(result: bool) -> Self {
        Self { result }
    }

    pub const fn never() -> Self {
        Self::new(false)
    }

    pub const fn always() -> Self {
        Self::new(true)
    }
}

impl TestEntry for ConstTestEntry {
    fn test(&self, _value: Value<'_>) -> bool {
        self.result
    }
}

impl fmt::Display for ConstTestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.result)
    }
}
