//! Open registry of test-entry domains
//!
//! A registrar claims a query token either by its key (`size:...`) or by the
//! shape of its value (`>10mb`) and builds the matching test entry. The parser
//! asks the registry first and only falls back to generic number, date and
//! string resolution when no registrar claims the token.

use lazy_static::lazy_static;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::trace;

use crate::entry::{ConstTestEntry, DistanceRegistrar, FileSizeRegistrar, Operator, TestEntry};

/// A pluggable value domain
pub trait TestEntryRegistrar: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Whether this key name always means this domain
    fn test_common_key(&self, key: &str) -> bool;

    /// Whether a raw value looks like this domain (e.g. carries a unit suffix)
    fn test_value(&self, value: &str) -> bool;

    /// Builds the entry; `None` when the value cannot be read
    fn create(&self, operator: Operator, value: &str) -> Option<Box<dyn TestEntry>>;
}

/// Ordered list of registrars; earlier registrations win
#[derive(Clone, Default)]
pub struct TestEntryRegistry {
    registrars: Vec<Arc<dyn TestEntryRegistrar>>,
}

impl TestEntryRegistry {
    /// An empty registry, leaving every token to generic resolution
    pub fn new() -> Self {
        Self::default()
    }

    /// File size and distance domains
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileSizeRegistrar);
        registry.register(DistanceRegistrar);
        registry
    }

    pub fn register<R: TestEntryRegistrar + 'static>(&mut self, registrar: R) {
        self.registrars.push(Arc::new(registrar));
    }

    pub fn is_empty(&self) -> bool {
        self.registrars.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.registrars.iter().map(|r| r.name()).collect()
    }

    /// Entry of the first registrar claiming the key or the value
    ///
    /// A claiming registrar that cannot build an entry yields a never-matching
    /// entry; `None` means nobody claimed the token.
    pub fn resolve(
        &self,
        key: Option<&str>,
        operator: Operator,
        value: &str,
    ) -> Option<Box<dyn TestEntry>> {
        let registrar = self.registrars.iter().find(|registrar| {
            key.is_some_and(|k| registrar.test_common_key(k)) || registrar.test_value(value)
        })?;

        match registrar.create(operator, value) {
            Some(entry) => {
                trace!(registrar = registrar.name(), %entry, "registrar claimed token");
                Some(entry)
            }
            None => {
                trace!(
                    registrar = registrar.name(),
                    value,
                    "registrar claimed token but could not build an entry"
                );
                Some(Box::new(ConstTestEntry::never()))
            }
        }
    }
}

impl fmt::Debug for TestEntryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestEntryRegistry")
            .field("registrars", &self.names())
            .finish()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: RwLock<TestEntryRegistry> =
        RwLock::new(TestEntryRegistry::with_defaults());
}

/// Adds a registrar to the process-wide registry
///
/// Meant for start-up; filters parsed earlier keep the entries they were built with.
pub fn register<R: TestEntryRegistrar + 'static>(registrar: R) {
    let mut registry = GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.register(registrar);
}

/// Snapshot of the process-wide registry
pub fn global() -> TestEntryRegistry {
    GLOBAL_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
