use std::fmt;

use crate::entry::{StringMatchMode, TestEntry};
use crate::parser::{parse_filter, FilterNode};
use crate::registry::TestEntryRegistry;

/// Resolves a key on an object and runs the entry against that field
pub trait Tester<T: ?Sized> {
    /// `key` is `None` for bare terms, which test the object's default field
    fn test(&self, obj: &T, key: Option<&str>, entry: &dyn TestEntry) -> bool;

    /// Runs a `key(...)` sub-filter against a nested object; no match by default
    fn test_child(&self, _obj: &T, _key: &str, _filter: &FilterNode) -> bool {
        false
    }
}

impl<T, F> Tester<T> for F
where
    T: ?Sized,
    F: Fn(&T, Option<&str>, &dyn TestEntry) -> bool,
{
    fn test(&self, obj: &T, key: Option<&str>, entry: &dyn TestEntry) -> bool {
        self(obj, key, entry)
    }
}

/// Parse-time options
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Mode for `key:value` terms; `key=value` always matches completely
    pub string_match_mode: StringMatchMode,
    /// Substring matches ignore word starts
    pub simple_matching: bool,
    pub case_sensitive: bool,
    /// Result of a query without any usable term
    pub empty_matches_all: bool,
    /// Registrars to consult; a snapshot of the global registry when `None`
    pub registry: Option<TestEntryRegistry>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            string_match_mode: StringMatchMode::IncludedWithin,
            simple_matching: false,
            case_sensitive: false,
            empty_matches_all: true,
            registry: None,
        }
    }
}

impl FilterOptions {
    pub fn string_match_mode(mut self, mode: StringMatchMode) -> Self {
        self.string_match_mode = mode;
        self
    }

    pub fn simple_matching(mut self, simple: bool) -> Self {
        self.simple_matching = simple;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn empty_matches_all(mut self, matches_all: bool) -> Self {
        self.empty_matches_all = matches_all;
        self
    }

    pub fn registry(mut self, registry: TestEntryRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// A parsed query bound to the tester that evaluates it
///
/// Parsing happens once in [`Filter::create`]; the tree is immutable, so a
/// filter with a `Sync` tester can be shared between threads.
pub struct Filter<R> {
    tester: R,
    root: FilterNode,
    query: String,
}

impl<R> Filter<R> {
    pub fn create(tester: R, query: &str, options: &FilterOptions) -> Self {
        Self {
            root: parse_filter(query, options),
            query: query.to_string(),
            tester,
        }
    }

    /// Whether `obj` passes the filter
    pub fn test<T: ?Sized>(&self, obj: &T) -> bool
    where
        R: Tester<T>,
    {
        self.root.test(&self.tester, obj)
    }

    /// Items passing the filter, in their original order
    pub fn filter_items<'a, T: 'a>(&self, items: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        R: Tester<T>,
    {
        items.into_iter().filter(|item| self.test(*item)).collect()
    }

    pub fn root(&self) -> &FilterNode {
        &self.root
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a change of `key` could change the result for some object
    pub fn is_affected_by(&self, key: &str) -> bool {
        self.root.is_affected_by(key)
    }
}

impl<R> fmt::Display for Filter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl<R> fmt::Debug for Filter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("query", &self.query)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Value;
    use std::cell::Cell;

    struct Point {
        x: f64,
        label: &'static str,
    }

    struct PointTester;

    impl Tester<Point> for PointTester {
        fn test(&self, obj: &Point, key: Option<&str>, entry: &dyn TestEntry) -> bool {
            match key {
                Some("x") => entry.test(Value::Number(obj.x)),
                Some("label") | None => entry.test(Value::Text(obj.label)),
                Some(_) => false,
            }
        }
    }

    fn options() -> FilterOptions {
        FilterOptions::default().registry(TestEntryRegistry::new())
    }

    #[test]
    fn test_struct_tester() {
        let filter = Filter::create(PointTester, "x>1 & origin", &options());
        assert!(filter.test(&Point { x: 2.0, label: "origin" }));
        assert!(!filter.test(&Point { x: 0.5, label: "origin" }));
        assert!(!filter.test(&Point { x: 2.0, label: "edge" }));
    }

    #[test]
    fn test_closure_tester() {
        let filter = Filter::create(
            |value: &f64, _key: Option<&str>, entry: &dyn TestEntry| entry.test(Value::Number(*value)),
            ">=10 & <20",
            &options(),
        );
        let values = [5.0, 10.0, 15.0, 25.0];
        assert_eq!(filter.filter_items(&values), vec![&10.0, &15.0]);
    }

    #[test]
    fn test_short_circuit() {
        let calls = Cell::new(0);
        let counting = |_: &(), _: Option<&str>, entry: &dyn TestEntry| {
            calls.set(calls.get() + 1);
            entry.test(Value::Bool(true))
        };

        let filter = Filter::create(&counting, "off & a & b", &options());
        assert!(!filter.test(&()));
        assert_eq!(calls.get(), 1);

        calls.set(0);
        let filter = Filter::create(&counting, "on | a | b", &options());
        assert!(filter.test(&()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_is_affected_by() {
        let filter = Filter::create(PointTester, "x>1 & !label:edge", &options());
        assert!(filter.is_affected_by("x"));
        assert!(filter.is_affected_by("LABEL"));
        assert!(!filter.is_affected_by("y"));

        let filter = Filter::create(PointTester, "origin", &options());
        assert!(filter.is_affected_by("anything"));
    }

    #[test]
    fn test_display_and_query() {
        let filter = Filter::create(PointTester, "x>1 | x<-1", &options());
        assert_eq!(filter.query(), "x>1 | x<-1");
        assert_eq!(filter.to_string(), "(x:>1 | x:<-1)");
    }
}
