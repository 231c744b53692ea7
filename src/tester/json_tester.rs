use serde_json::{Map, Value as JsonValue};

use crate::entry::{TestEntry, Value};
use crate::filter::Tester;
use crate::parser::FilterNode;

/// Key tested by bare terms when nothing else is configured
pub const DEFAULT_KEY: &str = "name";

/// Tester for `serde_json` documents
///
/// Keys are matched case-insensitively and may be dot paths (`specs.power`).
/// A path crossing an array fans out over its elements, and a field holding an
/// array matches when any element does. Absent and `null` fields never match.
#[derive(Debug, Clone)]
pub struct JsonTester {
    default_key: String,
}

impl Default for JsonTester {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonTester {
    pub fn new() -> Self {
        Self::with_default_key(DEFAULT_KEY)
    }

    pub fn with_default_key(key: impl Into<String>) -> Self {
        Self {
            default_key: key.into(),
        }
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}

fn get_ignore_case<'a>(map: &'a Map<String, JsonValue>, key: &str) -> Option<&'a JsonValue> {
    map.get(key).or_else(|| {
        let lower = key.to_lowercase();
        map.iter()
            .find(|(k, _)| k.to_lowercase() == lower)
            .map(|(_, v)| v)
    })
}

/// All values reachable through a dot path
fn resolve_path<'a>(obj: &'a JsonValue, path: &str) -> Vec<&'a JsonValue> {
    let mut current = vec![obj];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                JsonValue::Object(map) => next.extend(get_ignore_case(map, segment)),
                JsonValue::Array(items) => next.extend(
                    items
                        .iter()
                        .filter_map(|item| item.as_object())
                        .filter_map(|map| get_ignore_case(map, segment)),
                ),
                _ => {}
            }
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }
    current
}

fn test_value(value: &JsonValue, entry: &dyn TestEntry) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => entry.test(Value::Bool(*b)),
        JsonValue::Number(n) => n.as_f64().is_some_and(|x| entry.test(Value::Number(x))),
        JsonValue::String(s) => entry.test(Value::Text(s)),
        JsonValue::Array(items) => items.iter().any(|item| test_value(item, entry)),
        // only "is set" style tests apply to whole objects
        JsonValue::Object(map) => entry.test(Value::Bool(!map.is_empty())),
    }
}

impl Tester<JsonValue> for JsonTester {
    fn test(&self, obj: &JsonValue, key: Option<&str>, entry: &dyn TestEntry) -> bool {
        match (key, obj) {
            // bare terms inside a child filter over plain values
            (None, JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_)) => {
                test_value(obj, entry)
            }
            _ => {
                let key = key.unwrap_or(&self.default_key);
                resolve_path(obj, key)
                    .into_iter()
                    .any(|value| test_value(value, entry))
            }
        }
    }

    fn test_child(&self, obj: &JsonValue, key: &str, filter: &FilterNode) -> bool {
        resolve_path(obj, key).into_iter().any(|value| match value {
            JsonValue::Null => false,
            JsonValue::Array(items) => items.iter().any(|item| filter.test(self, item)),
            other => filter.test(self, other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{BoolTestEntry, NumberTestEntry, Operator, StringMatchMode, StringTestEntry};
    use serde_json::json;

    fn text(pattern: &str) -> StringTestEntry {
        StringTestEntry::new(pattern, StringMatchMode::CompleteMatch, true)
    }

    #[test]
    fn test_default_key_and_case_insensitive_lookup() {
        let car = json!({ "Name": "Ferrari 458", "year": 2010 });
        let tester = JsonTester::new();
        assert!(tester.test(&car, None, &text("ferrari 458")));
        assert!(tester.test(&car, Some("YEAR"), &NumberTestEntry::new(Operator::More, 2000.0)));

        let tester = JsonTester::with_default_key("year");
        assert!(tester.test(&car, None, &NumberTestEntry::new(Operator::Equal, 2010.0)));
    }

    #[test]
    fn test_dot_paths_and_arrays() {
        let car = json!({
            "specs": { "power": 570 },
            "tags": ["street", "race"],
            "tyres": [{ "compound": "soft" }, { "compound": "hard" }]
        });
        let tester = JsonTester::new();
        let power = NumberTestEntry::new(Operator::MoreEqual, 500.0);
        assert!(tester.test(&car, Some("specs.power"), &power));
        assert!(tester.test(&car, Some("tags"), &text("race")));
        assert!(tester.test(&car, Some("tyres.compound"), &text("hard")));
        assert!(!tester.test(&car, Some("tyres.compound"), &text("wet")));
    }

    #[test]
    fn test_absent_and_null_never_match() {
        let car = json!({ "name": null });
        let tester = JsonTester::new();
        let set = BoolTestEntry::new(true);
        let unset = BoolTestEntry::new(false);
        assert!(!tester.test(&car, Some("name"), &set));
        assert!(!tester.test(&car, Some("name"), &unset));
        assert!(!tester.test(&car, Some("missing"), &unset));
        assert!(!tester.test(&car, Some("name.first"), &set));
    }

    #[test]
    fn test_object_counts_as_set() {
        let car = json!({ "specs": { "power": 570 }, "extras": {} });
        let tester = JsonTester::new();
        let set = BoolTestEntry::new(true);
        assert!(tester.test(&car, Some("specs"), &set));
        assert!(!tester.test(&car, Some("extras"), &set));
    }
}
