//! Picks the test-entry type for a term
//!
//! Resolution order: regex marker, empty value, registry claim, wildcards,
//! then by operator family (relational, `≈`, equality) and value shape.

use tracing::warn;

use super::term::TermSpec;
use crate::entry::{
    BoolTestEntry, ConstTestEntry, DateTimeTestEntry, DurationTestEntry, IntTestEntry,
    NumberTestEntry, Operator, RegexTestEntry, StringMatchMode, StringTestEntry, TestEntry,
};
use crate::filter::FilterOptions;
use crate::registry::TestEntryRegistry;
use crate::utils;

/// Builds the entry for one term; never fails, unusable terms never match
pub fn create_entry(
    term: &TermSpec,
    options: &FilterOptions,
    registry: &TestEntryRegistry,
) -> Box<dyn TestEntry> {
    let case_insensitive = !options.case_sensitive;
    let value = term.value.as_str();

    if term.regex {
        return match RegexTestEntry::new(value, case_insensitive) {
            Ok(entry) => Box::new(entry),
            Err(e) => {
                warn!(pattern = value, error = %e, "Invalid regex in filter; term never matches");
                Box::new(ConstTestEntry::never())
            }
        };
    }

    if value.is_empty() {
        return if term.operator.is_relational() {
            Box::new(ConstTestEntry::never())
        } else {
            // "field is set"
            Box::new(BoolTestEntry::new(true))
        };
    }

    if let Some(entry) = registry.resolve(term.key.as_deref(), term.operator, value) {
        return entry;
    }

    if term.operator == Operator::Equal && utils::has_wildcards(value) {
        let mode = string_mode(term, options);
        return match RegexTestEntry::from_wildcard(value, mode, case_insensitive) {
            Ok(entry) => Box::new(entry),
            Err(_) => Box::new(ConstTestEntry::never()),
        };
    }

    match term.operator {
        Operator::SimilarTo => match utils::parse_number(value) {
            Some(number) => Box::new(NumberTestEntry::new(Operator::SimilarTo, number)),
            None => Box::new(StringTestEntry::with_simple_matching(
                value,
                StringMatchMode::IncludedWithin,
                case_insensitive,
                true,
            )),
        },
        Operator::Equal => create_equality_entry(term, options, case_insensitive),
        operator => create_relational_entry(operator, value),
    }
}

fn create_relational_entry(operator: Operator, value: &str) -> Box<dyn TestEntry> {
    if let Some(entry) = DateTimeTestEntry::parse(operator, value) {
        return Box::new(entry);
    }
    if let Some(entry) = DurationTestEntry::parse(operator, value) {
        return Box::new(entry);
    }
    if let Some(integer) = utils::parse_integer(value) {
        return Box::new(IntTestEntry::new(operator, integer));
    }
    match utils::parse_flexible_number(value) {
        Some(number) => Box::new(NumberTestEntry::new(operator, number)),
        None => Box::new(ConstTestEntry::never()),
    }
}

fn create_equality_entry(
    term: &TermSpec,
    options: &FilterOptions,
    case_insensitive: bool,
) -> Box<dyn TestEntry> {
    let value = term.value.as_str();

    if let Some(entry) = DateTimeTestEntry::parse(Operator::Equal, value) {
        return Box::new(entry);
    }
    if utils::looks_like_clock(value) {
        if let Some(entry) = DurationTestEntry::parse(Operator::Equal, value) {
            return Box::new(entry);
        }
    }

    Box::new(StringTestEntry::with_simple_matching(
        value,
        string_mode(term, options),
        case_insensitive,
        options.simple_matching,
    ))
}

fn string_mode(term: &TermSpec, options: &FilterOptions) -> StringMatchMode {
    if term.explicit_operator {
        StringMatchMode::CompleteMatch
    } else {
        options.string_match_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Value;
    use crate::parser::term::parse_term;

    fn entry(raw: &str) -> Box<dyn TestEntry> {
        create_entry(
            &parse_term(raw),
            &FilterOptions::default(),
            &TestEntryRegistry::with_defaults(),
        )
    }

    #[test]
    fn test_regex_and_invalid_regex() {
        let e = entry("material:~grass$");
        assert!(e.test(Value::Text("dry_grass")));
        assert!(!e.test(Value::Text("grass_dry")));

        let e = entry("material:~(unclosed");
        assert_eq!(e.to_string(), "<false>");
        assert!(!e.test(Value::Text("(unclosed")));
    }

    #[test]
    fn test_registry_claims() {
        let e = entry("size>10mb");
        assert_eq!(e.to_string(), ">10000000b");
        assert!(e.test(Value::Number(15_000_000.0)));

        let e = entry("length:>2km");
        assert!(e.test(Value::Number(2500.0)));

        let e = entry("size:huge");
        assert_eq!(e.to_string(), "<false>");
    }

    #[test]
    fn test_empty_value() {
        let e = entry("skin:");
        assert!(e.test(Value::Text("red")));
        assert!(!e.test(Value::Text("")));

        let e = entry("year>");
        assert_eq!(e.to_string(), "<false>");
    }

    #[test]
    fn test_wildcards() {
        let e = entry("name:ks*Tree");
        assert!(e.test(Value::Text("ksBigTree")));

        let e = entry("name=k?");
        assert!(e.test(Value::Text("ks")));
        assert!(!e.test(Value::Text("kss")));
    }

    #[test]
    fn test_relational_shapes() {
        assert!(entry("year>1990").test(Value::Number(1991.0)));
        assert!(entry("power<=500.5").test(Value::Number(500.5)));
        assert!(entry("time<1:30").test(Value::Text("1:29")));
        assert!(entry("date<2020-01-01").test(Value::Text("2019-12-31")));
        assert!(entry("weight>100 kg").test(Value::Number(150.0)));
        assert_eq!(entry("year>later").to_string(), "<false>");
    }

    #[test]
    fn test_similar() {
        let e = entry("power≈500");
        assert!(e.test(Value::Number(530.0)));
        assert!(!e.test(Value::Number(600.0)));

        let e = entry("name≈rari");
        assert!(e.test(Value::Text("Ferrari")));
    }

    #[test]
    fn test_equality_shapes() {
        let e = entry("date:2020-03-15");
        assert!(e.test(Value::Text("2020-03-15")));

        let e = entry("time:1:30");
        assert!(e.test(Value::Text("90min")));

        let e = entry("name:ferr");
        assert!(e.test(Value::Text("Ferrari")));

        let e = entry("name=ferr");
        assert!(!e.test(Value::Text("Ferrari")));
        assert!(entry("name=ferrari").test(Value::Text("Ferrari")));
    }

    #[test]
    fn test_case_sensitive_option() {
        let options = FilterOptions::default().case_sensitive(true);
        let e = create_entry(
            &parse_term("name=Ferrari"),
            &options,
            &TestEntryRegistry::new(),
        );
        assert!(e.test(Value::Text("Ferrari")));
        assert!(!e.test(Value::Text("ferrari")));
    }
}
