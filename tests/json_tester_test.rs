use serde_json::json;
use std::fs;
use string_filter::config::FilterConfig;
use string_filter::records::load_records;
use string_filter::{Filter, JsonTester, StringMatchMode};

mod common;

use common::{sample_cars_json, test_options};

fn names(filter: &Filter<JsonTester>, records: &[serde_json::Value]) -> Vec<String> {
    filter
        .filter_items(records)
        .into_iter()
        .filter_map(|r| r["name"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_dot_paths_reach_nested_fields() {
    let cars = sample_cars_json();

    let filter = Filter::create(JsonTester::new(), "track.name:monza", &test_options());
    assert_eq!(names(&filter, &cars), vec!["Ferrari 458 Italia"]);

    let filter = Filter::create(JsonTester::new(), "track.length<5km", &test_options());
    assert_eq!(names(&filter, &cars), vec!["Lotus 49"]);
}

#[test]
fn test_presence_checks() {
    let cars = sample_cars_json();

    let filter = Filter::create(JsonTester::new(), "track:", &test_options());
    assert_eq!(names(&filter, &cars), vec!["Ferrari 458 Italia", "Lotus 49"]);

    // absent fields never match
    let filter = Filter::create(JsonTester::new(), "missing:", &test_options());
    assert!(names(&filter, &cars).is_empty());
}

#[test]
fn test_child_filter_over_array_of_objects() {
    let teams = vec![
        json!({ "name": "scuderia", "drivers": [{ "name": "Alonso", "wins": 32 }, { "name": "Massa", "wins": 11 }] }),
        json!({ "name": "minardi", "drivers": [{ "name": "Webber", "wins": 0 }] }),
    ];

    let filter = Filter::create(JsonTester::new(), "drivers(wins>20 & alo)", &test_options());
    assert_eq!(names(&filter, &teams), vec!["scuderia"]);

    // each element is tested on its own
    let filter = Filter::create(JsonTester::new(), "drivers(wins>20 & massa)", &test_options());
    assert!(names(&filter, &teams).is_empty());

    let filter = Filter::create(JsonTester::new(), "tags(race)", &test_options());
    assert_eq!(names(&filter, &sample_cars_json()), vec!["Lotus 49"]);
}

#[test]
fn test_booleans_and_case_sensitivity() {
    let records = vec![
        json!({ "name": "Alpha", "active": true }),
        json!({ "name": "beta", "active": false }),
    ];

    let filter = Filter::create(JsonTester::new(), "active:yes", &test_options());
    assert_eq!(names(&filter, &records), vec!["Alpha"]);

    let filter = Filter::create(JsonTester::new(), "active:off", &test_options());
    assert_eq!(names(&filter, &records), vec!["beta"]);

    let options = test_options().case_sensitive(true);
    let filter = Filter::create(JsonTester::new(), "alpha", &options);
    assert!(names(&filter, &records).is_empty());
    let filter = Filter::create(JsonTester::new(), "Alpha", &options);
    assert_eq!(names(&filter, &records), vec!["Alpha"]);
}

#[test]
fn test_config_and_records_from_files() {
    let config_path = "/tmp/string_filter_json_tester_config.yaml";
    let records_path = "/tmp/string_filter_json_tester_records.json";

    fs::write(
        config_path,
        "matching:\n  mode: starts_with\ndefault_key: title\n",
    )
    .unwrap();
    fs::write(
        records_path,
        r#"[{"title": "Monza GP"}, {"title": "Grand Prix of Monza"}]"#,
    )
    .unwrap();

    let config = FilterConfig::load_from_file(config_path).unwrap();
    assert_eq!(config.matching.mode, StringMatchMode::StartsWith);

    let records = load_records(records_path).unwrap();
    let filter = Filter::create(
        JsonTester::with_default_key(config.default_key.clone()),
        "monza",
        &config.to_options(),
    );
    let matched = filter.filter_items(&records);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["title"], "Monza GP");

    fs::remove_file(config_path).unwrap();
    fs::remove_file(records_path).unwrap();
}
