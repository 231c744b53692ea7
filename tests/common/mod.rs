#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};
use string_filter::{FilterNode, FilterOptions, TestEntry, TestEntryRegistry, Tester, Value};

#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub length: f64,
    pub pits: i64,
}

#[derive(Debug, Clone)]
pub struct Car {
    pub name: String,
    pub shader: String,
    pub material: String,
    pub size: u64,
    pub year: i64,
    pub power: f64,
    pub released: DateTime<Utc>,
    pub lap_time: Duration,
    pub tags: Vec<String>,
    pub track: Option<Track>,
}

/// Field lookup for [`Car`]; the `explode` key panics so tests can prove a leaf was skipped
pub struct CarTester;

impl Tester<Car> for CarTester {
    fn test(&self, obj: &Car, key: Option<&str>, entry: &dyn TestEntry) -> bool {
        match key.map(|k| k.to_lowercase()).as_deref() {
            None | Some("name") => entry.test(Value::Text(&obj.name)),
            Some("shader") => entry.test(Value::Text(&obj.shader)),
            Some("material") => entry.test(Value::Text(&obj.material)),
            Some("size") => entry.test(Value::from(obj.size)),
            Some("year") => entry.test(Value::from(obj.year)),
            Some("power") => entry.test(Value::Number(obj.power)),
            Some("released") => entry.test(Value::Instant(obj.released)),
            Some("laptime") => entry.test(Value::Duration(obj.lap_time)),
            Some("tags") => obj.tags.iter().any(|t| entry.test(Value::Text(t))),
            Some("explode") => panic!("leaf should have been short-circuited"),
            Some(_) => false,
        }
    }

    fn test_child(&self, obj: &Car, key: &str, filter: &FilterNode) -> bool {
        match (key, &obj.track) {
            ("track", Some(track)) => filter.test(&TrackTester, track),
            _ => false,
        }
    }
}

pub struct TrackTester;

impl Tester<Track> for TrackTester {
    fn test(&self, obj: &Track, key: Option<&str>, entry: &dyn TestEntry) -> bool {
        match key {
            None | Some("name") => entry.test(Value::Text(&obj.name)),
            Some("length") => entry.test(Value::Number(obj.length)),
            Some("pits") => entry.test(Value::from(obj.pits)),
            Some(_) => false,
        }
    }
}

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn sample_cars() -> Vec<Car> {
    vec![
        Car {
            name: "Ferrari 458 Italia".to_string(),
            shader: "ksPerPixel".to_string(),
            material: "body_paint".to_string(),
            size: 15_000_000,
            year: 2010,
            power: 570.0,
            released: date(2010, 3, 15),
            lap_time: Duration::minutes(95),
            tags: vec!["street".to_string(), "italy".to_string()],
            track: Some(Track {
                name: "Monza".to_string(),
                length: 5793.0,
                pits: 12,
            }),
        },
        Car {
            name: "Lotus 49".to_string(),
            shader: "ksTree".to_string(),
            material: "dry_grass".to_string(),
            size: 5_000_000,
            year: 1967,
            power: 410.0,
            released: date(1967, 6, 4),
            lap_time: Duration::minutes(110),
            tags: vec!["race".to_string(), "vintage".to_string()],
            track: Some(Track {
                name: "Zandvoort".to_string(),
                length: 4259.0,
                pits: 8,
            }),
        },
        Car {
            name: "Tree Prop".to_string(),
            shader: "ksTree".to_string(),
            material: "grass_dry".to_string(),
            size: 120_000,
            year: 2019,
            power: 0.0,
            released: date(2019, 1, 1),
            lap_time: Duration::zero(),
            tags: Vec::new(),
            track: None,
        },
    ]
}

/// The same cars as JSON documents
pub fn sample_cars_json() -> Vec<JsonValue> {
    vec![
        json!({
            "name": "Ferrari 458 Italia",
            "shader": "ksPerPixel",
            "material": "body_paint",
            "size": 15_000_000,
            "year": 2010,
            "power": 570.0,
            "released": "2010-03-15 12:00",
            "lapTime": "1:35",
            "tags": ["street", "italy"],
            "track": { "name": "Monza", "length": 5793, "pits": 12 }
        }),
        json!({
            "name": "Lotus 49",
            "shader": "ksTree",
            "material": "dry_grass",
            "size": 5_000_000,
            "year": 1967,
            "power": 410.0,
            "released": "1967-06-04 12:00",
            "lapTime": "1:50",
            "tags": ["race", "vintage"],
            "track": { "name": "Zandvoort", "length": 4259, "pits": 8 }
        }),
        json!({
            "name": "Tree Prop",
            "shader": "ksTree",
            "material": "grass_dry",
            "size": 120_000,
            "year": 2019,
            "power": 0.0,
            "released": "2019-01-01 12:00",
            "lapTime": "0:00",
            "tags": [],
            "track": null
        }),
    ]
}

/// Options with an explicit default registry, independent of global registrations
pub fn test_options() -> FilterOptions {
    FilterOptions::default().registry(TestEntryRegistry::with_defaults())
}
