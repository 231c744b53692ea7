use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

use crate::error::{FilterError, FilterResult};

/// Serialization of an input file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Json,
    Yaml,
}

impl RecordFormat {
    /// `.yaml`/`.yml` is YAML, anything else JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => RecordFormat::Yaml,
            _ => RecordFormat::Json,
        }
    }
}

/// Parses a list of records; a single top-level object is a list of one
pub fn parse_records(content: &str, format: RecordFormat) -> FilterResult<Vec<JsonValue>> {
    let document: JsonValue = match format {
        RecordFormat::Json => serde_json::from_str(content)?,
        RecordFormat::Yaml => serde_yaml::from_str(content)?,
    };

    match document {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Object(_) => Ok(vec![document]),
        JsonValue::Null => Ok(Vec::new()),
        other => Err(FilterError::Input(format!(
            "Expected a list of records, found {}",
            other
        ))),
    }
}

pub fn load_records<P: AsRef<Path>>(path: P) -> FilterResult<Vec<JsonValue>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FilterError::Input(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path)?;
    parse_records(&content, RecordFormat::from_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(RecordFormat::from_path(Path::new("cars.YML")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("cars.yaml")), RecordFormat::Yaml);
        assert_eq!(RecordFormat::from_path(Path::new("cars.json")), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("cars")), RecordFormat::Json);
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(r#"[{"name": "a"}, {"name": "b"}]"#, RecordFormat::Json).unwrap();
        assert_eq!(records.len(), 2);

        let records = parse_records("- name: a\n  year: 1990\n", RecordFormat::Yaml).unwrap();
        assert_eq!(records[0]["year"], 1990);

        let records = parse_records(r#"{"name": "solo"}"#, RecordFormat::Json).unwrap();
        assert_eq!(records.len(), 1);

        assert!(matches!(
            parse_records("42", RecordFormat::Json),
            Err(FilterError::Input(_))
        ));
        assert!(matches!(
            parse_records("[", RecordFormat::Json),
            Err(FilterError::Json(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_records("/tmp/string_filter_missing_records.json");
        assert!(matches!(result, Err(FilterError::Input(_))));
    }

    #[test]
    fn test_load_yaml_file() {
        let path = "/tmp/string_filter_records_test.yaml";
        fs::write(path, "- name: Ferrari\n- name: Lotus\n").unwrap();

        let records = load_records(path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], "Lotus");

        fs::remove_file(path).ok();
    }
}
