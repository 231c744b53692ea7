use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entry::StringMatchMode;
use crate::error::{FilterError, FilterResult};
use crate::filter::FilterOptions;
use crate::tester::json_tester::DEFAULT_KEY;

lazy_static! {
    static ref ENV_VAR: Regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("valid env var regex");
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilterConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Field tested by terms without a key
    #[serde(default = "default_key")]
    pub default_key: String,
    #[serde(default = "default_empty_matches_all")]
    pub empty_matches_all: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MatchingConfig {
    #[serde(default)]
    pub mode: StringMatchMode,
    /// Plain substring search instead of word-start matching
    #[serde(default)]
    pub simple: bool,
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_empty_matches_all() -> bool {
    true
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            matching: MatchingConfig::default(),
            default_key: default_key(),
            empty_matches_all: default_empty_matches_all(),
        }
    }
}

impl FilterConfig {
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> FilterResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(FilterError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            FilterError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content).map_err(|e| {
            FilterError::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parses YAML after expanding `${VAR}` and `${VAR:-default}`
    pub fn from_yaml_str(content: &str) -> FilterResult<Self> {
        let expanded = Self::expand_env_vars(content).map_err(FilterError::Configuration)?;
        let config: FilterConfig = serde_yaml::from_str(&expanded)?;

        if config.default_key.trim().is_empty() {
            return Err(FilterError::Configuration(
                "default_key must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn to_options(&self) -> FilterOptions {
        FilterOptions::default()
            .string_match_mode(self.matching.mode)
            .simple_matching(self.matching.simple)
            .case_sensitive(self.matching.case_sensitive)
            .empty_matches_all(self.empty_matches_all)
    }

    /// Substitutes `${VAR}` and `${VAR:-default}`; an unset variable without a
    /// default is an error
    fn expand_env_vars(content: &str) -> Result<String, String> {
        let mut expanded = String::with_capacity(content.len());
        let mut last = 0;

        for caps in ENV_VAR.captures_iter(content) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value = match (std::env::var(name.as_str()), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => {
                    return Err(format!(
                        "Environment variable {} not found and no default provided",
                        name.as_str()
                    ));
                }
            };
            expanded.push_str(&content[last..whole.start()]);
            expanded.push_str(&value);
            last = whole.end();
        }

        expanded.push_str(&content[last..]);
        Ok(expanded)
    }
}
