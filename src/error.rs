use std::fmt;

/// Errors of the outer surfaces (configuration, input files, command line)
///
/// Parsing and evaluating queries never fails; only loading things does.
#[derive(Debug)]
pub enum FilterError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    Configuration(String),
    Input(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(e) => write!(f, "I/O error: {}", e),
            FilterError::Json(e) => write!(f, "JSON error: {}", e),
            FilterError::Yaml(e) => write!(f, "YAML error: {}", e),
            FilterError::Configuration(e) => write!(f, "Configuration error: {}", e),
            FilterError::Input(e) => write!(f, "Input error: {}", e),
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(e) => Some(e),
            FilterError::Json(e) => Some(e),
            FilterError::Yaml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FilterError {
    fn from(err: std::io::Error) -> Self {
        FilterError::Io(err)
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::Json(err)
    }
}

impl From<serde_yaml::Error> for FilterError {
    fn from(err: serde_yaml::Error) -> Self {
        FilterError::Yaml(err)
    }
}

pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_and_source() {
        let err = FilterError::Configuration("missing mode".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing mode");
        assert!(err.source().is_none());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FilterError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FilterError::from(json_err);
        assert!(matches!(err, FilterError::Json(_)));
    }
}
