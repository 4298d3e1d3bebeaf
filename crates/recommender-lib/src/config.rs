//! Recommender configuration

use crate::error::Result;
use crate::models::DEFAULT_TRAFFIC_TYPE;
use crate::session::LogLevel;
use serde::Deserialize;
use std::path::Path;

/// Defaults applied to `right_size` requests that leave them unset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecommenderConfig {
    /// Session output while waiting on a job
    #[serde(default)]
    pub log_level: LogLevel,

    /// Maximum job duration handed to the service
    #[serde(default)]
    pub job_duration_in_seconds: Option<u32>,

    /// Traffic type for load phases submitted without one
    #[serde(default = "default_traffic_type")]
    pub default_traffic_type: String,
}

fn default_traffic_type() -> String {
    DEFAULT_TRAFFIC_TYPE.to_string()
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            job_duration_in_seconds: None,
            default_traffic_type: default_traffic_type(),
        }
    }
}

impl RecommenderConfig {
    /// Load configuration from a file, falling back to defaults for missing keys
    ///
    /// The format is picked from the file extension (toml, json, yaml).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RecommenderConfig::default();
        assert_eq!(config.log_level, LogLevel::Verbose);
        assert_eq!(config.job_duration_in_seconds, None);
        assert_eq!(config.default_traffic_type, "PHASES");
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "log_level = \"Quiet\"").unwrap();
        writeln!(file, "job_duration_in_seconds = 7200").unwrap();

        let config = RecommenderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, LogLevel::Quiet);
        assert_eq!(config.job_duration_in_seconds, Some(7200));
        assert_eq!(config.default_traffic_type, "PHASES");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecommenderConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::error::RecommenderError::Config(_)));
    }
}
