use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::{Error, InternalResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Significant digits used when formatting inexact values.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Prefer exact fractions over decimals when both are available.
    #[serde(default = "default_true")]
    pub exact: bool,

    #[serde(default = "default_true")]
    pub auto_simplify: bool,

    /// Keep the full step trace; otherwise only the final step is returned.
    #[serde(default = "default_true")]
    pub show_steps: bool,

    #[serde(default = "default_max_expression_length")]
    pub max_expression_length: usize,

    #[serde(default = "default_max_variables")]
    pub max_variables: usize,

    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_max_variable_name_length")]
    pub max_variable_name_length: usize,

    /// Report exceeded limits as validation errors instead of warnings.
    #[serde(default)]
    pub strict_limits: bool,

    #[serde(default = "default_cache_ttl", with = "duration_ms")]
    pub cache_ttl: Duration,

    #[serde(default)]
    pub numeric: NumericConfig,
}

/// Bounds for the numeric root finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    #[serde(default = "default_search_min")]
    pub search_min: f64,

    #[serde(default = "default_search_max")]
    pub search_max: f64,

    /// Sample points of the sign-change scan.
    #[serde(default = "default_samples")]
    pub samples: usize,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            search_min: default_search_min(),
            search_max: default_search_max(),
            samples: default_samples(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            exact: default_true(),
            auto_simplify: default_true(),
            show_steps: default_true(),
            max_expression_length: default_max_expression_length(),
            max_variables: default_max_variables(),
            max_complexity: default_max_complexity(),
            max_tokens: default_max_tokens(),
            max_variable_name_length: default_max_variable_name_length(),
            strict_limits: false,
            cache_ttl: default_cache_ttl(),
            numeric: NumericConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> InternalResult<Self> {
        from_str(s)
    }

    pub fn validate(&self) -> InternalResult<()> {
        if self.numeric.search_min >= self.numeric.search_max {
            return Err(Error::Config(format!(
                "numeric.search_min ({}) must be below numeric.search_max ({})",
                self.numeric.search_min, self.numeric.search_max
            )));
        }
        if self.numeric.samples < 2 {
            return Err(Error::Config("numeric.samples must be at least 2".to_string()));
        }
        if !(self.numeric.tolerance > 0.0) {
            return Err(Error::Config("numeric.tolerance must be positive".to_string()));
        }
        Ok(())
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_precision() -> usize {
    10
}
fn default_true() -> bool {
    true
}
fn default_max_expression_length() -> usize {
    1000
}
fn default_max_variables() -> usize {
    10
}
fn default_max_complexity() -> usize {
    100
}
fn default_max_tokens() -> usize {
    500
}
fn default_max_variable_name_length() -> usize {
    20
}
fn default_cache_ttl() -> Duration {
    Duration::from_secs(300)
}
fn default_max_iterations() -> usize {
    100
}
fn default_tolerance() -> f64 {
    1e-12
}
fn default_search_min() -> f64 {
    -100.0
}
fn default_search_max() -> f64 {
    100.0
}
fn default_samples() -> usize {
    2000
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let config = EngineConfig::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.precision, 10);
        assert!(config.show_steps);
        assert_eq!(config.numeric.samples, 2000);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_str(
            r#"{"precision": 4, "strict_limits": true, "cache_ttl": 1500, "numeric": {"search_max": 10.0}}"#,
        )
        .unwrap();
        assert_eq!(config.precision, 4);
        assert!(config.strict_limits);
        assert_eq!(config.cache_ttl, Duration::from_millis(1500));
        assert_eq!(config.numeric.search_max, 10.0);
        assert_eq!(config.numeric.search_min, -100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            EngineConfig::from_str("{\"precision\": \"high\"}"),
            Err(Error::Config(_))
        ));
        let config = EngineConfig::from_str(r#"{"numeric": {"search_min": 5.0, "search_max": 1.0}}"#)
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(json.contains("\"cache_ttl\":300000"));
    }
}
