//! # Aggregation Configuration
//!
//! Tunables for the event aggregator, loadable from YAML.
//!
//! ```rust
//! use of_stats::config::{AggregationConfig, NumericPolicy};
//!
//! let config = AggregationConfig::from_yaml_str("numeric_policy: lenient\n").unwrap();
//! assert_eq!(config.numeric_policy, NumericPolicy::Lenient);
//! assert_eq!(config.possession_snapshot_minute, 90);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// Minute from which a possession snapshot is taken as the final one.
pub const FULL_TIME_MINUTE: i64 = 90;

/// Stat columns of the match table, in the order features are emitted.
pub const DEFAULT_STATS: [&str; 8] = [
    "goal",
    "shoton",
    "shotoff",
    "foulcommit",
    "card",
    "cross",
    "corner",
    "possession",
];

/// How integer fields with non-numeric text are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NumericPolicy {
    /// Fail the whole match.
    #[default]
    Strict,
    /// Read the value as zero and keep going.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub numeric_policy: NumericPolicy,
    /// Possession snapshots with `elapsed` below this are ignored
    pub possession_snapshot_minute: i64,
    /// Stat kinds built by the batch layer when none are requested
    pub stats: Vec<String>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            numeric_policy: NumericPolicy::Strict,
            possession_snapshot_minute: FULL_TIME_MINUTE,
            stats: DEFAULT_STATS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AggregationConfig {
    /// Default settings with non-numeric fields coerced instead of rejected.
    pub fn lenient() -> Self {
        Self {
            numeric_policy: NumericPolicy::Lenient,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.possession_snapshot_minute < 0 {
            return Err(StatsError::Config(format!(
                "possession_snapshot_minute must be non-negative, got {}",
                self.possession_snapshot_minute
            )));
        }
        if let Some(blank) = self.stats.iter().find(|s| s.trim().is_empty()) {
            return Err(StatsError::Config(format!(
                "stat names must not be blank, got '{}'",
                blank
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_strict_full_time() {
        let config = AggregationConfig::default();
        assert_eq!(config.numeric_policy, NumericPolicy::Strict);
        assert_eq!(config.possession_snapshot_minute, 90);
        assert_eq!(config.stats.len(), DEFAULT_STATS.len());
        assert!(config.stats.iter().any(|s| s == "card"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AggregationConfig::from_yaml_str("stats: [card, corner]\n").unwrap();
        assert_eq!(config.stats, vec!["card".to_string(), "corner".to_string()]);
        assert_eq!(config.numeric_policy, NumericPolicy::Strict);
        assert_eq!(config.possession_snapshot_minute, 90);
    }

    #[test]
    fn test_negative_snapshot_minute_rejected() {
        let err = AggregationConfig::from_yaml_str("possession_snapshot_minute: -1\n")
            .unwrap_err();
        assert!(matches!(err, StatsError::Config(_)));
    }

    #[test]
    fn test_blank_stat_rejected() {
        let err = AggregationConfig::from_yaml_str("stats: [card, '  ']\n").unwrap_err();
        assert!(matches!(err, StatsError::Config(_)));
    }

    #[test]
    fn test_unknown_policy_is_yaml_error() {
        let err = AggregationConfig::from_yaml_str("numeric_policy: sloppy\n").unwrap_err();
        assert!(matches!(err, StatsError::Yaml(_)));
    }

    #[test]
    fn test_bundled_config_matches_default() {
        let yaml = include_str!("../../../config/aggregation.yaml");
        let config = AggregationConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config, AggregationConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "numeric_policy: lenient").unwrap();
        writeln!(file, "possession_snapshot_minute: 85").unwrap();

        let config = AggregationConfig::load(file.path()).unwrap();
        assert_eq!(config.numeric_policy, NumericPolicy::Lenient);
        assert_eq!(config.possession_snapshot_minute, 85);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = AggregationConfig::load(Path::new("/nonexistent/of_stats.yaml")).unwrap_err();
        assert!(matches!(err, StatsError::Io(_)));
    }
}
