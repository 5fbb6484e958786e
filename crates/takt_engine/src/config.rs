//! Analysis configuration loading and validation.
//!
//! Configuration reaches the engine either as a TOML `[analysis]` table
//! or through the string key/value API used by driver front-ends.
//! Everything is validated at setup; a bad value never reaches a
//! worker.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Key of the split-threshold setting.
pub const SPLIT_THRESHOLD_KEY: &str = "split-threshold";
/// Key of the worker-count setting.
pub const WORKERS_KEY: &str = "workers";
/// Key of the statistics-collection flag.
pub const STATS_KEY: &str = "stats";

/// Tunable parameters of one timing analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    /// Hint to the step front-end: emit a split marker at least every
    /// this many event-bearing steps. Keeps intermediate diagrams
    /// small; no precision is lost.
    pub split_threshold: u32,

    /// Worker threads for edge jobs. `0` selects sequential processing
    /// in program order.
    pub workers: usize,

    /// Collect per-matrix statistics and dump them at teardown.
    pub stats: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            split_threshold: 12,
            workers: default_workers(),
            stats: false,
        }
    }
}

/// One worker per hardware thread.
fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

impl AnalysisConfig {
    /// Loads the `[analysis]` table of a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// Parses the `[analysis]` table from TOML source.
    ///
    /// A missing table yields the defaults; unknown keys are rejected.
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        #[derive(Default, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct ConfigFile {
            #[serde(default)]
            analysis: AnalysisConfig,
        }
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(file.analysis)
    }

    /// Sets one recognized key from its string rendering.
    ///
    /// Unknown keys and unparsable values are rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            SPLIT_THRESHOLD_KEY => {
                self.split_threshold = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.into(),
                    value: value.into(),
                })?;
            }
            WORKERS_KEY => {
                self.workers = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.into(),
                    value: value.into(),
                })?;
            }
            STATS_KEY => {
                self.stats = value.parse().map_err(|_| ConfigError::InvalidValue {
                    key: key.into(),
                    value: value.into(),
                })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.into())),
        }
        Ok(())
    }
}

/// Errors rejected at analysis setup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// The key is not a recognized analysis setting.
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    /// The value does not parse for its key.
    #[error("invalid value '{value}' for configuration key '{key}'")]
    InvalidValue {
        /// The offending key.
        key: String,
        /// The unparsable value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.split_threshold, 12);
        assert!(cfg.workers >= 1);
        assert!(!cfg.stats);
    }

    #[test]
    fn parse_empty_yields_defaults() {
        let cfg = AnalysisConfig::load_from_str("").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn parse_analysis_table() {
        let cfg = AnalysisConfig::load_from_str(
            r#"
[analysis]
split-threshold = 8
workers = 4
stats = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.split_threshold, 8);
        assert_eq!(cfg.workers, 4);
        assert!(cfg.stats);
    }

    #[test]
    fn unknown_table_key_rejected() {
        let err = AnalysisConfig::load_from_str(
            r#"
[analysis]
split-treshold = 8
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn set_recognized_keys() {
        let mut cfg = AnalysisConfig::default();
        cfg.set(SPLIT_THRESHOLD_KEY, "20").unwrap();
        cfg.set(WORKERS_KEY, "0").unwrap();
        cfg.set(STATS_KEY, "true").unwrap();
        assert_eq!(cfg.split_threshold, 20);
        assert_eq!(cfg.workers, 0);
        assert!(cfg.stats);
    }

    #[test]
    fn set_unknown_key_rejected() {
        let mut cfg = AnalysisConfig::default();
        let err = cfg.set("threshold", "3").unwrap_err();
        assert_eq!(format!("{err}"), "unknown configuration key 'threshold'");
    }

    #[test]
    fn set_invalid_value_rejected() {
        let mut cfg = AnalysisConfig::default();
        let err = cfg.set(SPLIT_THRESHOLD_KEY, "-1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        let err = cfg.set(STATS_KEY, "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn serde_roundtrip() {
        let mut cfg = AnalysisConfig::default();
        cfg.split_threshold = 6;
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
