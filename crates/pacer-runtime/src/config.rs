//! Scheduler configuration loaded from TOML

use crate::gate::DEFAULT_FPS;
use pacer_core::{PacerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pacing and seeding for an app, e.g. from a `pacer.toml`:
///
/// ```toml
/// tps = 60.0
/// fps = 30.0
/// paused = false
/// seed = 123
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ticks per second. Values <= 0 mean as fast as possible.
    pub tps: f64,
    /// Frames per second. Zero means 30, negative follows ticks.
    pub fps: f64,
    pub paused: bool,
    /// Seed for the app's PRNG. Unset seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tps: 0.0,
            fps: DEFAULT_FPS,
            paused: false,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rates must be finite numbers
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("tps", self.tps), ("fps", self.fps)] {
            if !rate.is_finite() {
                return Err(PacerError::Config(format!("{name} must be finite, got {rate}")));
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = SchedulerConfig::from_toml_str("tps = 60.0").unwrap();
        assert_eq!(config.tps, 60.0);
        assert_eq!(config.fps, 30.0);
        assert!(!config.paused);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = SchedulerConfig::from_toml_str(
            "tps = 10.0\nfps = -1.0\npaused = true\nseed = 42\n",
        )
        .unwrap();
        assert_eq!(
            config,
            SchedulerConfig {
                tps: 10.0,
                fps: -1.0,
                paused: true,
                seed: Some(42),
            }
        );
    }

    #[test]
    fn test_invalid_type_is_config_error() {
        let err = SchedulerConfig::from_toml_str("tps = \"fast\"").unwrap_err();
        assert!(matches!(err, PacerError::Config(_)));
    }

    #[test]
    fn test_non_finite_rates_rejected() {
        for text in ["tps = nan", "fps = inf", "tps = -inf"] {
            let err = SchedulerConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, PacerError::Config(_)), "{text}");
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fps = 60.0\nseed = 7").unwrap();
        let config = SchedulerConfig::load(file.path()).unwrap();
        assert_eq!(config.fps, 60.0);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SchedulerConfig::load("/nonexistent/pacer.toml").unwrap_err();
        assert!(matches!(err, PacerError::Io(_)));
    }

    #[test]
    fn test_written_config_reads_back() {
        let config = SchedulerConfig {
            tps: 25.0,
            seed: Some(9),
            ..SchedulerConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SchedulerConfig::from_toml_str(&text).unwrap(), config);
    }
}
