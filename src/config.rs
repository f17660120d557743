//! Runtime configuration for built-in nodes
//!
//! Configuration is plain JSON. Every field is optional and falls back to
//! the values in [`crate::constants`].

use crate::constants;
use crate::error::{NodeError, Result};
use crate::nodes::output::pixmap::AccumulationPolicy;
use crate::nodes::snapshot::Normalization;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub imager: ImagerConfig,
}

/// Settings for the histogram imager (Pixmap) node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagerConfig {
    /// Channel count the color pad must carry (1..=4)
    pub channels: usize,
    /// How a sample combines with the cell it lands on
    pub policy: AccumulationPolicy,
    /// How snapshots map accumulated values to display range
    pub normalization: Normalization,
    /// Accumulation units contributed by one full-intensity channel sample
    pub hit_scale: u32,
    /// Largest accepted width or height
    pub max_dimension: usize,
}

impl Default for ImagerConfig {
    fn default() -> Self {
        Self {
            channels: constants::color::DEFAULT_CHANNELS,
            policy: AccumulationPolicy::default(),
            normalization: Normalization::default(),
            hit_scale: constants::accumulator::DEFAULT_HIT_SCALE,
            max_dimension: constants::accumulator::DEFAULT_MAX_DIMENSION,
        }
    }
}

impl ImagerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.channels == 0 || self.channels > constants::color::MAX_CHANNELS {
            return Err(NodeError::Config(format!(
                "imager.channels must be between 1 and {}, got {}",
                constants::color::MAX_CHANNELS,
                self.channels
            )));
        }
        if self.hit_scale == 0 {
            return Err(NodeError::Config("imager.hit_scale must be positive".into()));
        }
        if self.max_dimension == 0 {
            return Err(NodeError::Config(
                "imager.max_dimension must be positive".into(),
            ));
        }
        if let Normalization::Fixed { scale } = self.normalization {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(NodeError::Config(format!(
                    "imager.normalization.scale must be a positive number, got {}",
                    scale
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Parse and validate configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the file at [`Config::default_path`] if it exists, otherwise
    /// use defaults
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Standard configuration file location under the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(constants::config::APP_DIR)
                .join(constants::config::FILE_NAME)
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.imager.validate()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.imager.channels, 4);
        assert_eq!(config.imager.policy, AccumulationPolicy::Additive);
        assert_eq!(config.imager.normalization, Normalization::Linear);
        assert_eq!(config.imager.hit_scale, 255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json_str(
            r#"{"imager": {"channels": 3, "policy": "max_hold",
                "normalization": {"mode": "fixed", "scale": 510.0}}}"#,
        )
        .unwrap();
        assert_eq!(config.imager.channels, 3);
        assert_eq!(config.imager.policy, AccumulationPolicy::MaxHold);
        assert_eq!(config.imager.normalization, Normalization::Fixed { scale: 510.0 });
        assert_eq!(config.imager.hit_scale, 255);
    }

    #[test]
    fn test_log_normalization_json() {
        let config =
            Config::from_json_str(r#"{"imager": {"normalization": {"mode": "log"}}}"#).unwrap();
        assert_eq!(config.imager.normalization, Normalization::Log);
    }

    #[test]
    fn test_rejects_bad_channel_count() {
        for channels in [0, 5] {
            let json = format!(r#"{{"imager": {{"channels": {}}}}}"#, channels);
            assert!(matches!(
                Config::from_json_str(&json),
                Err(NodeError::Config(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_fixed_scale() {
        let json = r#"{"imager": {"normalization": {"mode": "fixed", "scale": 0.0}}}"#;
        assert!(matches!(
            Config::from_json_str(json),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Config::from_json_str("{not json"),
            Err(NodeError::Json(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut config = Config::default();
        config.imager.policy = AccumulationPolicy::ReplaceLatest;
        let json = config.to_json_pretty().unwrap();
        assert_eq!(Config::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("histimage-missing-config.json");
        assert!(matches!(Config::load(&path), Err(NodeError::Io(_))));
    }
}
