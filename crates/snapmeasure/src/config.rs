//! Versioned engine configuration file.
//!
//! The file follows the `snapmeasure.config.v1` schema. Both sections are
//! optional and fall back to their defaults; unknown top-level fields are
//! rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alignment::{AlignmentClassifier, AlignmentConfig};
use crate::calibration::{CalibrationConfig, CalibrationEngine};

pub const CONFIG_SCHEMA_V1: &str = "snapmeasure.config.v1";

/// Failure to load an [`EngineConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnsupportedSchema { found: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {}", e),
            Self::Parse(e) => write!(f, "failed to parse config: {}", e),
            Self::UnsupportedSchema { found } => write!(
                f,
                "unsupported config schema '{}' (expected '{}')",
                found, CONFIG_SCHEMA_V1
            ),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Configuration for both engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub schema: String,
    #[serde(default)]
    pub alignment: AlignmentConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema: CONFIG_SCHEMA_V1.to_string(),
            alignment: AlignmentConfig::default(),
            calibration: CalibrationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema != CONFIG_SCHEMA_V1 {
            return Err(ConfigError::UnsupportedSchema {
                found: self.schema.clone(),
            });
        }
        self.alignment.validate().map_err(ConfigError::Invalid)?;
        self.calibration.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn classifier(&self) -> AlignmentClassifier {
        AlignmentClassifier::new(self.alignment.clone())
    }

    pub fn calibration_engine(&self) -> CalibrationEngine {
        CalibrationEngine::new(self.calibration.clone())
    }
}
