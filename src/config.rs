//! Detector and application configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scoring parameters. Immutable once a detector is built from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Samples per window
    pub window_size: usize,
    /// Samples between consecutive window starts
    pub stride: usize,
    /// Probability at or above this is an anomaly (0.0–1.0)
    pub decision_threshold: f64,
    /// Feature order the classifier was trained on (`<channel>_<feature>`)
    pub feature_names: Vec<String>,
}

impl DetectorConfig {
    /// Load the model configuration document. Unknown keys (training metadata) are ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: DetectorConfig =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            window_size = config.window_size,
            stride = config.stride,
            features = config.feature_names.len(),
            "loaded detector config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "window_size",
                reason: "must be positive".into(),
            });
        }
        if self.stride == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "stride",
                reason: "must be positive".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(ConfigError::InvalidParameter {
                name: "decision_threshold",
                reason: format!("must be in [0, 1], got {}", self.decision_threshold),
            });
        }
        if self.feature_names.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "feature_names",
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Settings for the command-line scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Trained classifier artifact (`.json` or `.onnx`)
    pub model_path: PathBuf,
    /// Detector configuration document
    pub model_config_path: PathBuf,
    /// Expected SHA-256 of the model artifact, hex encoded
    pub model_sha256: Option<String>,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/anomaly_detector.json"),
            model_config_path: PathBuf::from("models/model_config.json"),
            model_sha256: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default. A file that exists but
    /// does not parse is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
