//! Windowed anomaly scoring for multichannel telemetry.
//!
//! Modular structure:
//! - [`telemetry`] — In-memory timestamped channel table
//! - [`features`] — Per-channel statistical, temporal and spectral window features
//! - [`model`] — Classifier capability trait and artifact loaders
//! - [`scoring`] — Sliding-window detector and thresholded results
//! - [`config`] — Detector and application configuration
//! - [`logging`] — Structured logging and ndjson result lines

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod scoring;
pub mod telemetry;

pub use config::{AppConfig, DetectorConfig};
pub use error::{ClassifierError, ConfigError, DetectorError, InputError};
pub use features::{Feature, FeatureExtractor, WindowFeatures};
pub use logging::StructuredLogger;
pub use model::{Classifier, LogisticClassifier};
pub use scoring::{AnomalyDetector, ScoreResult, WindowScore};
pub use telemetry::TelemetryTable;
