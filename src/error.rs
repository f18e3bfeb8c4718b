//! Error taxonomy for configuration, input telemetry and classifier failures.

use thiserror::Error;

/// Configuration is inconsistent with the feature extractor or the telemetry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Unknown feature in feature_names: {0}")]
    UnknownFeature(String),

    #[error("Feature {feature} references channel {channel:?} which is not in the telemetry")]
    UnknownChannel { feature: String, channel: String },

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Telemetry table is malformed.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Telemetry has no channels")]
    NoChannels,

    #[error("Duplicate channel name: {0}")]
    DuplicateChannel(String),

    #[error("Row {row}: expected {expected} values, got {got}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("Column {channel}: expected {expected} values, got {got}")]
    ColumnLength {
        channel: String,
        expected: usize,
        got: usize,
    },

    #[error("Row {row}, channel {channel}: value is not numeric ({value})")]
    NonNumeric {
        row: usize,
        channel: String,
        value: String,
    },

    #[error("Row {row}: invalid timestamp ({value})")]
    Timestamp { row: usize, value: String },

    #[error("Failed to read telemetry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed telemetry document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Classifier could not produce a probability.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Expected {expected} features, got {got}")]
    Dimension { expected: usize, got: usize },

    #[error("Probability out of range: {0}")]
    InvalidProbability(f64),

    #[error("Model checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to load model {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Model error: {0}")]
    Model(#[from] ClassifierError),

    #[error("Classifier failed on window starting at row {start}: {source}")]
    Classifier {
        start: usize,
        #[source]
        source: ClassifierError,
    },
}

pub type Result<T> = std::result::Result<T, DetectorError>;
