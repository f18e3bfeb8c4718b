//! Windowed anomaly scoring.

mod detector;
mod result;

pub use detector::{window_starts, AnomalyDetector};
pub use result::{DecisionRule, ScoreResult, WindowScore};
