//! Per-window scores and thresholded decisions.

use serde::{Deserialize, Serialize};

/// Thresholding of classifier probabilities; inclusive at the threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionRule {
    threshold: f64,
}

impl DecisionRule {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 1 when `probability >= threshold`, else 0
    pub fn decide(&self, probability: f64) -> u8 {
        u8::from(probability >= self.threshold)
    }
}

/// One scored window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowScore {
    /// First row of the window
    pub start: usize,
    /// Timestamp of the first row (epoch ms)
    pub timestamp: i64,
    pub probability: f64,
    pub prediction: u8,
}

impl WindowScore {
    pub fn is_anomaly(&self) -> bool {
        self.prediction == 1
    }
}

/// Index-aligned results, one entry per window in start order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub timestamps: Vec<i64>,
    pub probabilities: Vec<f64>,
    pub predictions: Vec<u8>,
}

impl ScoreResult {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(n),
            probabilities: Vec::with_capacity(n),
            predictions: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, score: &WindowScore) {
        self.timestamps.push(score.timestamp);
        self.probabilities.push(score.probability);
        self.predictions.push(score.prediction);
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn anomaly_count(&self) -> usize {
        self.predictions.iter().filter(|&&p| p == 1).count()
    }
}

impl FromIterator<WindowScore> for ScoreResult {
    fn from_iter<I: IntoIterator<Item = WindowScore>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        for s in iter {
            out.push(&s);
        }
        out
    }
}
