//! Standard-scaler + logistic-regression pipeline exported as JSON.

use super::{check_probability, Classifier};
use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    /// Per-feature scaler mean; empty means no centering
    #[serde(default)]
    pub mean: Vec<f64>,
    /// Per-feature scaler scale; empty means no scaling
    #[serde(default)]
    pub scale: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticClassifier {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            mean: Vec::new(),
            scale: Vec::new(),
            coefficients,
            intercept,
        }
    }

    pub fn with_scaler(mut self, mean: Vec<f64>, scale: Vec<f64>) -> Self {
        self.mean = mean;
        self.scale = scale;
        self
    }

    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let load_err = |reason: String| ClassifierError::Load {
            path: path.display().to_string(),
            reason,
        };
        let data = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
        let model: Self = serde_json::from_str(&data).map_err(|e| load_err(e.to_string()))?;
        model.check_shape().map_err(load_err)?;
        tracing::info!(
            path = %path.display(),
            dim = model.coefficients.len(),
            "loaded logistic classifier"
        );
        Ok(model)
    }

    fn check_shape(&self) -> Result<(), String> {
        let dim = self.coefficients.len();
        for (name, v) in [("mean", &self.mean), ("scale", &self.scale)] {
            if !v.is_empty() && v.len() != dim {
                return Err(format!("{name} has {} entries, expected {dim}", v.len()));
            }
        }
        Ok(())
    }

    fn standardize(&self, i: usize, x: f64) -> f64 {
        let centered = x - self.mean.get(i).copied().unwrap_or(0.0);
        match self.scale.get(i).copied() {
            Some(s) if s != 0.0 => centered / s,
            _ => centered,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if features.len() != self.coefficients.len() {
            return Err(ClassifierError::Dimension {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }
        let z = features
            .iter()
            .zip(&self.coefficients)
            .enumerate()
            .fold(self.intercept, |acc, (i, (&x, &w))| {
                acc + w * self.standardize(i, x)
            });
        check_probability(sigmoid(z))
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }
}
