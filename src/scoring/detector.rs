//! Sliding-window scorer: telemetry → per-channel features → classifier → decision.

use super::{DecisionRule, ScoreResult, WindowScore};
use crate::config::DetectorConfig;
use crate::error::{ConfigError, DetectorError, Result};
use crate::features::{FeatureExtractor, FeatureKey, FeatureLayout, WindowFeatures};
use crate::model::{self, Classifier};
use crate::telemetry::TelemetryTable;
use std::path::Path;

/// Start rows of every full window over `n` rows: `0, stride, 2*stride, ...` while the window
/// fits. Trailing rows that cannot fill a window are not visited.
pub fn window_starts(n: usize, window_size: usize, stride: usize) -> impl Iterator<Item = usize> {
    let last = n.checked_sub(window_size);
    (0..).map(move |k| k * stride).take_while(move |&i| last.is_some_and(|l| i <= l))
}

pub struct AnomalyDetector<C> {
    config: DetectorConfig,
    keys: Vec<FeatureKey>,
    rule: DecisionRule,
    extractor: FeatureExtractor,
    classifier: C,
}

impl AnomalyDetector<Box<dyn Classifier>> {
    /// Load the classifier artifact and its configuration document.
    pub fn from_paths(model_path: &Path, config_path: &Path) -> Result<Self> {
        let config = DetectorConfig::load(config_path)?;
        let classifier = model::load_classifier(model_path)?;
        Self::new(config, classifier)
    }
}

impl<C: Classifier> AnomalyDetector<C> {
    /// Validate the configuration and resolve every feature name's suffix up front.
    pub fn new(config: DetectorConfig, classifier: C) -> Result<Self> {
        config.validate()?;
        let keys = config
            .feature_names
            .iter()
            .map(|n| FeatureKey::parse(n))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if let Some(dim) = classifier.input_dim() {
            if dim != keys.len() {
                return Err(ConfigError::InvalidParameter {
                    name: "feature_names",
                    reason: format!("{} names but classifier expects {dim} inputs", keys.len()),
                }
                .into());
            }
        }
        Ok(Self {
            rule: DecisionRule::new(config.decision_threshold),
            config,
            keys,
            extractor: FeatureExtractor::new(),
            classifier,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Window start rows for a table of `n` rows
    pub fn window_starts(&self, n: usize) -> impl Iterator<Item = usize> {
        window_starts(n, self.config.window_size, self.config.stride)
    }

    /// Bind configured feature names to the table's channels.
    pub fn layout_for(&self, table: &TelemetryTable) -> std::result::Result<FeatureLayout, ConfigError> {
        FeatureLayout::bind(&self.keys, table.channels())
    }

    /// Assembled classifier input for the window starting at `start`.
    pub fn window_vector(
        &self,
        table: &TelemetryTable,
        layout: &FeatureLayout,
        start: usize,
        per_channel: &mut Vec<WindowFeatures>,
        out: &mut Vec<f64>,
    ) {
        let end = start + self.config.window_size;
        per_channel.clear();
        per_channel.extend(
            layout
                .referenced_channels()
                .iter()
                .map(|&c| self.extractor.extract(table.slice(c, start, end))),
        );
        layout.assemble(per_channel, out);
    }

    /// Score every window as a record. Any classifier failure, including a probability outside
    /// [0, 1], aborts the whole call.
    pub fn score_windows(&self, table: &TelemetryTable) -> Result<Vec<WindowScore>> {
        let n = table.len();
        if n < self.config.window_size {
            tracing::debug!(rows = n, window_size = self.config.window_size, "no full window");
            return Ok(Vec::new());
        }
        let layout = self.layout_for(table)?;

        let expected = (n - self.config.window_size) / self.config.stride + 1;
        let mut scores = Vec::with_capacity(expected);
        let mut per_channel = Vec::with_capacity(layout.referenced_channels().len());
        let mut vector = Vec::with_capacity(layout.dim());

        for start in self.window_starts(n) {
            self.window_vector(table, &layout, start, &mut per_channel, &mut vector);
            let probability = self
                .classifier
                .predict_proba(&vector)
                .and_then(model::check_probability)
                .map_err(|source| DetectorError::Classifier { start, source })?;
            scores.push(WindowScore {
                start,
                timestamp: table.timestamps()[start],
                probability,
                prediction: self.rule.decide(probability),
            });
        }

        tracing::debug!(
            rows = n,
            channels = layout.referenced_channels().len(),
            windows = scores.len(),
            anomalies = scores.iter().filter(|s| s.is_anomaly()).count(),
            "scored telemetry"
        );
        Ok(scores)
    }

    /// Score every window into index-aligned timestamp/probability/prediction sequences.
    pub fn score(&self, table: &TelemetryTable) -> Result<ScoreResult> {
        Ok(self.score_windows(table)?.into_iter().collect())
    }
}
