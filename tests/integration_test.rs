//! Integration test: config load, telemetry parse, window features, scoring with stub and
//! on-disk classifiers.

use aegisnav_detector::{
    config::DetectorConfig,
    error::{ClassifierError, ConfigError, DetectorError},
    features::{Feature, FeatureExtractor},
    model::{Classifier, LogisticClassifier},
    scoring::AnomalyDetector,
    telemetry::TelemetryTable,
};
use std::sync::Mutex;

/// Returns a fixed probability and remembers every vector it was given.
struct Recording {
    probability: f64,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl Recording {
    fn new(probability: f64) -> Self {
        Self {
            probability,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Classifier for Recording {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        self.seen.lock().unwrap().push(features.to_vec());
        Ok(self.probability)
    }
}

/// Fails on the n-th call.
struct FailsAt {
    n: usize,
    calls: Mutex<usize>,
}

impl Classifier for FailsAt {
    fn predict_proba(&self, _: &[f64]) -> Result<f64, ClassifierError> {
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        if *calls == self.n {
            Err(ClassifierError::Inference("session crashed".into()))
        } else {
            Ok(0.1)
        }
    }
}

fn single_channel(values: &[f64]) -> TelemetryTable {
    TelemetryTable::from_rows(
        vec!["gyro".into()],
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (1_000 + 100 * i as i64, vec![v])),
    )
    .unwrap()
}

fn config(window_size: usize, stride: usize, threshold: f64, names: &[&str]) -> DetectorConfig {
    DetectorConfig {
        window_size,
        stride,
        decision_threshold: threshold,
        feature_names: names.iter().map(|s| s.to_string()).collect(),
    }
}

const RAMP_FEATURES: &[&str] = &[
    "gyro_mean",
    "gyro_slope",
    "gyro_first_last_delta",
    "gyro_diff_mean",
    "gyro_diff_std",
];

#[test]
fn ramp_end_to_end() {
    let table = single_channel(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let det = AnomalyDetector::new(config(4, 4, 0.5, RAMP_FEATURES), Recording::new(0.2)).unwrap();
    let result = det.score(&table).unwrap();

    assert_eq!(result.timestamps, vec![1_000, 1_400]);
    assert_eq!(result.probabilities, vec![0.2, 0.2]);
    assert_eq!(result.predictions, vec![0, 0]);

    let seen = det.classifier().seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    for (v, mean) in seen.iter().zip([2.5, 6.5]) {
        assert!((v[0] - mean).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
        assert!((v[2] - 3.0).abs() < 1e-12);
        assert!((v[3] - 1.0).abs() < 1e-12);
        assert!(v[4].abs() < 1e-12);
    }
}

#[test]
fn table_exactly_one_window() {
    let table = single_channel(&[3.0, 1.0, 4.0, 1.0]);
    let det = AnomalyDetector::new(config(4, 3, 0.5, &["gyro_max"]), Recording::new(0.9)).unwrap();
    let result = det.score(&table).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.timestamps, vec![1_000]);
    assert_eq!(result.predictions, vec![1]);
}

#[test]
fn table_shorter_than_window_is_empty() {
    let table = single_channel(&[1.0, 2.0, 3.0]);
    let det = AnomalyDetector::new(config(4, 1, 0.5, &["gyro_mean"]), Recording::new(0.9)).unwrap();
    let result = det.score(&table).unwrap();
    assert!(result.is_empty());
    assert!(det.classifier().seen.lock().unwrap().is_empty());
}

#[test]
fn stride_drops_trailing_rows() {
    let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let table = single_channel(&values);
    let det =
        AnomalyDetector::new(config(4, 2, 0.5, &["gyro_first_value"]), Recording::new(0.0)).unwrap();
    let windows = det.score_windows(&table).unwrap();
    let starts: Vec<usize> = windows.iter().map(|w| w.start).collect();
    assert_eq!(starts, vec![0, 2, 4, 6]);
    let timestamps: Vec<i64> = windows.iter().map(|w| w.timestamp).collect();
    assert_eq!(timestamps, vec![1_000, 1_200, 1_400, 1_600]);

    let seen = det.classifier().seen.lock().unwrap();
    let firsts: Vec<f64> = seen.iter().map(|v| v[0]).collect();
    assert_eq!(firsts, vec![0.0, 2.0, 4.0, 6.0]);
}

#[test]
fn probability_equal_to_threshold_is_anomalous() {
    let table = single_channel(&[1.0, 2.0, 3.0, 4.0]);
    let det = AnomalyDetector::new(config(2, 1, 0.42, &["gyro_mean"]), Recording::new(0.42)).unwrap();
    let result = det.score(&table).unwrap();
    assert_eq!(result.predictions, vec![1, 1, 1]);
    assert_eq!(result.anomaly_count(), 3);
}

#[test]
fn classifier_failure_aborts_scoring() {
    let table = single_channel(&[1.0; 12]);
    let clf = FailsAt {
        n: 3,
        calls: Mutex::new(0),
    };
    let det = AnomalyDetector::new(config(4, 2, 0.5, &["gyro_std"]), clf).unwrap();
    match det.score(&table) {
        Err(DetectorError::Classifier { start, .. }) => assert_eq!(start, 4),
        other => panic!("expected classifier failure, got {other:?}"),
    }
}

#[test]
fn vector_follows_feature_names_across_channels() {
    let table = TelemetryTable::from_rows(
        vec!["gyro_x".into(), "temp".into(), "spare".into()],
        (0..6).map(|i| (i as i64, vec![i as f64, 20.0 + i as f64, -1.0])),
    )
    .unwrap();
    let names = ["temp_max", "gyro_x_min", "temp_first_value", "gyro_x_fft_band_2_energy"];
    let det = AnomalyDetector::new(config(6, 6, 0.5, &names), Recording::new(0.5)).unwrap();
    det.score(&table).unwrap();

    let gyro = FeatureExtractor::new().extract(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    let seen = det.classifier().seen.lock().unwrap();
    assert_eq!(
        seen[0],
        vec![25.0, 0.0, 20.0, gyro.get(Feature::FftBand2Energy)]
    );
}

#[test]
fn colliding_channel_prefixes_bind_to_later_channel() {
    // "pressure_diff_max" reads as pressure + diff_max or as pressure_diff + max
    let channels = ["pressure", "pressure_diff"];
    let table = TelemetryTable::from_rows(
        channels.iter().map(|c| c.to_string()).collect(),
        (0..5).map(|i| (i as i64, vec![[0.0, 4.0, 1.0, 9.0, 2.0][i], 100.0 + i as f64])),
    )
    .unwrap();
    let names: Vec<String> = channels
        .iter()
        .flat_map(|c| Feature::ALL.iter().map(move |f| format!("{c}_{}", f.name())))
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let det = AnomalyDetector::new(config(5, 5, 0.5, &names), Recording::new(0.3)).unwrap();
    let result = det.score(&table).unwrap();
    assert_eq!(result.len(), 1);

    let ex = FeatureExtractor::new();
    let diff = ex.extract(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    let seen = det.classifier().seen.lock().unwrap();
    let v = &seen[0];
    assert_eq!(v.len(), 2 * Feature::ALL.len());
    let at = |name: &str| names.iter().position(|n| *n == name).unwrap();
    assert_eq!(v[at("pressure_diff_max")], diff.get(Feature::Max));
    assert_eq!(v[at("pressure_diff_max")], 104.0);
    assert_eq!(v[at("pressure_max")], 9.0);
    assert_eq!(v[at("pressure_diff_mean")], 102.0);
}

#[test]
fn unknown_channel_is_config_error() {
    let table = single_channel(&[1.0, 2.0, 3.0, 4.0]);
    let det = AnomalyDetector::new(config(2, 1, 0.5, &["accel_mean"]), Recording::new(0.5)).unwrap();
    assert!(matches!(
        det.score(&table),
        Err(DetectorError::Config(ConfigError::UnknownChannel { .. }))
    ));
}

#[test]
fn detector_from_disk_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let config_path = dir.path().join("model_config.json");
    std::fs::write(
        &model_path,
        r#"{"mean": [0.0, 0.0], "scale": [1.0, 1.0], "coefficients": [0.0, 2.0], "intercept": -3.0}"#,
    )
    .unwrap();
    std::fs::write(
        &config_path,
        r#"{"window_size": 4, "stride": 4, "decision_threshold": 0.5,
            "feature_names": ["gyro_mean", "gyro_diff_max"]}"#,
    )
    .unwrap();

    let det = AnomalyDetector::from_paths(&model_path, &config_path).unwrap();
    // diff_max 1 -> z = -1; diff_max 5 -> z = 7
    let table = single_channel(&[0.0, 1.0, 2.0, 3.0, 0.0, 5.0, 5.0, 5.0]);
    let result = det.score(&table).unwrap();
    assert_eq!(result.predictions, vec![0, 1]);
    assert!(result.probabilities[0] < 0.5);
    assert!(result.probabilities[1] > 0.99);
}

#[test]
fn detector_from_json_telemetry() {
    let doc = r#"{
        "channels": ["gyro"],
        "rows": [
            {"timestamp": "2024-03-01T00:00:00Z", "values": [1.0]},
            {"timestamp": "2024-03-01T00:00:01Z", "values": [1.0]},
            {"timestamp": "2024-03-01T00:00:02Z", "values": [1.0]}
        ]
    }"#;
    let table = TelemetryTable::from_json_reader(doc.as_bytes()).unwrap();
    let clf = LogisticClassifier::new(vec![1.0, 1.0], 0.0);
    let det = AnomalyDetector::new(config(3, 1, 0.5, &["gyro_lag1_autocorr", "gyro_kurtosis"]), clf)
        .unwrap();
    let result = det.score(&table).unwrap();
    assert_eq!(result.timestamps, vec![1_709_251_200_000]);
    // constant window: both features fall back to 0
    assert_eq!(result.probabilities, vec![0.5]);
}
