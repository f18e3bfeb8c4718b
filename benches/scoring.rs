//! Scoring benchmark: multichannel table → windows → logistic classifier.

use aegisnav_detector::{
    config::DetectorConfig,
    features::Feature,
    model::LogisticClassifier,
    scoring::AnomalyDetector,
    telemetry::TelemetryTable,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CHANNELS: [&str; 4] = ["gyro_x", "gyro_y", "accel_z", "temp"];

fn make_table(rows: usize) -> TelemetryTable {
    TelemetryTable::from_rows(
        CHANNELS.iter().map(|s| s.to_string()).collect(),
        (0..rows).map(|i| {
            let t = i as f64;
            (
                i as i64 * 100,
                vec![(t * 0.1).sin(), (t * 0.2).cos(), 9.81 + (t * 0.05).sin(), 21.0],
            )
        }),
    )
    .unwrap()
}

fn bench_score(c: &mut Criterion) {
    let feature_names: Vec<String> = CHANNELS
        .iter()
        .flat_map(|ch| Feature::ALL.iter().map(move |f| format!("{}_{}", ch, f.name())))
        .collect();
    let dim = feature_names.len();
    let config = DetectorConfig {
        window_size: 50,
        stride: 10,
        decision_threshold: 0.5,
        feature_names,
    };
    let clf = LogisticClassifier::new(vec![0.01; dim], -1.0);
    let detector = AnomalyDetector::new(config, clf).unwrap();
    let table = make_table(5_000);

    c.bench_function("score_5000_rows_4_channels", |b| {
        b.iter(|| detector.score(black_box(&table)).unwrap())
    });
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
