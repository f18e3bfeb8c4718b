//! Command-line scorer: loads the model and its configuration, scores one telemetry file and
//! writes one JSON line per window to stdout.

use aegisnav_detector::{
    config::AppConfig,
    logging::{StructuredLogger, WindowRecord},
    model::verify_checksum,
    scoring::AnomalyDetector,
    telemetry::TelemetryTable,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("AEGISNAV_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = AppConfig::load(&config_path)?;

    StructuredLogger::init(config.log.json, &config.log.level);

    let telemetry_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: aegisnav-detect <telemetry.json>")?;

    if let Some(expected) = &config.model_sha256 {
        verify_checksum(&config.model_path, expected)?;
    }
    let detector = AnomalyDetector::from_paths(&config.model_path, &config.model_config_path)?;

    let table = TelemetryTable::from_json_path(&telemetry_path)?;
    info!(
        path = %telemetry_path.display(),
        rows = table.len(),
        channels = table.channels().len(),
        "loaded telemetry"
    );

    let scores = detector.score_windows(&table)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for s in &scores {
        StructuredLogger::emit_json(&WindowRecord::from(s), &mut out)?;
    }
    out.flush()?;

    let anomalies = scores.iter().filter(|s| s.is_anomaly()).count();
    info!(windows = scores.len(), anomalies, "Detected {} anomalies", anomalies);
    Ok(())
}
