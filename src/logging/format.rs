//! JSON log lines: one JSON object per line (ndjson) for ingestion and audit.

use crate::scoring::WindowScore;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One scored window as written to the result stream.
#[derive(Debug, Serialize)]
pub struct WindowRecord {
    pub start: usize,
    pub timestamp: i64,
    /// RFC 3339 rendering of `timestamp`, when representable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub probability: f64,
    pub prediction: u8,
}

impl From<&WindowScore> for WindowRecord {
    fn from(s: &WindowScore) -> Self {
        Self {
            start: s.start,
            timestamp: s.timestamp,
            time: Utc
                .timestamp_millis_opt(s.timestamp)
                .single()
                .map(|dt| dt.to_rfc3339()),
            probability: s.probability,
            prediction: s.prediction,
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber: JSON lines or text to stderr, level from RUST_LOG or default.
    /// Stdout is left for result records.
    pub fn init(json: bool, default_level: &str) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry().with(filter).with(fmt).init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Emit a single structured line without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)
    }
}
