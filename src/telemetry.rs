//! In-memory multichannel telemetry table.

use crate::error::InputError;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Timestamped rows of one numeric value per channel, stored column-major so a channel's
/// window is a borrowed slice.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryTable {
    channels: Vec<String>,
    /// Epoch milliseconds per row
    timestamps: Vec<i64>,
    columns: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawTable {
    channels: Vec<String>,
    rows: Vec<RawRow>,
}

#[derive(Deserialize)]
struct RawRow {
    timestamp: Value,
    values: Vec<Value>,
}

impl TelemetryTable {
    /// Build from column vectors, one per channel, each as long as `timestamps`.
    pub fn new(
        channels: Vec<String>,
        timestamps: Vec<i64>,
        columns: Vec<Vec<f64>>,
    ) -> Result<Self, InputError> {
        check_channels(&channels)?;
        if columns.len() != channels.len() {
            return Err(InputError::RowWidth {
                row: 0,
                expected: channels.len(),
                got: columns.len(),
            });
        }
        for (channel, column) in channels.iter().zip(&columns) {
            if column.len() != timestamps.len() {
                return Err(InputError::ColumnLength {
                    channel: channel.clone(),
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
            if let Some(row) = column.iter().position(|v| !v.is_finite()) {
                return Err(InputError::NonNumeric {
                    row,
                    channel: channel.clone(),
                    value: column[row].to_string(),
                });
            }
        }
        let table = Self {
            channels,
            timestamps,
            columns,
        };
        table.warn_if_unordered();
        Ok(table)
    }

    /// Build from row-major samples.
    pub fn from_rows(
        channels: Vec<String>,
        rows: impl IntoIterator<Item = (i64, Vec<f64>)>,
    ) -> Result<Self, InputError> {
        check_channels(&channels)?;
        let mut timestamps = Vec::new();
        let mut columns = vec![Vec::new(); channels.len()];
        for (row, (ts, values)) in rows.into_iter().enumerate() {
            if values.len() != channels.len() {
                return Err(InputError::RowWidth {
                    row,
                    expected: channels.len(),
                    got: values.len(),
                });
            }
            timestamps.push(ts);
            for (column, v) in columns.iter_mut().zip(values) {
                column.push(v);
            }
        }
        Self::new(channels, timestamps, columns)
    }

    /// Parse `{"channels": [...], "rows": [{"timestamp": ..., "values": [...]}]}`.
    /// Timestamps are epoch milliseconds or RFC 3339 strings.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, InputError> {
        let raw: RawTable = serde_json::from_reader(reader)?;
        check_channels(&raw.channels)?;
        let mut timestamps = Vec::with_capacity(raw.rows.len());
        let mut columns = vec![Vec::with_capacity(raw.rows.len()); raw.channels.len()];
        for (row, r) in raw.rows.into_iter().enumerate() {
            timestamps.push(parse_timestamp(row, &r.timestamp)?);
            if r.values.len() != raw.channels.len() {
                return Err(InputError::RowWidth {
                    row,
                    expected: raw.channels.len(),
                    got: r.values.len(),
                });
            }
            for ((column, value), channel) in columns.iter_mut().zip(&r.values).zip(&raw.channels)
            {
                let v = value.as_f64().ok_or_else(|| InputError::NonNumeric {
                    row,
                    channel: channel.clone(),
                    value: value.to_string(),
                })?;
                column.push(v);
            }
        }
        Self::new(raw.channels, timestamps, columns)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, InputError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Samples of channel `channel` over rows `[start, end)`
    pub fn slice(&self, channel: usize, start: usize, end: usize) -> &[f64] {
        &self.columns[channel][start..end]
    }

    pub fn column(&self, channel: usize) -> &[f64] {
        &self.columns[channel]
    }

    fn warn_if_unordered(&self) {
        if let Some(row) = self.timestamps.windows(2).position(|w| w[1] < w[0]) {
            tracing::warn!(row = row + 1, "telemetry timestamps are not monotonic");
        }
    }
}

fn check_channels(channels: &[String]) -> Result<(), InputError> {
    if channels.is_empty() {
        return Err(InputError::NoChannels);
    }
    let mut seen = HashSet::with_capacity(channels.len());
    for c in channels {
        if !seen.insert(c.as_str()) {
            return Err(InputError::DuplicateChannel(c.clone()));
        }
    }
    Ok(())
}

fn parse_timestamp(row: usize, value: &Value) -> Result<i64, InputError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    };
    parsed.ok_or_else(|| InputError::Timestamp {
        row,
        value: value.to_string(),
    })
}
