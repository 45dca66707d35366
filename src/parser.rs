//! Normalization of raw feed payloads into validated readings.
//!
//! The upstream endpoint answers a plain GET with either a JSON array of
//! row-like values or CSV/TSV text with a header row. Both shapes funnel
//! through [`normalize`] into the same `Vec<Reading>`; malformed rows are
//! dropped silently, sentinel "misconfigured endpoint" bodies fail the
//! whole batch.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::readings::Reading;

/// Sensor range accepted by strict ingestion; anything outside is treated
/// as a wiring fault and excluded.
const TEMP_RANGE: (f64, f64) = (-40.0, 80.0);
const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Legacy Apps Script deployments answer a bare GET with one of these
/// instead of data.
const SENTINELS: [&str; 2] = ["Missing parameters", "OK"];

/// Raw response body, tagged by the shape the transport layer saw.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Plain text: CSV/TSV, or JSON that arrived without a JSON content type.
    Text(String),
    /// Body already decoded as JSON.
    Json(Value),
}

/// The endpoint is reachable but not configured to serve readings.
/// Distinct from an empty batch so the caller can show a setup hint
/// instead of "no data".
#[derive(Debug, thiserror::Error)]
#[error("endpoint replied \"{0}\"; the deployed script does not support reads")]
pub struct MisconfiguredEndpoint(pub String);

/// Converts a raw payload into validated readings.
///
/// Rows that fail timestamp parsing, numeric parsing, or range validation
/// are dropped without error. Output order follows the input and is not
/// guaranteed chronological.
///
/// # Errors
///
/// Returns [`MisconfiguredEndpoint`] for sentinel bodies, or a JSON error
/// when a bracket-leading text body is not valid JSON.
pub fn normalize(payload: &Payload) -> Result<Vec<Reading>> {
    match payload {
        Payload::Text(text) => {
            let trimmed = text.trim();
            if SENTINELS.contains(&trimmed) {
                return Err(MisconfiguredEndpoint(trimmed.to_string()).into());
            }
            if trimmed.starts_with('[') {
                let value: Value = serde_json::from_str(trimmed)?;
                Ok(parse_json_rows(&value))
            } else {
                Ok(parse_csv(trimmed))
            }
        }
        Payload::Json(value) => Ok(parse_json_rows(value)),
    }
}

/// Parses a JSON array of row-like values. Non-array input and malformed
/// rows yield nothing.
pub fn parse_json_rows(value: &Value) -> Vec<Reading> {
    let Some(items) = value.as_array() else {
        debug!("JSON payload is not an array, ignoring");
        return Vec::new();
    };
    items.iter().filter_map(parse_row).collect()
}

/// Parses delimited text with a header row.
///
/// Header columns are matched case-insensitively to `timestamp`,
/// `temperature`, `humidity` in any order; the delimiter is a tab if the
/// header line contains one, else a comma. Returns empty if any required
/// column is missing.
pub fn parse_csv(text: &str) -> Vec<Reading> {
    let trimmed = text.trim();
    let Some(header_line) = trimmed.lines().next() else {
        return Vec::new();
    };
    let delimiter = if header_line.contains('\t') { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(trimmed.as_bytes());

    let Ok(headers) = reader.headers().cloned() else {
        return Vec::new();
    };
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let (Some(ts_idx), Some(temp_idx), Some(hum_idx)) =
        (find("timestamp"), find("temperature"), find("humidity"))
    else {
        debug!("CSV header missing a required column, dropping batch");
        return Vec::new();
    };

    let mut rows = Vec::new();
    for record in reader.records().flatten() {
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        if let Some(reading) = build_reading(
            parse_timestamp(cell(ts_idx)),
            parse_number(cell(temp_idx)),
            parse_number(cell(hum_idx)),
        ) {
            rows.push(reading);
        }
    }
    rows
}

/// Parses one JSON row: an object with case-variant keys, or a positional
/// `[timestamp, temperature, humidity]` array.
pub fn parse_row(value: &Value) -> Option<Reading> {
    let timestamp = match field(value, "Timestamp", "timestamp", 0)? {
        Value::String(s) => parse_timestamp(s),
        other => parse_timestamp(&other.to_string()),
    };
    let temperature = field(value, "Temperature", "temperature", 1).and_then(number_of);
    let humidity = field(value, "Humidity", "humidity", 2).and_then(number_of);

    build_reading(timestamp, temperature, humidity)
}

/// Field-alias lookup: canonical key, lowercase key, then positional index.
fn field<'a>(value: &'a Value, name: &str, lower: &str, index: usize) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(name).or_else(|| map.get(lower)),
        Value::Array(items) => items.get(index),
        _ => None,
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a timestamp cell. RFC 3339 first, then the naive formats
/// spreadsheets emit; naive values are taken as UTC. Empty or unparsable
/// input drops the row.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Assembles a reading, applying strict range validation. Out-of-range
/// measurements are sensor faults, not errors.
fn build_reading(
    timestamp: Option<DateTime<Utc>>,
    temperature: Option<f64>,
    humidity: Option<f64>,
) -> Option<Reading> {
    let (timestamp, temperature, humidity) = (timestamp?, temperature?, humidity?);
    if temperature < TEMP_RANGE.0 || temperature > TEMP_RANGE.1 {
        return None;
    }
    if humidity < HUMIDITY_RANGE.0 || humidity > HUMIDITY_RANGE.1 {
        return None;
    }
    Some(Reading {
        timestamp,
        temperature,
        humidity,
    })
}
