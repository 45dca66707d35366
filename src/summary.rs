//! Per-poll dashboard snapshot derived from the reading collection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::comfort;
use crate::readings::{self, Reading, TimeWindow};

/// Everything one poll cycle puts on the dashboard: the latest reading,
/// 24-hour averages, and the comfort assessment. Also doubles as the CSV
/// log row, including the error-record shape for failed polls.
#[derive(Debug, Default, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub source_id: Option<String>,
    pub source_name: Option<String>,

    pub total_readings: usize,
    pub last_measurement: Option<DateTime<Utc>>,
    pub current_temperature: Option<f64>,
    pub current_humidity: Option<f64>,
    pub avg_temperature_24h: Option<f64>,
    pub avg_humidity_24h: Option<f64>,

    pub comfort_score: Option<u8>,
    pub comfort_label: Option<String>,
    pub comfort_icon: Option<String>,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl DashboardSummary {
    pub fn from_readings(rows: &[Reading]) -> Self {
        Self::from_readings_at(rows, Utc::now())
    }

    /// Snapshot relative to an explicit `now`, which also anchors the
    /// 24-hour averaging window.
    pub fn from_readings_at(rows: &[Reading], now: DateTime<Utc>) -> Self {
        let mut s = DashboardSummary {
            generated_at: now,
            total_readings: rows.len(),
            ..Default::default()
        };

        let Some(last) = readings::latest(rows) else {
            return s;
        };

        s.last_measurement = Some(last.timestamp);
        s.current_temperature = Some(last.temperature);
        s.current_humidity = Some(last.humidity);

        let air = comfort::assess(Some(last.temperature), Some(last.humidity));
        s.comfort_score = air.score;
        s.comfort_label = Some(air.label);
        s.comfort_icon = Some(air.icon);

        let last_day = readings::filter_since(rows, TimeWindow::LastDay, now);
        s.avg_temperature_24h = readings::mean_temperature(&last_day);
        s.avg_humidity_24h = readings::mean_humidity(&last_day);

        s
    }

    /// Create an error record carrying only the timestamp and error fields.
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        DashboardSummary {
            generated_at: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    /// Set source metadata (id and display name).
    pub fn with_source_info(mut self, source_id: &str, source_name: &str) -> Self {
        self.source_id = Some(source_id.to_string());
        self.source_name = Some(source_name.to_string());
        self
    }
}
