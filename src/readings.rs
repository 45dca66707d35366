//! Core reading type and recency-window operations.

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::Serialize;

/// One validated timestamped sensor sample.
///
/// Constructed only by the parser; out-of-range or malformed rows never
/// become `Reading`s. The collection held by the app is replaced wholesale
/// on every successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius, within [-40, 80].
    pub temperature: f64,
    /// Percent relative humidity, within [0, 100].
    pub humidity: f64,
}

/// Named recency filter applied before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeWindow {
    #[default]
    #[value(name = "1h")]
    LastHour,
    #[value(name = "24h")]
    LastDay,
    #[value(name = "7d")]
    LastWeek,
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TimeWindow::LastHour => "1h",
            TimeWindow::LastDay => "24h",
            TimeWindow::LastWeek => "7d",
        })
    }
}

impl TimeWindow {
    pub fn duration(self) -> Duration {
        match self {
            TimeWindow::LastHour => Duration::hours(1),
            TimeWindow::LastDay => Duration::hours(24),
            TimeWindow::LastWeek => Duration::days(7),
        }
    }
}

/// Keeps readings no older than the window, measured back from `now`.
pub fn filter_since(rows: &[Reading], window: TimeWindow, now: DateTime<Utc>) -> Vec<Reading> {
    let cutoff = now - window.duration();
    rows.iter().filter(|r| r.timestamp >= cutoff).copied().collect()
}

/// Returns a copy sorted by timestamp ascending. The parser does not
/// guarantee ordering, so callers sort whenever chronology matters.
pub fn sort_by_time(rows: &[Reading]) -> Vec<Reading> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|r| r.timestamp);
    sorted
}

/// Most recent reading, if any.
pub fn latest(rows: &[Reading]) -> Option<Reading> {
    rows.iter().max_by_key(|r| r.timestamp).copied()
}

/// Arithmetic mean of temperatures. Returns `None` for empty input.
pub fn mean_temperature(rows: &[Reading]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    Some(rows.iter().map(|r| r.temperature).sum::<f64>() / rows.len() as f64)
}

/// Arithmetic mean of humidities. Returns `None` for empty input.
pub fn mean_humidity(rows: &[Reading]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    Some(rows.iter().map(|r| r.humidity).sum::<f64>() / rows.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reading(ts: &str, temperature: f64, humidity: f64) -> Reading {
        Reading {
            timestamp: ts.parse().unwrap(),
            temperature,
            humidity,
        }
    }

    #[test]
    fn test_window_durations() {
        assert_eq!(TimeWindow::LastHour.duration(), Duration::hours(1));
        assert_eq!(TimeWindow::LastDay.duration(), Duration::hours(24));
        assert_eq!(TimeWindow::LastWeek.duration(), Duration::days(7));
    }

    #[test]
    fn test_filter_since_keeps_cutoff_boundary() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let rows = vec![
            reading("2024-06-01T11:00:00Z", 20.0, 40.0), // exactly one hour old
            reading("2024-06-01T10:59:59Z", 21.0, 41.0), // one second older
            reading("2024-06-01T11:30:00Z", 22.0, 42.0),
        ];

        let kept = filter_since(&rows, TimeWindow::LastHour, now);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.temperature != 21.0));
    }

    #[test]
    fn test_filter_since_empty_input() {
        let now = Utc::now();
        assert!(filter_since(&[], TimeWindow::LastWeek, now).is_empty());
    }

    #[test]
    fn test_sort_by_time_does_not_mutate_input() {
        let rows = vec![
            reading("2024-06-01T12:00:00Z", 22.0, 42.0),
            reading("2024-06-01T11:00:00Z", 20.0, 40.0),
        ];
        let sorted = sort_by_time(&rows);

        assert_eq!(sorted[0].temperature, 20.0);
        assert_eq!(sorted[1].temperature, 22.0);
        // original order untouched
        assert_eq!(rows[0].temperature, 22.0);
    }

    #[test]
    fn test_latest_picks_most_recent() {
        let rows = vec![
            reading("2024-06-01T11:00:00Z", 20.0, 40.0),
            reading("2024-06-01T12:00:00Z", 23.5, 45.0),
            reading("2024-06-01T10:00:00Z", 19.0, 39.0),
        ];
        assert_eq!(latest(&rows).unwrap().temperature, 23.5);
        assert_eq!(latest(&[]), None);
    }

    #[test]
    fn test_means() {
        let rows = vec![
            reading("2024-06-01T11:00:00Z", 20.0, 40.0),
            reading("2024-06-01T12:00:00Z", 24.0, 50.0),
        ];
        assert_eq!(mean_temperature(&rows), Some(22.0));
        assert_eq!(mean_humidity(&rows), Some(45.0));
        assert_eq!(mean_temperature(&[]), None);
        assert_eq!(mean_humidity(&[]), None);
    }
}
