//! Application state owned by the orchestration shell.
//!
//! One struct holds the current reading collection and the selected
//! window. Rendering is an explicit synchronous projection of this state,
//! invoked after every successful transition; nothing re-renders
//! implicitly.

use chrono::Utc;
use tracing::{info, warn};

use crate::readings::{self, Reading, TimeWindow};
use crate::summary::DashboardSummary;

#[derive(Debug, Default)]
pub struct AppState {
    rows: Vec<Reading>,
    window: TimeWindow,
}

impl AppState {
    pub fn new(window: TimeWindow) -> Self {
        AppState {
            rows: Vec::new(),
            window,
        }
    }

    /// Replaces the whole collection with the latest poll's result.
    /// Readings are never merged or mutated in place; a poll either
    /// supersedes the previous snapshot entirely or (on error) leaves it
    /// untouched.
    pub fn replace_rows(&mut self, rows: Vec<Reading>) {
        self.rows = rows;
    }

    pub fn set_window(&mut self, window: TimeWindow) {
        self.window = window;
    }

    pub fn rows(&self) -> &[Reading] {
        &self.rows
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Rows within the selected window, oldest first, ready for charting.
    pub fn windowed_rows(&self) -> Vec<Reading> {
        readings::sort_by_time(&readings::filter_since(&self.rows, self.window, Utc::now()))
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::from_readings(&self.rows)
    }
}

/// Projects the state to the log. Stands in for the DOM/chart layer, which
/// is outside this crate.
pub fn render(state: &AppState) {
    let summary = state.summary();

    if state.rows().is_empty() {
        warn!("No valid data. The sensor may not have been running.");
        return;
    }

    let windowed = state.windowed_rows();
    info!(
        window = ?state.window(),
        rows_in_window = windowed.len(),
        total_rows = state.rows().len(),
        current_temperature = summary.current_temperature,
        current_humidity = summary.current_humidity,
        avg_temperature_24h = summary.avg_temperature_24h,
        avg_humidity_24h = summary.avg_humidity_24h,
        comfort_score = summary.comfort_score,
        comfort_label = summary.comfort_label.as_deref().unwrap_or("—"),
        comfort_icon = summary.comfort_icon.as_deref().unwrap_or("—"),
        "Dashboard"
    );
}
