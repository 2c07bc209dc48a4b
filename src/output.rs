//! Output formatting and persistence for dashboard results.
//!
//! Supports a text rendering through the log, JSON serialization, and CSV
//! append of per-refresh summary records.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::error::QuakeError;
use crate::stats::Summary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row per refresh: the headline metrics, or the error that
/// prevented them.
#[derive(Debug, Default, Serialize)]
pub struct SummaryRecord {
    pub timestamp: DateTime<Utc>,
    pub window: Option<String>,
    pub count: usize,
    pub mean_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub significant_count: usize,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl SummaryRecord {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let s = &dashboard.summary;
        SummaryRecord {
            timestamp: dashboard.generated_at,
            window: Some(dashboard.window.as_str().to_string()),
            count: s.count,
            mean_magnitude: s.mean_magnitude,
            max_magnitude: s.max_magnitude,
            significant_count: s.significant_count,
            ..Default::default()
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(timestamp: DateTime<Utc>, error_type: &str, error_message: &str) -> Self {
        SummaryRecord {
            timestamp,
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    pub fn from_quake_error(timestamp: DateTime<Utc>, err: &QuakeError) -> Self {
        Self::from_error(timestamp, err.kind(), &err.to_string())
    }
}

/// Logs the whole dashboard using Rust's debug pretty-print format.
pub fn print_pretty(dashboard: &Dashboard) {
    debug!("{:#?}", dashboard);
}

/// Logs the dashboard as pretty-printed JSON.
pub fn print_json(dashboard: &Dashboard) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(dashboard)?);
    Ok(())
}

/// Renders the dashboard panels as structured log lines.
pub fn render(dashboard: &Dashboard) {
    let s = &dashboard.summary;
    info!(
        window = dashboard.window.as_str(),
        timezone = dashboard.timezone,
        total = s.count,
        mean_magnitude = %Summary::fmt_metric(s.mean_magnitude),
        max_magnitude = %Summary::fmt_metric(s.max_magnitude),
        significant = s.significant_count,
        "Earthquake summary"
    );

    for e in &dashboard.recent {
        info!(
            time = %e.time.format("%Y-%m-%d %H:%M:%S"),
            place = %e.place,
            magnitude = %e.magnitude.map_or("n/a".to_string(), |m| format!("{m:.1}")),
            depth = %format!("{:.1} km", e.depth),
            "Recent event"
        );
    }

    for (hour, count) in &dashboard.hour_of_day {
        info!(hour, count, "Events by hour of day");
    }

    if let Some(latest) = dashboard.rolling_average.last() {
        info!(
            hour = %latest.hour,
            average = %Summary::fmt_metric(latest.average),
            hours = dashboard.hourly_series.len(),
            "Rolling event rate"
        );
    }

    let labels: Vec<String> = dashboard.heatmap.bins().iter().map(|b| b.label()).collect();
    debug!(bins = ?labels, "Heatmap columns");
    for hour in dashboard.heatmap.hours() {
        if let Some(row) = dashboard.heatmap.row(hour) {
            debug!(hour, counts = ?row, "Heatmap row");
        }
    }
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &SummaryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{TimeWindow, WeekPolicy};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn empty_dashboard() -> Dashboard {
        Dashboard::build(&[], TimeWindow::Last24h, WeekPolicy::Enforce, Utc::now())
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&empty_dashboard());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&empty_dashboard()).unwrap();
    }

    #[test]
    fn test_render_does_not_panic() {
        render(&empty_dashboard());
    }

    #[test]
    fn test_record_from_dashboard() {
        let record = SummaryRecord::from_dashboard(&empty_dashboard());
        assert_eq!(record.window.as_deref(), Some("24h"));
        assert_eq!(record.count, 0);
        assert!(record.error_type.is_none());
    }

    #[test]
    fn test_record_from_error() {
        let err = QuakeError::DataFormat("missing `features` key".to_string());
        let record = SummaryRecord::from_quake_error(Utc::now(), &err);
        assert_eq!(record.error_type.as_deref(), Some("data_format_error"));
        assert!(record.error_message.unwrap().contains("features"));
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("quake_monitor_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &SummaryRecord::default()).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("quake_monitor_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &SummaryRecord::default()).unwrap();
        append_record(&path, &SummaryRecord::from_error(Utc::now(), "fetch_error", "boom")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
