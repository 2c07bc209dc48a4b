//! One full dashboard pass: filter once, then fan out to every view.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::{DISTRIBUTION_BINS, HOUR_BUCKET_TIMEZONE, RECENT_EVENTS, ROLLING_WINDOW_HOURS};
use crate::error::QuakeError;
use crate::event::Event;
use crate::fetch::{HttpClient, fetch_events};
use crate::filter::{TimeWindow, WeekPolicy, filter_events};
use crate::histogram::MagnitudeHourHistogram;
use crate::stats::Summary;
use crate::temporal::{HourlySeries, RollingPoint, hour_of_day_counts, rolling_average};
use crate::views::{
    DepthPoint, DistributionBin, MapPoint, TimelinePoint, depth_magnitude_points, magnitude_distribution,
    magnitude_timeline, map_points, recent_events,
};

/// Everything a renderer needs for one refresh, as plain data.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub window: TimeWindow,
    pub week_policy: WeekPolicy,
    pub timezone: &'static str,
    pub summary: Summary,
    pub map: Vec<MapPoint>,
    pub recent: Vec<Event>,
    pub distribution: Vec<DistributionBin>,
    pub depth_vs_magnitude: Vec<DepthPoint>,
    pub timeline: Vec<TimelinePoint>,
    pub hour_of_day: BTreeMap<u32, usize>,
    pub hourly_series: HourlySeries,
    pub rolling_average: Vec<RollingPoint>,
    pub heatmap: MagnitudeHourHistogram,
}

impl Dashboard {
    /// Builds every view from `events` restricted to `window` as of `now`.
    pub fn build(
        events: &[Event],
        window: TimeWindow,
        week_policy: WeekPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let filtered = filter_events(events, window, week_policy, now);
        let hourly_series = HourlySeries::from_events(&filtered);
        let rolling = rolling_average(&hourly_series, ROLLING_WINDOW_HOURS);

        Dashboard {
            generated_at: now,
            window,
            week_policy,
            timezone: HOUR_BUCKET_TIMEZONE,
            summary: Summary::from_events(&filtered),
            map: map_points(&filtered),
            recent: recent_events(&filtered, RECENT_EVENTS),
            distribution: magnitude_distribution(&filtered, DISTRIBUTION_BINS),
            depth_vs_magnitude: depth_magnitude_points(&filtered),
            timeline: magnitude_timeline(&filtered),
            hour_of_day: hour_of_day_counts(&filtered),
            hourly_series,
            rolling_average: rolling,
            heatmap: MagnitudeHourHistogram::from_events(&filtered),
        }
    }
}

/// Fetches the feed and builds a [`Dashboard`]. Any error aborts the pass,
/// so a caller never sees a partially built dashboard.
#[tracing::instrument(skip(client, now), fields(window = window.as_str()))]
pub async fn run_pipeline<C: HttpClient>(
    client: &C,
    url: &str,
    window: TimeWindow,
    week_policy: WeekPolicy,
    now: DateTime<Utc>,
) -> Result<Dashboard, QuakeError> {
    let events = fetch_events(client, url).await?;
    let dashboard = Dashboard::build(&events, window, week_policy, now);
    info!(
        fetched = events.len(),
        retained = dashboard.summary.count,
        "Dashboard built"
    );
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn event(time: DateTime<Utc>, mag: Option<f64>) -> Event {
        Event {
            time,
            magnitude: mag,
            place: String::new(),
            depth: 5.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_build_filters_before_aggregating() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let events = vec![
            event(now - TimeDelta::hours(2), Some(2.0)),
            event(now - TimeDelta::hours(1), Some(3.0)),
            event(now - TimeDelta::hours(50), Some(6.0)),
        ];

        let dashboard = Dashboard::build(&events, TimeWindow::Last24h, WeekPolicy::Enforce, now);

        assert_eq!(dashboard.summary.count, 2);
        assert_eq!(dashboard.summary.significant_count, 0);
        assert_eq!(dashboard.map.len(), 2);
        assert_eq!(dashboard.hourly_series.len(), 2);
        assert_eq!(dashboard.heatmap.total(), 2);
        assert_eq!(dashboard.recent[0].magnitude, Some(3.0));
        assert_eq!(dashboard.timezone, "UTC");
    }

    #[test]
    fn test_build_empty_table() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let dashboard = Dashboard::build(&[], TimeWindow::All, WeekPolicy::Enforce, now);

        assert_eq!(dashboard.summary.count, 0);
        assert_eq!(dashboard.summary.mean_magnitude, None);
        assert!(dashboard.hourly_series.is_empty());
        assert!(dashboard.rolling_average.is_empty());
        assert!(dashboard.heatmap.is_empty());
        assert!(dashboard.distribution.is_empty());
    }

    #[test]
    fn test_dashboard_serializes() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let dashboard = Dashboard::build(&[event(now, None)], TimeWindow::All, WeekPolicy::Enforce, now);
        let json = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(json["window"], "all");
        assert!(json["summary"]["mean_magnitude"].is_null());
    }
}
