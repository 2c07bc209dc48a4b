//! Pipeline constants and environment overrides.

/// USGS summary feed covering the past seven days.
pub const DEFAULT_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// Seconds between automatic dashboard refreshes.
pub const REFRESH_INTERVAL_SECS: u64 = 300;

/// Caller-side timeout wrapped around one whole fetch.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Trailing window, in hours, of the event-rate rolling average.
pub const ROLLING_WINDOW_HOURS: usize = 6;

/// Events at or above this magnitude count as significant.
pub const SIGNIFICANT_MAGNITUDE: f64 = 5.0;

/// Number of rows in the recent-events table.
pub const RECENT_EVENTS: usize = 10;

/// Bin count of the magnitude distribution chart.
pub const DISTRIBUTION_BINS: usize = 30;

/// Timezone used for every timestamp and hour-of-day bucket.
///
/// Feed timestamps are epoch milliseconds and are always read as UTC, so
/// hour-of-day counts and the heatmap do not depend on the host timezone.
pub const HOUR_BUCKET_TIMEZONE: &str = "UTC";

/// Feed URL, overridable with `QUAKE_FEED_URL`.
pub fn feed_url() -> String {
    std::env::var("QUAKE_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string())
}
