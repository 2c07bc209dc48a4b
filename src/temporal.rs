//! Time-based aggregations: hour-of-day counts, a gap-free hourly series,
//! and its trailing rolling average.
//!
//! All hours are UTC hours (see [`crate::config::HOUR_BUCKET_TIMEZONE`]).

use std::collections::BTreeMap;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::event::Event;

const SECS_PER_HOUR: i64 = 3600;

/// Event counts keyed by hour of day (0..=23). Hours without events are
/// absent.
pub fn hour_of_day_counts(events: &[Event]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for e in events {
        *counts.entry(e.time.hour()).or_insert(0) += 1;
    }
    counts
}

/// Index of the UTC hour containing `t`, counted from the epoch.
fn hour_index(t: DateTime<Utc>) -> i64 {
    t.timestamp().div_euclid(SECS_PER_HOUR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyCount {
    pub hour: DateTime<Utc>,
    pub count: usize,
}

/// Per-hour event counts covering every hour between the first and last
/// observed hour, zero-filled. Keys are strictly increasing and exactly one
/// hour apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HourlySeries {
    points: Vec<HourlyCount>,
}

impl HourlySeries {
    /// Buckets events by hour and reindexes over the observed range. An
    /// empty table gives an empty series.
    pub fn from_events(events: &[Event]) -> Self {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for e in events {
            *counts.entry(hour_index(e.time)).or_insert(0) += 1;
        }

        let (Some((&first, _)), Some((&last, _))) =
            (counts.first_key_value(), counts.last_key_value())
        else {
            return Self::default();
        };

        let points = (first..=last)
            .filter_map(|h| {
                Some(HourlyCount {
                    hour: DateTime::from_timestamp(h * SECS_PER_HOUR, 0)?,
                    count: counts.get(&h).copied().unwrap_or(0),
                })
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[HourlyCount] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub hour: DateTime<Utc>,
    /// `None` until `window` hours of history exist.
    pub average: Option<f64>,
}

/// Trailing mean over `window` consecutive hours of `series`.
///
/// The first `window - 1` points have no full window and carry `None`. A
/// window of zero never fills, so every point is `None`.
pub fn rolling_average(series: &HourlySeries, window: usize) -> Vec<RollingPoint> {
    let points = series.points();
    let mut sum = 0usize;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            sum += p.count;
            if window > 0 && i >= window {
                sum -= points[i - window].count;
            }
            let average = (window > 0 && i + 1 >= window).then(|| sum as f64 / window as f64);
            RollingPoint {
                hour: p.hour,
                average,
            }
        })
        .collect()
}
