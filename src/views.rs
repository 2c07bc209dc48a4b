//! Plain chart data for the map, distribution, scatter and recent-events
//! panels of the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::event::Event;

/// Display size of a map/scatter marker. Non-positive and null magnitudes
/// get the minimum size.
pub fn marker_size(magnitude: Option<f64>) -> f64 {
    match magnitude {
        Some(m) if m > 0.0 => m * 5.0,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: Option<f64>,
    pub depth: f64,
    pub place: String,
    pub time: DateTime<Utc>,
    pub marker_size: f64,
}

pub fn map_points(events: &[Event]) -> Vec<MapPoint> {
    events
        .iter()
        .map(|e| MapPoint {
            latitude: e.latitude,
            longitude: e.longitude,
            magnitude: e.magnitude,
            depth: e.depth,
            place: e.place.clone(),
            time: e.time,
            marker_size: marker_size(e.magnitude),
        })
        .collect()
}

/// The `n` most recent events, newest first.
pub fn recent_events(events: &[Event], n: usize) -> Vec<Event> {
    let mut recent = events.to_vec();
    recent.sort_by(|a, b| b.time.cmp(&a.time));
    recent.truncate(n);
    recent
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of non-null magnitudes over their observed range.
///
/// Bins are `[lower, upper)` except the last, which also holds the maximum.
/// A single distinct magnitude yields one degenerate bin.
pub fn magnitude_distribution(events: &[Event], bins: usize) -> Vec<DistributionBin> {
    let mags: Vec<f64> = events
        .iter()
        .filter_map(|e| e.magnitude)
        .filter(|m| m.is_finite())
        .collect();
    if bins == 0 || mags.is_empty() {
        return Vec::new();
    }

    let min = mags.iter().copied().fold(f64::INFINITY, f64::min);
    let max = mags.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![DistributionBin {
            lower: min,
            upper: max,
            count: mags.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<DistributionBin> = (0..bins)
        .map(|i| DistributionBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for m in mags {
        let idx = (((m - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthPoint {
    pub depth: f64,
    pub magnitude: f64,
    pub marker_size: f64,
}

/// Depth against magnitude, for events that have a magnitude.
pub fn depth_magnitude_points(events: &[Event]) -> Vec<DepthPoint> {
    events
        .iter()
        .filter_map(|e| {
            let magnitude = e.magnitude?;
            Some(DepthPoint {
                depth: e.depth,
                magnitude,
                marker_size: marker_size(Some(magnitude)),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub time: DateTime<Utc>,
    pub magnitude: f64,
    pub marker_size: f64,
}

/// Magnitudes over time, oldest first. Events without a magnitude are
/// skipped.
pub fn magnitude_timeline(events: &[Event]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = events
        .iter()
        .filter_map(|e| {
            let magnitude = e.magnitude?;
            Some(TimelinePoint {
                time: e.time,
                magnitude,
                marker_size: marker_size(Some(magnitude)),
            })
        })
        .collect();
    points.sort_by_key(|p| p.time);
    points
}
