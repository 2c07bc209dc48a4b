//! Recency-window filtering of the event table.

use chrono::{DateTime, TimeDelta, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::event::{Event, EventTable};

/// Caller-selected recency window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[default]
    #[value(name = "24h")]
    Last24h,
    #[value(name = "48h")]
    Last48h,
    #[value(name = "7d")]
    Last7d,
    All,
}

/// Whether [`TimeWindow::Last7d`] actually filters or passes every event
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WeekPolicy {
    #[default]
    Enforce,
    PassThrough,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Last24h => "24h",
            TimeWindow::Last48h => "48h",
            TimeWindow::Last7d => "7d",
            TimeWindow::All => "all",
        }
    }

    /// Retention span under `policy`, or `None` when nothing is filtered.
    pub fn duration(&self, policy: WeekPolicy) -> Option<TimeDelta> {
        match (self, policy) {
            (TimeWindow::Last24h, _) => Some(TimeDelta::hours(24)),
            (TimeWindow::Last48h, _) => Some(TimeDelta::hours(48)),
            (TimeWindow::Last7d, WeekPolicy::Enforce) => Some(TimeDelta::days(7)),
            (TimeWindow::Last7d, WeekPolicy::PassThrough) => None,
            (TimeWindow::All, _) => None,
        }
    }
}

/// Keeps events with `time > now - window`, preserving order.
///
/// `now` is supplied by the caller and used for every row.
pub fn filter_events(
    events: &[Event],
    window: TimeWindow,
    policy: WeekPolicy,
    now: DateTime<Utc>,
) -> EventTable {
    match window.duration(policy) {
        Some(span) => {
            let cutoff = now - span;
            events.iter().filter(|e| e.time > cutoff).cloned().collect()
        }
        None => events.to_vec(),
    }
}
