use serde::Serialize;

use crate::config::SIGNIFICANT_MAGNITUDE;
use crate::event::Event;

/// Headline metrics of the dashboard.
///
/// Mean and max are taken over non-null magnitudes only and are `None`
/// when the table has no magnitude at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub significant_count: usize,
}

impl Summary {
    pub fn from_events(events: &[Event]) -> Self {
        let mut s = Summary {
            count: events.len(),
            ..Default::default()
        };

        let mut sum = 0.0;
        let mut with_magnitude = 0usize;

        for mag in events.iter().filter_map(|e| e.magnitude) {
            with_magnitude += 1;
            sum += mag;

            s.max_magnitude = Some(match s.max_magnitude {
                Some(max) => max.max(mag),
                None => mag,
            });

            if mag >= SIGNIFICANT_MAGNITUDE {
                s.significant_count += 1;
            }
        }

        if with_magnitude > 0 {
            s.mean_magnitude = Some(sum / with_magnitude as f64);
        }

        s
    }

    /// Renders an optional metric with two decimals, `n/a` when undefined.
    pub fn fmt_metric(value: Option<f64>) -> String {
        match value {
            Some(v) => format!("{v:.2}"),
            None => "n/a".to_string(),
        }
    }
}
