//! Hour-of-day × magnitude cross-tabulation behind the dashboard heatmap.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Timelike;
use serde::Serialize;

use crate::event::Event;

const LOWEST_BIN: i8 = -1;
const BIN_COUNT: usize = 8;

/// Unit-wide magnitude interval `[lower, lower + 1)` for `lower` in -1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct MagnitudeBin(i8);

impl MagnitudeBin {
    /// Every bin, lowest first.
    pub fn all() -> [MagnitudeBin; BIN_COUNT] {
        std::array::from_fn(|i| MagnitudeBin(LOWEST_BIN + i as i8))
    }

    /// Bin containing `magnitude`. Values below -1, at or above 7, and
    /// non-finite values belong to no bin.
    pub fn from_magnitude(magnitude: f64) -> Option<Self> {
        if !magnitude.is_finite() {
            return None;
        }
        let lower = magnitude.floor();
        let highest = LOWEST_BIN as f64 + (BIN_COUNT - 1) as f64;
        if lower < LOWEST_BIN as f64 || lower > highest {
            return None;
        }
        Some(MagnitudeBin(lower as i8))
    }

    pub fn lower(&self) -> i8 {
        self.0
    }

    fn index(&self) -> usize {
        (self.0 - LOWEST_BIN) as usize
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.0, self.0 + 1)
    }
}

impl fmt::Display for MagnitudeBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<MagnitudeBin> for String {
    fn from(bin: MagnitudeBin) -> Self {
        bin.label()
    }
}

/// Dense event counts by (UTC hour of day, magnitude bin).
///
/// Rows exist for every hour with at least one binned event; each row
/// carries a count for all eight bins, zeros included. Events with a null
/// or out-of-range magnitude are left out entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MagnitudeHourHistogram {
    bins: [MagnitudeBin; BIN_COUNT],
    rows: BTreeMap<u32, [usize; BIN_COUNT]>,
}

impl MagnitudeHourHistogram {
    pub fn from_events(events: &[Event]) -> Self {
        let mut rows: BTreeMap<u32, [usize; BIN_COUNT]> = BTreeMap::new();

        for e in events {
            let Some(bin) = e.magnitude.and_then(MagnitudeBin::from_magnitude) else {
                continue;
            };
            rows.entry(e.time.hour()).or_insert([0; BIN_COUNT])[bin.index()] += 1;
        }

        Self {
            bins: MagnitudeBin::all(),
            rows,
        }
    }

    pub fn bins(&self) -> &[MagnitudeBin] {
        &self.bins
    }

    /// Hours that have a row, ascending.
    pub fn hours(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Counts for one hour, in [`MagnitudeBin::all`] order.
    pub fn row(&self, hour: u32) -> Option<&[usize; BIN_COUNT]> {
        self.rows.get(&hour)
    }

    /// `None` when `hour` has no row.
    pub fn count(&self, hour: u32, bin: MagnitudeBin) -> Option<usize> {
        self.rows.get(&hour).map(|row| row[bin.index()])
    }

    /// Sum over every cell.
    pub fn total(&self) -> usize {
        self.rows.values().flat_map(|row| row.iter()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const T0: i64 = 1_700_000_000; // 22:13:20 UTC

    fn event(hour_offset: i64, mag: Option<f64>) -> Event {
        Event {
            time: DateTime::from_timestamp(T0 + hour_offset * 3600, 0).unwrap(),
            magnitude: mag,
            place: String::new(),
            depth: 0.0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_bin_labels() {
        let labels: Vec<String> = MagnitudeBin::all().iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec!["-1-0", "0-1", "1-2", "2-3", "3-4", "4-5", "5-6", "6-7"]
        );
    }

    #[test]
    fn test_bin_boundaries() {
        assert_eq!(MagnitudeBin::from_magnitude(-1.0).map(|b| b.lower()), Some(-1));
        assert_eq!(MagnitudeBin::from_magnitude(-0.3).map(|b| b.lower()), Some(-1));
        assert_eq!(MagnitudeBin::from_magnitude(0.0).map(|b| b.lower()), Some(0));
        assert_eq!(MagnitudeBin::from_magnitude(6.99).map(|b| b.lower()), Some(6));
        assert_eq!(MagnitudeBin::from_magnitude(7.0), None);
        assert_eq!(MagnitudeBin::from_magnitude(-1.01), None);
        assert_eq!(MagnitudeBin::from_magnitude(f64::NAN), None);
    }

    #[test]
    fn test_histogram_excludes_out_of_range_and_null() {
        let events = vec![
            event(0, Some(1.5)),
            event(0, Some(7.5)),
            event(1, Some(-2.0)),
            event(1, None),
            event(1, Some(4.2)),
        ];
        let h = MagnitudeHourHistogram::from_events(&events);

        assert_eq!(h.total(), 2);
        assert!(h.total() < events.len());
    }

    #[test]
    fn test_histogram_is_dense() {
        let events = vec![event(0, Some(1.5)), event(0, Some(1.7)), event(1, Some(4.2))];
        let h = MagnitudeHourHistogram::from_events(&events);

        assert_eq!(h.hours().collect::<Vec<_>>(), vec![22, 23]);
        let bin_1 = MagnitudeBin::from_magnitude(1.0).unwrap();
        let bin_4 = MagnitudeBin::from_magnitude(4.0).unwrap();
        assert_eq!(h.count(22, bin_1), Some(2));
        assert_eq!(h.count(22, bin_4), Some(0));
        assert_eq!(h.count(23, bin_1), Some(0));
        assert_eq!(h.count(23, bin_4), Some(1));
        assert_eq!(h.row(22).unwrap().len(), 8);
        assert_eq!(h.count(5, bin_1), None);
    }

    #[test]
    fn test_hour_with_only_unbinned_events_has_no_row() {
        let h = MagnitudeHourHistogram::from_events(&[event(0, None), event(0, Some(8.0))]);
        assert!(h.is_empty());
        assert_eq!(h.bins().len(), 8);
    }

    #[test]
    fn test_bin_serializes_as_label() {
        let json = serde_json::to_string(&MagnitudeBin::from_magnitude(2.5).unwrap()).unwrap();
        assert_eq!(json, "\"2-3\"");
    }
}
