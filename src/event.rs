//! Normalized seismic events.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::QuakeError;
use crate::parser::RawFeature;

/// One seismic occurrence, flattened out of a feed feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub time: DateTime<Utc>,
    /// `None` when the feed reports a null magnitude.
    pub magnitude: Option<f64>,
    pub place: String,
    /// Depth in km.
    pub depth: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Events in feed order, which is not guaranteed to be chronological.
pub type EventTable = Vec<Event>;

/// Flattens raw features into an [`EventTable`], one event per feature, in
/// input order.
///
/// Fails on the first feature without a timestamp or with fewer than three
/// coordinates.
pub fn normalize(features: &[RawFeature]) -> Result<EventTable, QuakeError> {
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| Event::from_feature(index, feature))
        .collect()
}

impl Event {
    fn from_feature(index: usize, feature: &RawFeature) -> Result<Self, QuakeError> {
        let millis = feature
            .properties
            .time
            .ok_or_else(|| QuakeError::malformed(index, "missing properties.time"))?;
        let time = DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| QuakeError::malformed(index, format!("timestamp {millis} out of range")))?;

        let coords = &feature.geometry.coordinates;
        if coords.len() < 3 {
            return Err(QuakeError::malformed(
                index,
                format!("expected 3 coordinates, found {}", coords.len()),
            ));
        }

        Ok(Event {
            time,
            magnitude: feature.properties.mag,
            place: feature.properties.place.clone().unwrap_or_default(),
            depth: coords[2],
            latitude: coords[1],
            longitude: coords[0],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{RawGeometry, RawProperties};

    fn feature(time: Option<i64>, mag: Option<f64>, coordinates: Vec<f64>) -> RawFeature {
        RawFeature {
            properties: RawProperties {
                time,
                mag,
                place: Some("5 km SW of Volcano, Hawaii".to_string()),
            },
            geometry: RawGeometry { coordinates },
        }
    }

    #[test]
    fn test_normalize_maps_fields() {
        let events =
            normalize(&[feature(Some(1_700_000_000_500), Some(2.3), vec![-155.2, 19.4, 1.8])])
                .unwrap();

        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.time.timestamp(), 1_700_000_000);
        assert_eq!(e.time.timestamp_subsec_millis(), 500);
        assert_eq!(e.magnitude, Some(2.3));
        assert_eq!(e.longitude, -155.2);
        assert_eq!(e.latitude, 19.4);
        assert_eq!(e.depth, 1.8);
        assert_eq!(e.place, "5 km SW of Volcano, Hawaii");
    }

    #[test]
    fn test_normalize_preserves_order() {
        let events = normalize(&[
            feature(Some(3_000), None, vec![0.0, 0.0, 0.0]),
            feature(Some(1_000), None, vec![0.0, 0.0, 0.0]),
            feature(Some(2_000), None, vec![0.0, 0.0, 0.0]),
        ])
        .unwrap();

        let secs: Vec<i64> = events.iter().map(|e| e.time.timestamp()).collect();
        assert_eq!(secs, vec![3, 1, 2]);
    }

    #[test]
    fn test_normalize_null_magnitude_passes_through() {
        let events = normalize(&[feature(Some(0), None, vec![1.0, 2.0, 3.0])]).unwrap();
        assert_eq!(events[0].magnitude, None);
    }

    #[test]
    fn test_normalize_missing_place_is_empty() {
        let mut raw = feature(Some(0), Some(1.0), vec![1.0, 2.0, 3.0]);
        raw.properties.place = None;
        let events = normalize(&[raw]).unwrap();
        assert_eq!(events[0].place, "");
    }

    #[test]
    fn test_normalize_missing_time_fails() {
        let result = normalize(&[
            feature(Some(0), Some(1.0), vec![1.0, 2.0, 3.0]),
            feature(None, Some(1.0), vec![1.0, 2.0, 3.0]),
        ]);
        match result {
            Err(QuakeError::MalformedRecord { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_short_coordinates_fails() {
        let result = normalize(&[feature(Some(0), Some(1.0), vec![1.0, 2.0])]);
        assert!(matches!(result, Err(QuakeError::MalformedRecord { index: 0, .. })));
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).unwrap().is_empty());
    }
}
