//! GeoJSON parser for the seismic event feed.

use serde::Deserialize;
use serde_json::Value;

use crate::error::QuakeError;

/// One feature of the feed, read leniently so that missing fields can be
/// reported per record by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub properties: RawProperties,
    #[serde(default)]
    pub geometry: RawGeometry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    /// Epoch milliseconds.
    pub time: Option<i64>,
    pub mag: Option<f64>,
    pub place: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeometry {
    /// `[longitude, latitude, depth_km]`
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Decodes the feed document and returns its features in document order.
///
/// # Errors
///
/// Returns [`QuakeError::DataFormat`] if the bytes are not JSON or the
/// document has no `features` array, and [`QuakeError::MalformedRecord`] if
/// an element of `features` is not a feature object.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawFeature>, QuakeError> {
    let doc: Value = serde_json::from_slice(bytes)
        .map_err(|e| QuakeError::DataFormat(format!("invalid JSON: {e}")))?;

    let features = match doc.get("features") {
        Some(Value::Array(features)) => features,
        Some(_) => {
            return Err(QuakeError::DataFormat(
                "`features` is not an array".to_string(),
            ));
        }
        None => return Err(QuakeError::DataFormat("missing `features` key".to_string())),
    };

    features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            RawFeature::deserialize(feature).map_err(|e| QuakeError::malformed(index, e.to_string()))
        })
        .collect()
}
