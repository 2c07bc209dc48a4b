mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use tracing::debug;

use crate::error::QuakeError;
use crate::event::{EventTable, normalize};
use crate::parser::parse_feed;

/// Issues one GET to `url` and returns the body.
///
/// Non-success statuses are errors. Nothing is retried or cached.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>, QuakeError> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| QuakeError::Fetch(format!("invalid feed URL {url}: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client.execute(req).await?.error_for_status()?;
    let bytes = resp.bytes().await?.to_vec();
    debug!(bytes = bytes.len(), "Feed body received");
    Ok(bytes)
}

/// Fetches the feed at `url` and normalizes it into an [`EventTable`].
#[tracing::instrument(skip(client))]
pub async fn fetch_events<C: HttpClient>(client: &C, url: &str) -> Result<EventTable, QuakeError> {
    let bytes = fetch_bytes(client, url).await?;
    events_from_bytes(&bytes)
}

/// Parses and normalizes a feed body already in memory.
pub fn events_from_bytes(bytes: &[u8]) -> Result<EventTable, QuakeError> {
    let features = parse_feed(bytes)?;
    let events = normalize(&features)?;
    debug!(events = events.len(), "Feed normalized");
    Ok(events)
}
