//! Error types for the feed pipeline.

use thiserror::Error;

/// Errors surfaced by the fetch → parse → normalize pipeline.
///
/// None of these are retried or skipped; the first one aborts the pass.
#[derive(Debug, Error)]
pub enum QuakeError {
    /// Transport failure, bad URL, or a non-success HTTP status.
    #[error("feed fetch failed: {0}")]
    Fetch(String),

    /// The body is not JSON or lacks a `features` array.
    #[error("feed document is malformed: {0}")]
    DataFormat(String),

    /// A single feature is missing a required field.
    #[error("feature {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

impl From<reqwest::Error> for QuakeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            QuakeError::Fetch(format!("request timed out: {err}"))
        } else {
            QuakeError::Fetch(err.to_string())
        }
    }
}

impl QuakeError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        QuakeError::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Short machine-readable tag used in CSV error records.
    pub fn kind(&self) -> &'static str {
        match self {
            QuakeError::Fetch(_) => "fetch_error",
            QuakeError::DataFormat(_) => "data_format_error",
            QuakeError::MalformedRecord { .. } => "malformed_record_error",
        }
    }
}
