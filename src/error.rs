//! Error taxonomy for one ingestion cycle.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("feed decode error: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("transit fetch error: {0}")]
    TransitFetch(String),
    #[error("weather fetch error: {0}")]
    WeatherFetch(String),
    #[error("persist error: {0}")]
    Persist(String),
}

impl IngestError {
    /// Returns `true` for failures raised while fetching upstream data.
    ///
    /// These put the scheduler into backoff. A [`IngestError::Persist`]
    /// failure does not.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, IngestError::Persist(_))
    }
}
