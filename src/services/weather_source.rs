use async_trait::async_trait;

use crate::error::IngestError;
use crate::ingest::WeatherCondition;

/// Provider of the current weather at one fixed coordinate.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fails with [`IngestError::WeatherFetch`].
    async fn current_condition(&self) -> Result<WeatherCondition, IngestError>;
}
