use async_trait::async_trait;

use crate::error::IngestError;
use crate::ingest::FeedEntity;

/// Provider of the real-time vehicle feed.
#[async_trait]
pub trait TransitSource: Send + Sync {
    /// Fetches and decodes the current feed.
    ///
    /// Fails with [`IngestError::TransitFetch`] or [`IngestError::Decode`].
    async fn fetch_entities(&self) -> Result<Vec<FeedEntity>, IngestError>;
}
