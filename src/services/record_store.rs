use async_trait::async_trait;

use crate::error::IngestError;
use crate::ingest::MergedRecord;

/// Persistent store of merged vehicle records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Upserts `records` in one batch keyed by `vehicle_id`, replacing any
    /// existing row with the same key.
    ///
    /// Returns the number of rows the store acknowledged. Fails with
    /// [`IngestError::Persist`].
    async fn upsert(&self, records: &[MergedRecord]) -> Result<usize, IngestError>;
}
