use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::fetch::{HttpClient, fetch_bytes_capped};
use crate::ingest::FeedEntity;
use crate::parser::decode_entities;
use crate::services::TransitSource;

/// Fetch durations above this are logged as slow.
const SLOW_FETCH_SECS: u64 = 15;

/// GTFS-RT feed reachable over HTTP.
///
/// Credentials are attached by wrapping `client`, e.g. in
/// [`ApiKey::bearer`](crate::fetch::auth::ApiKey::bearer).
pub struct GtfsRtSource<C> {
    client: C,
    url: String,
    max_bytes: usize,
}

impl<C: HttpClient> GtfsRtSource<C> {
    pub fn new(client: C, url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            client,
            url: url.into(),
            max_bytes,
        }
    }
}

#[async_trait]
impl<C: HttpClient> TransitSource for GtfsRtSource<C> {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_entities(&self) -> Result<Vec<FeedEntity>, IngestError> {
        let fetch_start = std::time::Instant::now();
        let bytes = fetch_bytes_capped(&self.client, &self.url, self.max_bytes)
            .await
            .map_err(|e| IngestError::TransitFetch(format!("{e:#}")))?;

        let elapsed = fetch_start.elapsed();
        if elapsed.as_secs() > SLOW_FETCH_SECS {
            warn!(elapsed_secs = elapsed.as_secs(), "Feed fetch was slow");
        }

        debug!(bytes = bytes.len(), "Feed bytes received, parsing");
        let entities = decode_entities(&bytes)?;
        debug!(entity_count = entities.len(), "Feed parsed successfully");

        Ok(entities)
    }
}
