use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use tracing::debug;

use crate::error::IngestError;
use crate::fetch::{HttpClient, send_checked};
use crate::ingest::MergedRecord;
use crate::services::RecordStore;

const CONFLICT_KEY: &str = "vehicle_id";
const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=representation";

/// A table behind a Supabase/PostgREST endpoint.
///
/// The client must carry the project key, both as `apikey` and as a bearer
/// token (see [`ApiKey`](crate::fetch::auth::ApiKey)).
pub struct PostgrestStore<C> {
    client: C,
    endpoint: Url,
}

impl<C: HttpClient> PostgrestStore<C> {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`. A path
    /// on it (a proxy prefix) is kept.
    pub fn new(client: C, base_url: &str, table: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut endpoint = base.join(&format!("rest/v1/{table}"))?;
        endpoint
            .query_pairs_mut()
            .append_pair("on_conflict", CONFLICT_KEY);
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl<C: HttpClient> RecordStore for PostgrestStore<C> {
    #[tracing::instrument(skip(self, records), fields(records = records.len()))]
    async fn upsert(&self, records: &[MergedRecord]) -> Result<usize, IngestError> {
        if records.is_empty() {
            return Ok(0);
        }

        let body = serde_json::to_vec(records).map_err(|e| IngestError::Persist(e.to_string()))?;

        let mut req = Request::new(Method::POST, self.endpoint.clone());
        let headers = req.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("prefer", HeaderValue::from_static(PREFER_UPSERT));
        *req.body_mut() = Some(body.into());

        let resp = send_checked(&self.client, req)
            .await
            .map_err(|e| IngestError::Persist(format!("{e:#}")))?;

        let rows: Vec<serde_json::Value> = resp
            .json()
            .await
            .map_err(|e| IngestError::Persist(format!("unreadable upsert response: {e}")))?;

        debug!(acknowledged = rows.len(), "Upsert acknowledged");
        Ok(rows.len())
    }
}
