use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes a prepared request. Decorators in [`crate::fetch::auth`] wrap an
/// implementation to attach credentials.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
