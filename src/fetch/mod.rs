mod basic;
mod client;
pub mod auth;

#[cfg(test)]
pub(crate) mod mock;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, bail};
use bytes::{Bytes, BytesMut};
use serde::de::DeserializeOwned;

/// Sends `req` and fails on any non-2xx status.
pub async fn send_checked<C: HttpClient + ?Sized>(
    client: &C,
    req: reqwest::Request,
) -> Result<reqwest::Response> {
    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("HTTP {status}: {}", body.trim());
    }
    Ok(resp)
}

/// GETs `url` and returns the body, giving up as soon as it is known to
/// exceed `max_bytes`: up front from `Content-Length`, otherwise while
/// streaming.
pub async fn fetch_bytes_capped<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
    max_bytes: usize,
) -> Result<Bytes> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    let mut resp = send_checked(client, req).await?;

    if let Some(declared) = resp.content_length() {
        if declared > max_bytes as u64 {
            bail!("body too large: {declared} bytes declared (max {max_bytes} bytes)");
        }
    }

    let mut body = BytesMut::new();
    while let Some(chunk) = resp.chunk().await? {
        if body.len() + chunk.len() > max_bytes {
            bail!("body too large: more than {max_bytes} bytes received");
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// GETs `url` and deserializes the JSON body into `T`.
pub async fn fetch_json<C, T>(client: &C, url: reqwest::Url) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let req = reqwest::Request::new(reqwest::Method::GET, url);
    let resp = send_checked(client, req).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
