//! Scripted [`HttpClient`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use super::client::HttpClient;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: reqwest::Method,
    pub url: reqwest::Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Replies with queued `(status, body)` pairs in order and records every
/// request it receives.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<VecDeque<(u16, Vec<u8>)>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &[u8]) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_vec()));
        self
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.seen.lock().unwrap().push(SeenRequest {
            method: req.method().clone(),
            url: req.url().clone(),
            headers: req.headers().clone(),
            body: req
                .body()
                .and_then(|b| b.as_bytes())
                .map(<[u8]>::to_vec),
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedClient: no response queued");

        let response = http::Response::builder()
            .status(status)
            .body(body)
            .unwrap();
        Ok(reqwest::Response::from(response))
    }
}
