//! GET requests against the dashboard API

use crate::{prelude::HashMap, MapError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Mutex;

/// Shared HTTP client. Building it once keeps one connection pool for the page.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    let builder = Client::builder();
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder.user_agent(concat!("waveradar/", env!("CARGO_PKG_VERSION")));
    builder.build().unwrap_or_else(|e| {
        log::warn!("falling back to a default HTTP client: {}", e);
        Client::new()
    })
});

/// Transport used by the data binder and the static map image check
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Fetcher: Send + Sync {
    /// GETs `url` and parses the body as JSON. Non-2xx statuses are errors.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value>;

    /// GETs `url` and returns the raw body. Non-2xx statuses are errors.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`Fetcher`] over the shared reqwest client
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl HttpFetcher {
    async fn send(url: &str) -> Result<reqwest::Response> {
        let response = HTTP_CLIENT.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, url));
        }
        Ok(response)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        log::debug!("GET {}", url);
        Ok(Self::send(url).await?.json().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);
        Ok(Self::send(url).await?.bytes().await?.to_vec())
    }
}

fn status_error(status: impl std::fmt::Display, url: &str) -> MapError {
    MapError::Network(format!("HTTP {} from {}", status, url))
}

/// Canned response of a [`CannedFetcher`]
#[derive(Debug, Clone, PartialEq)]
pub enum CannedResponse {
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    /// Any non-2xx status
    Status(u16),
}

/// Serves fixed responses by URL and records every request. Unknown URLs get a 404.
#[derive(Debug, Default)]
pub struct CannedFetcher {
    responses: HashMap<String, CannedResponse>,
    requests: Mutex<Vec<String>>,
}

impl CannedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.responses.insert(url.into(), CannedResponse::Json(body));
        self
    }

    pub fn with_bytes(mut self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.responses.insert(url.into(), CannedResponse::Bytes(body));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.responses.insert(url.into(), CannedResponse::Status(status));
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn respond(&self, url: &str) -> Result<&CannedResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.responses
            .get(url)
            .ok_or_else(|| status_error(404, url))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Fetcher for CannedFetcher {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        match self.respond(url)? {
            CannedResponse::Json(body) => Ok(body.clone()),
            CannedResponse::Bytes(bytes) => Ok(serde_json::from_slice(bytes)?),
            CannedResponse::Status(status) => Err(status_error(*status, url)),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        match self.respond(url)? {
            CannedResponse::Json(body) => Ok(serde_json::to_vec(body)?),
            CannedResponse::Bytes(bytes) => Ok(bytes.clone()),
            CannedResponse::Status(status) => Err(status_error(*status, url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_responses() {
        let fetcher = CannedFetcher::new()
            .with_json("http://api/stats", serde_json::json!({"ok": true}))
            .with_status("http://api/down", 503);

        assert_eq!(
            fetcher.get_json("http://api/stats").await.unwrap()["ok"],
            true
        );
        assert!(matches!(
            fetcher.get_json("http://api/down").await,
            Err(MapError::Network(msg)) if msg.contains("503")
        ));
        assert!(fetcher.get_bytes("http://api/missing").await.is_err());
        assert_eq!(fetcher.requests().len(), 3);
    }
}
