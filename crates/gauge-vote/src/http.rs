//! Shared JSON-over-HTTP client
//!
//! One `reqwest::Client` is built per run and cloned into every API client.
//! Non-2xx responses and unparseable bodies are errors; there is no retry.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Request timeout for every upstream API
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// JSON HTTP client
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new client with the default timeout
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.context("HTTP request failed")?;
        Self::decode(response, url).await
    }

    /// POST `body` as JSON to `url` and decode the JSON response into `T`
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);

        let response =
            self.client.post(url).json(body).send().await.context("HTTP request failed")?;
        Self::decode(response, url).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        let body = response.text().await.context("Failed to read response body")?;
        serde_json::from_str(&body).with_context(|| format!("Failed to parse response from {}", url))
    }
}
