//! Frax gauges
//!
//! Endpoint: GET {base}/v2/gauges
//! Response: `{ gauges: [{ name, address }] }` (all listed gauges are votable)

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{gauge_choice, GaugeProvider};
use crate::http::HttpClient;
use crate::types::FraxGaugesResponse;

pub struct FraxGauges {
    http: HttpClient,
    base_url: String,
}

impl FraxGauges {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }
}

#[async_trait]
impl GaugeProvider for FraxGauges {
    fn name(&self) -> &'static str {
        "frax"
    }

    async fn fetch_gauges(&self) -> Result<Vec<String>> {
        let url = format!("{}/v2/gauges", self.base_url);
        let response: FraxGaugesResponse =
            self.http.get_json(&url).await.context("Failed to fetch Frax gauges")?;

        debug!("Frax: {} gauges", response.gauges.len());
        Ok(response.gauges.iter().map(|g| gauge_choice(&g.name, &g.address)).collect())
    }
}
