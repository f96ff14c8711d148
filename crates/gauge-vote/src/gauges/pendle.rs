//! Pendle markets
//!
//! Endpoint: GET {base}/core/v1/1/markets?limit=20&is_expired=false
//! Response: `{ results: [{ address, pt: { name, chainId } }] }`
//!
//! Choices keep the full market address, prefixed with the chain id.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::GaugeProvider;
use crate::http::HttpClient;
use crate::types::{PendleMarket, PendleMarketsResponse};

/// Markets requested per call (first page only)
const MARKETS_LIMIT: u32 = 20;

/// Principal token name prefix dropped from labels
const PT_PREFIX: &str = "PT ";

pub struct PendleGauges {
    http: HttpClient,
    base_url: String,
}

impl PendleGauges {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// `"PT stETH"` -> `"stETH"`; only the first occurrence is removed
    pub fn market_label(pt_name: &str) -> String {
        pt_name.replacen(PT_PREFIX, "", 1)
    }

    /// `"<label> - <chainId>-<address>"`
    pub fn choice(market: &PendleMarket) -> String {
        format!("{} - {}-{}", Self::market_label(&market.pt.name), market.pt.chain_id, market.address)
    }
}

#[async_trait]
impl GaugeProvider for PendleGauges {
    fn name(&self) -> &'static str {
        "pendle"
    }

    async fn fetch_gauges(&self) -> Result<Vec<String>> {
        let url = format!(
            "{}/core/v1/1/markets?limit={}&is_expired=false",
            self.base_url, MARKETS_LIMIT
        );
        let response: PendleMarketsResponse =
            self.http.get_json(&url).await.context("Failed to fetch Pendle markets")?;

        debug!("Pendle: {} active markets", response.results.len());
        Ok(response.results.iter().map(Self::choice).collect())
    }
}
