//! Balancer voting gauges
//!
//! Source: static `voting-gauges.json` published in the Balancer frontend repo.
//! Entries: `{ address, network, isKilled, pool: { symbol } }`

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{gauge_choice, GaugeProvider};
use crate::http::HttpClient;
use crate::types::BalancerGauge;

pub struct BalancerGauges {
    http: HttpClient,
    url: String,
}

impl BalancerGauges {
    /// `url` points at the JSON file itself
    pub fn new(http: HttpClient, url: &str) -> Self {
        Self { http, url: url.to_string() }
    }

    /// Ballot choices labelled with the pool symbol
    pub fn choices(gauges: Vec<BalancerGauge>) -> Vec<String> {
        gauges
            .into_iter()
            .filter(BalancerGauge::is_votable)
            .map(|gauge| gauge_choice(&gauge.pool.symbol, &gauge.address))
            .collect()
    }
}

#[async_trait]
impl GaugeProvider for BalancerGauges {
    fn name(&self) -> &'static str {
        "balancer"
    }

    async fn fetch_gauges(&self) -> Result<Vec<String>> {
        let gauges: Vec<BalancerGauge> =
            self.http.get_json(&self.url).await.context("Failed to fetch Balancer gauges")?;

        let total = gauges.len();
        let choices = Self::choices(gauges);
        debug!("Balancer: {} of {} gauges votable", choices.len(), total);
        Ok(choices)
    }
}
