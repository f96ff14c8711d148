//! Curve gauge registry
//!
//! Endpoint: GET {base}/api/getAllGauges
//! Response: `{ data: { <pool name>: { gauge, hasNoCrv, is_killed } } }`

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{gauge_choice, GaugeProvider};
use crate::http::HttpClient;
use crate::types::CurveGaugesResponse;

pub struct CurveGauges {
    http: HttpClient,
    base_url: String,
}

impl CurveGauges {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// Ballot choices labelled with the registry key (pool name)
    pub fn choices(response: CurveGaugesResponse) -> Vec<String> {
        response
            .data
            .into_iter()
            .filter(|(_, gauge)| gauge.is_votable())
            .map(|(name, gauge)| gauge_choice(&name, &gauge.gauge))
            .collect()
    }
}

#[async_trait]
impl GaugeProvider for CurveGauges {
    fn name(&self) -> &'static str {
        "curve"
    }

    async fn fetch_gauges(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/getAllGauges", self.base_url);
        let response: CurveGaugesResponse =
            self.http.get_json(&url).await.context("Failed to fetch Curve gauges")?;

        let total = response.data.len();
        let choices = Self::choices(response);
        debug!("Curve: {} of {} gauges votable", choices.len(), total);
        Ok(choices)
    }
}
