//! Angle DAO gauges
//!
//! Endpoint: GET {base}/v1/dao
//! Response: `{ gauges: { list: { <id>: { name, address, deprecated } } } }`

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{gauge_choice, GaugeProvider};
use crate::http::HttpClient;
use crate::types::AngleDaoResponse;

pub struct AngleGauges {
    http: HttpClient,
    base_url: String,
}

impl AngleGauges {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn choices(response: AngleDaoResponse) -> Vec<String> {
        response
            .gauges
            .list
            .into_iter()
            .filter(|(_, gauge)| !gauge.deprecated.unwrap_or(false))
            .map(|(_, gauge)| gauge_choice(&gauge.name, &gauge.address))
            .collect()
    }
}

#[async_trait]
impl GaugeProvider for AngleGauges {
    fn name(&self) -> &'static str {
        "angle"
    }

    async fn fetch_gauges(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1/dao", self.base_url);
        let response: AngleDaoResponse =
            self.http.get_json(&url).await.context("Failed to fetch Angle gauges")?;

        let total = response.gauges.list.len();
        let choices = Self::choices(response);
        debug!("Angle: {} of {} gauges votable", choices.len(), total);
        Ok(choices)
    }
}
