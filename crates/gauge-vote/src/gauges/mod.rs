//! Gauge providers
//!
//! One provider per protocol. Each fetches its gauge list, drops entries that
//! cannot receive votes and returns ballot choices in upstream order.
//!
//! # Components
//! - `CurveGauges`: GET /api/getAllGauges
//! - `BalancerGauges`: static voting-gauges.json
//! - `AngleGauges`: GET /v1/dao
//! - `FraxGauges`: GET /v2/gauges
//! - `PendleGauges`: GET /core/v1/1/markets

mod angle;
mod balancer;
mod curve;
mod frax;
mod pendle;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Endpoints;
use crate::http::HttpClient;
use crate::types::Space;

pub use angle::AngleGauges;
pub use balancer::BalancerGauges;
pub use curve::CurveGauges;
pub use frax::FraxGauges;
pub use pendle::PendleGauges;

/// Characters kept from the start of an address
const ADDRESS_HEAD: usize = 17;

/// Characters kept from the end of an address
const ADDRESS_TAIL: usize = 2;

/// Source of ballot choices for one space
#[async_trait]
pub trait GaugeProvider: Send + Sync {
    /// Protocol name, for logs
    fn name(&self) -> &'static str;

    /// Fetch votable gauges as ballot choices
    async fn fetch_gauges(&self) -> Result<Vec<String>>;
}

/// `0x1234567890abcdef1234...5678` -> first 17 chars + `…` + last 2 chars
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(ADDRESS_HEAD).collect();
    let tail: String = chars[chars.len().saturating_sub(ADDRESS_TAIL)..].iter().collect();
    format!("{}…{}", head, tail)
}

/// `"<label> - <shortened address>"`
pub fn gauge_choice(label: &str, address: &str) -> String {
    format!("{} - {}", label, shorten_address(address))
}

/// The provider feeding a space's gauge vote
pub fn provider_for(space: Space, http: &HttpClient, endpoints: &Endpoints) -> Box<dyn GaugeProvider> {
    let http = http.clone();
    match space {
        Space::Crv => Box::new(CurveGauges::new(http, &endpoints.curve)),
        Space::Fxs => Box::new(FraxGauges::new(http, &endpoints.frax)),
        Space::Angle => Box::new(AngleGauges::new(http, &endpoints.angle)),
        Space::Bal => Box::new(BalancerGauges::new(http, &endpoints.balancer)),
        Space::Pendle => Box::new(PendleGauges::new(http, &endpoints.pendle)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x7ca5b0a2910B33e9759DC7dDB0413949071D7575";

    #[test]
    fn test_shorten_address() {
        let short = shorten_address(ADDRESS);
        assert_eq!(short, "0x7ca5b0a2910B33e…75");
        assert_eq!(short, shorten_address(ADDRESS));
    }

    #[test]
    fn test_shorten_address_minimum_length() {
        // 19 chars: head and tail meet exactly
        assert_eq!(shorten_address("0123456789abcdefghi"), "0123456789abcdefg…hi");
    }

    #[test]
    fn test_shorten_short_input_does_not_panic() {
        assert_eq!(shorten_address("0x1"), "0x1…x1");
        assert_eq!(shorten_address("a"), "a…a");
        assert_eq!(shorten_address(""), "…");
    }

    #[test]
    fn test_gauge_choice_format() {
        assert_eq!(gauge_choice("3pool", ADDRESS), "3pool - 0x7ca5b0a2910B33e…75");
    }

    #[test]
    fn test_provider_table() {
        let http = HttpClient::new().unwrap();
        let endpoints = Endpoints::default();
        let names: Vec<&str> =
            Space::ALL.iter().map(|s| provider_for(*s, &http, &endpoints).name()).collect();
        assert_eq!(names, vec!["curve", "frax", "angle", "balancer", "pendle"]);
    }
}
