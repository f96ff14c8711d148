//! Endpoint configuration
//!
//! Every upstream URL has a built-in default and can be overridden through the
//! environment (a `.env` file is honored by the binary).
//!
//! | Variable                     | Default                                  |
//! |------------------------------|------------------------------------------|
//! | `GAUGE_VOTE_LLAMA_URL`       | `https://coins.llama.fi`                 |
//! | `GAUGE_VOTE_CURVE_URL`       | `https://api.curve.fi`                   |
//! | `GAUGE_VOTE_BALANCER_URL`    | Balancer frontend `voting-gauges.json`   |
//! | `GAUGE_VOTE_ANGLE_URL`       | `https://api.angle.money`                |
//! | `GAUGE_VOTE_FRAX_URL`        | `https://api.frax.finance`               |
//! | `GAUGE_VOTE_PENDLE_URL`      | `https://api-v2.pendle.finance`          |
//! | `GAUGE_VOTE_HUB_GRAPHQL_URL` | `https://hub.snapshot.org/graphql`       |

use thiserror::Error;
use url::Url;

use crate::{
    ANGLE_API_BASE, BALANCER_GAUGES_URL, CURVE_API_BASE, FRAX_API_BASE, LLAMA_COINS_BASE,
    PENDLE_API_BASE, SNAPSHOT_HUB_GRAPHQL,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL in {var} ('{value}'): {source}")]
    InvalidUrl {
        var: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported URL scheme in {var}: {scheme}")]
    UnsupportedScheme { var: &'static str, scheme: String },
}

/// Upstream API locations
///
/// Base URLs (`llama`, `curve`, `angle`, `frax`, `pendle`) get the API path
/// appended; `balancer` and `hub_graphql` are complete URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub llama: String,
    pub curve: String,
    pub balancer: String,
    pub angle: String,
    pub frax: String,
    pub pendle: String,
    pub hub_graphql: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            llama: LLAMA_COINS_BASE.to_string(),
            curve: CURVE_API_BASE.to_string(),
            balancer: BALANCER_GAUGES_URL.to_string(),
            angle: ANGLE_API_BASE.to_string(),
            frax: FRAX_API_BASE.to_string(),
            pendle: PENDLE_API_BASE.to_string(),
            hub_graphql: SNAPSHOT_HUB_GRAPHQL.to_string(),
        }
    }
}

impl Endpoints {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults with overrides from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let pick = |var: &'static str, default: String| -> Result<String, ConfigError> {
            match lookup(var).filter(|v| !v.trim().is_empty()) {
                Some(value) => normalize_url(var, value.trim()),
                None => Ok(default),
            }
        };

        Ok(Self {
            llama: pick("GAUGE_VOTE_LLAMA_URL", defaults.llama)?,
            curve: pick("GAUGE_VOTE_CURVE_URL", defaults.curve)?,
            balancer: pick("GAUGE_VOTE_BALANCER_URL", defaults.balancer)?,
            angle: pick("GAUGE_VOTE_ANGLE_URL", defaults.angle)?,
            frax: pick("GAUGE_VOTE_FRAX_URL", defaults.frax)?,
            pendle: pick("GAUGE_VOTE_PENDLE_URL", defaults.pendle)?,
            hub_graphql: pick("GAUGE_VOTE_HUB_GRAPHQL_URL", defaults.hub_graphql)?,
        })
    }

    /// Every API served from one host (local mirror or mock server)
    ///
    /// Balancer is expected at `/balancer/voting-gauges.json`, the hub at `/graphql`.
    pub fn all_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            llama: base.clone(),
            curve: base.clone(),
            balancer: format!("{}/balancer/voting-gauges.json", base),
            angle: base.clone(),
            frax: base.clone(),
            pendle: base.clone(),
            hub_graphql: format!("{}/graphql", base),
        }
    }
}

fn normalize_url(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        var,
        value: value.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(value.trim_end_matches('/').to_string()),
        other => Err(ConfigError::UnsupportedScheme { var, scheme: other.to_string() }),
    }
}
