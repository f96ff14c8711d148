//! Gauge vote proposal builder
//!
//! Decides, per Snapshot space, whether a new bi-weekly gauge vote is due and
//! assembles the proposal from the protocol's live gauge list.
//!
//! # Components
//! - `schedule`: snapshot timestamp, proposal window and block lookup
//! - `gauges`: one `GaugeProvider` per protocol (Curve, Balancer, Angle, Frax, Pendle)
//! - `history`: last "Gauge vote" proposal of a space (Snapshot hub GraphQL)
//! - `composer`: eligibility gate and proposal assembly
//! - `sink`: where composed proposals go (console, JSONL file)
//!
//! # Sources
//! - Snapshot hub GraphQL: https://docs.snapshot.org/tools/api
//! - DefiLlama block lookup: https://defillama.com/docs/api

pub mod composer;
pub mod config;
pub mod gauges;
pub mod history;
pub mod http;
pub mod schedule;
pub mod sink;
pub mod types;

pub use types::*;

/// DefiLlama coins API (block by timestamp)
pub const LLAMA_COINS_BASE: &str = "https://coins.llama.fi";

/// Curve API base URL
pub const CURVE_API_BASE: &str = "https://api.curve.fi";

/// Balancer voting gauges list (static JSON in the frontend repo)
pub const BALANCER_GAUGES_URL: &str =
    "https://raw.githubusercontent.com/balancer-labs/frontend-v2/master/src/data/voting-gauges.json";

/// Angle API base URL
pub const ANGLE_API_BASE: &str = "https://api.angle.money";

/// Frax API base URL
pub const FRAX_API_BASE: &str = "https://api.frax.finance";

/// Pendle API base URL
pub const PENDLE_API_BASE: &str = "https://api-v2.pendle.finance";

/// Snapshot hub GraphQL endpoint
pub const SNAPSHOT_HUB_GRAPHQL: &str = "https://hub.snapshot.org/graphql";
