//! Wire and domain types
//!
//! # Design Principles
//! 1. Wire types mirror each upstream API exactly; optional flags default to "not set"
//! 2. Maps keyed by gauge name/id keep the upstream key order (ballot order follows the API)
//! 3. The outbound `Proposal` serializes to the Snapshot proposal payload shape
//!
//! # Sources
//! - Curve: https://api.curve.fi/api/getAllGauges
//! - Balancer: https://github.com/balancer-labs/frontend-v2 (src/data/voting-gauges.json)
//! - Angle: https://api.angle.money/v1/dao
//! - Frax: https://api.frax.finance/v2/gauges
//! - Pendle: https://api-v2.pendle.finance/core/docs
//! - Snapshot: https://docs.snapshot.org/tools/api

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

// ============================================================================
// Spaces
// ============================================================================

/// Snapshot space that receives a recurring gauge vote
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Space {
    #[serde(rename = "sdcrv.eth")]
    Crv,
    #[serde(rename = "sdfxs.eth")]
    Fxs,
    #[serde(rename = "sdangle.eth")]
    Angle,
    #[serde(rename = "sdbal.eth")]
    Bal,
    #[serde(rename = "sdpendle.eth")]
    Pendle,
}

impl Space {
    /// Every space, in processing order
    pub const ALL: [Space; 5] = [Space::Crv, Space::Fxs, Space::Angle, Space::Bal, Space::Pendle];

    /// Snapshot space id (ENS name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Space::Crv => "sdcrv.eth",
            Space::Fxs => "sdfxs.eth",
            Space::Angle => "sdangle.eth",
            Space::Bal => "sdbal.eth",
            Space::Pendle => "sdpendle.eth",
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown space: {0}. Supported: sdcrv.eth, sdfxs.eth, sdangle.eth, sdbal.eth, sdpendle.eth")]
pub struct UnknownSpace(pub String);

impl FromStr for Space {
    type Err = UnknownSpace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Space::ALL
            .into_iter()
            .find(|space| space.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSpace(s.to_string()))
    }
}

// ============================================================================
// Ordered map helper
// ============================================================================

/// Deserialize a JSON object into `(key, value)` pairs, keeping document order
fn deserialize_ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    struct OrderedEntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: DeserializeOwned> Visitor<'de> for OrderedEntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedEntriesVisitor(PhantomData))
}

// ============================================================================
// DefiLlama
// ============================================================================

/// GET /block/{chain}/{timestamp}
#[derive(Clone, Debug, Deserialize)]
pub struct BlockResponse {
    pub height: u64,
}

// ============================================================================
// Curve
// ============================================================================

/// GET /api/getAllGauges
#[derive(Clone, Debug, Deserialize)]
pub struct CurveGaugesResponse {
    /// Gauges keyed by display name
    #[serde(deserialize_with = "deserialize_ordered_entries")]
    pub data: Vec<(String, CurveGauge)>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CurveGauge {
    /// Gauge address
    pub gauge: String,
    #[serde(rename = "hasNoCrv", default)]
    pub has_no_crv: Option<bool>,
    #[serde(default)]
    pub is_killed: Option<bool>,
}

impl CurveGauge {
    /// Killed gauges and gauges without CRV emissions are not votable
    pub fn is_votable(&self) -> bool {
        !self.has_no_crv.unwrap_or(false) && !self.is_killed.unwrap_or(false)
    }
}

// ============================================================================
// Balancer
// ============================================================================

#[derive(Clone, Debug, Deserialize)]
pub struct BalancerPool {
    pub symbol: String,
}

/// Entry of voting-gauges.json
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancerGauge {
    pub address: String,
    /// Chain id the gauge's pool lives on
    pub network: u64,
    #[serde(default)]
    pub is_killed: Option<bool>,
    pub pool: BalancerPool,
}

impl BalancerGauge {
    /// Goerli (5) and Kovan (42) testnet gauges
    pub const TESTNET_NETWORKS: [u64; 2] = [5, 42];

    /// Only gauges explicitly flagged `isKilled: false` on a mainnet network are kept
    pub fn is_votable(&self) -> bool {
        !Self::TESTNET_NETWORKS.contains(&self.network) && self.is_killed == Some(false)
    }
}

// ============================================================================
// Angle
// ============================================================================

/// GET /v1/dao
#[derive(Clone, Debug, Deserialize)]
pub struct AngleDaoResponse {
    pub gauges: AngleGauges,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AngleGauges {
    /// Gauges keyed by id
    #[serde(deserialize_with = "deserialize_ordered_entries")]
    pub list: Vec<(String, AngleGauge)>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AngleGauge {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub deprecated: Option<bool>,
}

// ============================================================================
// Frax
// ============================================================================

/// GET /v2/gauges
#[derive(Clone, Debug, Deserialize)]
pub struct FraxGaugesResponse {
    pub gauges: Vec<FraxGauge>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FraxGauge {
    pub name: String,
    pub address: String,
}

// ============================================================================
// Pendle
// ============================================================================

/// GET /core/v1/{chainId}/markets
#[derive(Clone, Debug, Deserialize)]
pub struct PendleMarketsResponse {
    pub results: Vec<PendleMarket>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PendleMarket {
    /// Market address
    pub address: String,
    /// Principal token of the market
    pub pt: PendleToken,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendleToken {
    pub name: String,
    pub chain_id: u64,
}

// ============================================================================
// Snapshot hub
// ============================================================================

/// GraphQL request body
#[derive(Clone, Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// GraphQL response envelope
#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlErrorEntry {
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProposalsData {
    pub proposals: Vec<ProposalHistoryRecord>,
}

/// Past proposal of a space, as listed by the hub
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProposalHistoryRecord {
    pub title: String,
    /// Creation time (Unix seconds)
    pub created: i64,
}

// ============================================================================
// Outbound proposal
// ============================================================================

/// Proposal payload in the shape the Snapshot hub accepts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    pub space: Space,
    /// Voting system, always "weighted" for gauge votes
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub body: String,
    pub discussion: String,
    /// Ballot choices, one per gauge
    pub choices: Vec<String>,
    /// Voting start (Unix seconds)
    pub start: i64,
    /// Voting end (Unix seconds)
    pub end: i64,
    /// Voting power reference block
    pub snapshot: u64,
    /// Plugin configuration, JSON-encoded
    pub plugins: String,
}

// ============================================================================
// Run reporting
// ============================================================================

/// What happened to a space during a run
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SpaceOutcome {
    /// Proposal composed and handed to the sink
    Emitted { choices: usize },
    /// Space has no "Gauge vote" proposal on the first history page
    NoGaugeHistory,
    /// Last gauge vote is less than 10 days old
    TooRecent { last_created: i64, next_eligible_at: i64 },
    /// Provider returned no gauges
    NoGauges,
    /// Processing failed (keep-going mode only)
    Failed { error: String },
}

/// Per-space outcomes of one run, in processing order
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<(Space, SpaceOutcome)>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, space: Space, outcome: SpaceOutcome) {
        self.outcomes.push((space, outcome));
    }

    pub fn emitted(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| matches!(o, SpaceOutcome::Emitted { .. })).count()
    }

    pub fn failed(&self) -> Vec<Space> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SpaceOutcome::Failed { .. }))
            .map(|(space, _)| *space)
            .collect()
    }

    pub fn outcome(&self, space: Space) -> Option<&SpaceOutcome> {
        self.outcomes.iter().find(|(s, _)| *s == space).map(|(_, o)| o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_round_trip_str() {
        for space in Space::ALL {
            assert_eq!(space.as_str().parse::<Space>(), Ok(space));
        }
        assert_eq!("SDCRV.ETH".parse::<Space>(), Ok(Space::Crv));
        assert!("sdfoo.eth".parse::<Space>().is_err());
    }

    #[test]
    fn test_space_serializes_as_id() {
        let json = serde_json::to_string(&Space::Pendle).unwrap();
        assert_eq!(json, "\"sdpendle.eth\"");
    }

    #[test]
    fn test_curve_response_keeps_key_order() {
        let json = r#"{
            "success": true,
            "data": {
                "zeta": {"gauge": "0x1", "hasNoCrv": false, "is_killed": false},
                "alpha": {"gauge": "0x2", "is_killed": null},
                "mid": {"gauge": "0x3", "hasNoCrv": true}
            }
        }"#;

        let resp: CurveGaugesResponse = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = resp.data.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert!(resp.data[0].1.is_votable());
        assert!(resp.data[1].1.is_votable());
        assert!(!resp.data[2].1.is_votable());
    }

    #[test]
    fn test_balancer_missing_is_killed_is_not_votable() {
        let json = r#"[
            {"address": "0xa", "network": 1, "isKilled": false, "pool": {"symbol": "B-80BAL-20WETH"}},
            {"address": "0xb", "network": 1, "pool": {"symbol": "NO-FLAG"}},
            {"address": "0xc", "network": 42, "isKilled": false, "pool": {"symbol": "KOVAN"}}
        ]"#;

        let gauges: Vec<BalancerGauge> = serde_json::from_str(json).unwrap();
        let votable: Vec<bool> = gauges.iter().map(BalancerGauge::is_votable).collect();
        assert_eq!(votable, vec![true, false, false]);
    }

    #[test]
    fn test_block_response_ignores_block_time() {
        let block: BlockResponse = serde_json::from_str(r#"{"height": 19431000, "timestamp": 1710381595}"#).unwrap();
        assert_eq!(block.height, 19_431_000);
    }

    #[test]
    fn test_pendle_market_parsing() {
        let json = r#"{"results": [{"address": "0xmarket", "pt": {"name": "PT stETH", "chainId": 1}}]}"#;
        let resp: PendleMarketsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.results[0].pt.chain_id, 1);
        assert_eq!(resp.results[0].pt.name, "PT stETH");
    }

    #[test]
    fn test_proposal_serializes_type_field() {
        let proposal = Proposal {
            space: Space::Crv,
            kind: "weighted".to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            discussion: "d".to_string(),
            choices: vec!["a".to_string()],
            start: 1,
            end: 2,
            snapshot: 3,
            plugins: "{}".to_string(),
        };
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["type"], "weighted");
        assert_eq!(json["space"], "sdcrv.eth");
        assert_eq!(json["plugins"], "{}");
    }

    #[test]
    fn test_run_summary_counts() {
        let mut summary = RunSummary::new();
        summary.record(Space::Crv, SpaceOutcome::Emitted { choices: 3 });
        summary.record(Space::Fxs, SpaceOutcome::NoGauges);
        summary.record(Space::Bal, SpaceOutcome::Failed { error: "boom".to_string() });

        assert_eq!(summary.emitted(), 1);
        assert_eq!(summary.failed(), vec![Space::Bal]);
        assert_eq!(summary.outcome(Space::Fxs), Some(&SpaceOutcome::NoGauges));
        assert_eq!(summary.outcome(Space::Pendle), None);
    }
}
