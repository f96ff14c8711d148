//! Proposal timing
//!
//! Voting power is measured at the Ethereum block closest to today 02:00 UTC.
//! Voting opens one hour before that reference time and lasts 4.5 days.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use tracing::{debug, info};

use crate::http::HttpClient;
use crate::types::BlockResponse;

/// Hour of the day (UTC) used as snapshot reference
pub const SNAPSHOT_HOUR_UTC: i64 = 2;

/// Voting opens this long before the snapshot reference time
pub const WINDOW_LEAD_SECS: i64 = 3600;

/// Voting duration: 4 days and 12 hours
pub const VOTING_PERIOD_SECS: i64 = 4 * 86400 + 86400 / 2;

/// Chain used for snapshot block lookup
pub const SNAPSHOT_CHAIN: &str = "ethereum";

/// Today (UTC date of `now`) at 02:00:00.000 UTC, as Unix seconds
pub fn snapshot_timestamp(now: DateTime<Utc>) -> i64 {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    midnight.timestamp() + SNAPSHOT_HOUR_UTC * 3600
}

/// Start of the voting window: snapshot reference time minus one hour
pub fn proposal_window_start(now: DateTime<Utc>) -> i64 {
    snapshot_timestamp(now) - WINDOW_LEAD_SECS
}

/// Block-by-timestamp lookup (DefiLlama coins API)
#[derive(Clone)]
pub struct BlockClient {
    http: HttpClient,
    base_url: String,
}

impl BlockClient {
    pub fn new(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// GET /block/{chain}/{timestamp} - block height closest to `timestamp`
    pub async fn block_at(&self, chain: &str, timestamp: i64) -> Result<u64> {
        let url = format!("{}/block/{}/{}", self.base_url, chain, timestamp);
        let block: BlockResponse = self
            .http
            .get_json(&url)
            .await
            .with_context(|| format!("Block lookup failed for {} at {}", chain, timestamp))?;

        debug!("Block at {} on {}: {}", timestamp, chain, block.height);
        Ok(block.height)
    }

    /// Ethereum block at today 02:00 UTC
    pub async fn resolve_snapshot_block(&self, now: DateTime<Utc>) -> Result<u64> {
        self.block_at(SNAPSHOT_CHAIN, snapshot_timestamp(now)).await
    }
}

/// Timing shared by every proposal of a run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalSchedule {
    /// Reference "now" of the run
    pub now: DateTime<Utc>,
    /// Today 02:00 UTC (Unix seconds)
    pub snapshot_timestamp: i64,
    /// Voting start (Unix seconds)
    pub start: i64,
    /// Voting power reference block
    pub snapshot_block: u64,
}

impl ProposalSchedule {
    /// Build a schedule for an already known block
    pub fn new(now: DateTime<Utc>, snapshot_block: u64) -> Self {
        Self {
            now,
            snapshot_timestamp: snapshot_timestamp(now),
            start: proposal_window_start(now),
            snapshot_block,
        }
    }

    /// Compute timestamps and look up the snapshot block
    pub async fn resolve(blocks: &BlockClient, now: DateTime<Utc>) -> Result<Self> {
        let block = blocks.resolve_snapshot_block(now).await?;
        let schedule = Self::new(now, block);

        info!(
            "Schedule: now={} snapshot_ts={} start={} end={} block={}",
            now.timestamp(),
            schedule.snapshot_timestamp,
            schedule.start,
            schedule.end(),
            schedule.snapshot_block
        );

        Ok(schedule)
    }

    /// Voting end (Unix seconds)
    pub fn end(&self) -> i64 {
        self.start + VOTING_PERIOD_SECS
    }
}
