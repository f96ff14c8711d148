//! Proposal Composer - per-space gauge vote decision and assembly
//!
//! # Algorithm (per space, fixed order)
//! 1. Look up the last "Gauge vote" proposal; none -> skip
//! 2. Last one created less than 10 days ago -> skip
//! 3. Fetch gauges from the space's provider; empty -> skip
//! 4. Build title/body/timestamps and hand the proposal to the sink
//!
//! Title dates use zero-based months (`1/0/2024` is January 1st).

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, Utc};
use tracing::{info, warn};

use crate::config::Endpoints;
use crate::gauges::{provider_for, GaugeProvider};
use crate::history::HubClient;
use crate::http::HttpClient;
use crate::schedule::ProposalSchedule;
use crate::sink::ProposalSink;
use crate::types::{Proposal, RunSummary, Space, SpaceOutcome};

/// Minimum gap between two gauge votes of a space
pub const ELIGIBILITY_GAP_SECS: i64 = 10 * 86400;

/// Snapshot voting system used for gauge votes
pub const PROPOSAL_TYPE: &str = "weighted";

/// Discussion link attached to every proposal
pub const DISCUSSION_URL: &str = "https://votemarket.stakedao.org/votes";

/// True once at least 10 days have passed since `last_created`
pub fn is_eligible(last_created: i64, now: i64) -> bool {
    last_created + ELIGIBILITY_GAP_SECS <= now
}

/// `sdcrv.eth` -> `CRV`
pub fn space_label(space: Space) -> String {
    let id = space.as_str();
    let id = id.strip_prefix("sd").unwrap_or(id);
    let id = id.strip_suffix(".eth").unwrap_or(id);
    id.to_uppercase()
}

/// Days covered by the title's end date
pub fn title_horizon_days(space: Space) -> i64 {
    match space {
        Space::Pendle => 27,
        _ => 13,
    }
}

/// End date shown in the title
pub fn proposal_end_date(space: Space, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(title_horizon_days(space))
}

fn title_date(date: DateTime<Utc>) -> String {
    format!("{}/{}/{}", date.day(), date.month0(), date.year())
}

/// `Gauge vote CRV - 14/2/2024 - 27/2/2024`
pub fn proposal_title(label: &str, now: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!("Gauge vote {} - {} - {}", label, title_date(now), title_date(end))
}

/// Assemble the proposal payload for `space`
pub fn build_proposal(space: Space, choices: Vec<String>, schedule: &ProposalSchedule) -> Proposal {
    let label = space_label(space);
    let end_date = proposal_end_date(space, schedule.now);

    Proposal {
        space,
        kind: PROPOSAL_TYPE.to_string(),
        title: proposal_title(&label, schedule.now, end_date),
        body: format!("Gauge vote for {} inflation allocation.", label),
        discussion: DISCUSSION_URL.to_string(),
        choices,
        start: schedule.start,
        end: schedule.end(),
        snapshot: schedule.snapshot_block,
        plugins: "{}".to_string(),
    }
}

/// Runs the gauge vote decision for every configured space
pub struct ProposalComposer {
    history: HubClient,
    providers: Vec<(Space, Box<dyn GaugeProvider>)>,
    keep_going: bool,
}

impl ProposalComposer {
    /// Composer over all spaces, with the default provider of each
    pub fn new(http: &HttpClient, endpoints: &Endpoints) -> Self {
        let providers =
            Space::ALL.iter().map(|space| (*space, provider_for(*space, http, endpoints))).collect();

        Self { history: HubClient::new(http.clone(), &endpoints.hub_graphql), providers, keep_going: false }
    }

    /// Restrict the run to `spaces` (processing order stays fixed)
    pub fn only_spaces(mut self, spaces: &[Space]) -> Self {
        self.providers.retain(|(space, _)| spaces.contains(space));
        self
    }

    /// Replace the provider of `space`
    pub fn with_provider(mut self, space: Space, provider: Box<dyn GaugeProvider>) -> Self {
        if let Some(entry) = self.providers.iter_mut().find(|(s, _)| *s == space) {
            entry.1 = provider;
        }
        self
    }

    /// Record per-space failures and continue instead of aborting the run
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Spaces this composer processes, in order
    pub fn spaces(&self) -> Vec<Space> {
        self.providers.iter().map(|(space, _)| *space).collect()
    }

    /// Process every space in order
    ///
    /// Without keep-going the first error aborts the run; the remaining
    /// spaces are not processed.
    pub async fn run(&self, schedule: &ProposalSchedule, sink: &mut dyn ProposalSink) -> Result<RunSummary> {
        let mut summary = RunSummary::new();

        for (space, provider) in &self.providers {
            match self.process_space(*space, provider.as_ref(), schedule, sink).await {
                Ok(outcome) => summary.record(*space, outcome),
                Err(e) if self.keep_going => {
                    warn!("{}: failed, continuing with next space: {:#}", space, e);
                    summary.record(*space, SpaceOutcome::Failed { error: format!("{:#}", e) });
                }
                Err(e) => return Err(e.context(format!("Gauge vote for {} failed", space))),
            }
        }

        Ok(summary)
    }

    async fn process_space(
        &self,
        space: Space,
        provider: &dyn GaugeProvider,
        schedule: &ProposalSchedule,
        sink: &mut dyn ProposalSink,
    ) -> Result<SpaceOutcome> {
        let now = schedule.now.timestamp();

        let last = match self.history.get_last_gauge_proposal(space).await? {
            Some(last) => last,
            None => {
                info!("{}: no previous gauge vote found, skipping", space);
                return Ok(SpaceOutcome::NoGaugeHistory);
            }
        };

        if !is_eligible(last.created, now) {
            let next_eligible_at = last.created + ELIGIBILITY_GAP_SECS;
            info!(
                "{}: last gauge vote '{}' created at {}, next eligible at {}, skipping",
                space, last.title, last.created, next_eligible_at
            );
            return Ok(SpaceOutcome::TooRecent { last_created: last.created, next_eligible_at });
        }

        let choices = provider.fetch_gauges().await?;
        if choices.is_empty() {
            info!("{}: {} returned no gauges, skipping", space, provider.name());
            return Ok(SpaceOutcome::NoGauges);
        }

        let proposal = build_proposal(space, choices, schedule);
        info!("{}: composed '{}' with {} choices", space, proposal.title, proposal.choices.len());

        let count = proposal.choices.len();
        sink.submit(&proposal).await?;
        Ok(SpaceOutcome::Emitted { choices: count })
    }
}
