//! Gauge vote proposal CLI
//!
//! Checks every Stake DAO Snapshot space and prints a gauge vote proposal for
//! each space whose last gauge vote is at least 10 days old.
//!
//! # Usage
//! ```bash
//! # Check all spaces, print proposals as JSON
//! gauge_vote
//!
//! # Also append proposals to a JSONL file
//! gauge_vote --out data/proposals.jsonl
//!
//! # Only some spaces, as if it were a given time, without stopping on errors
//! gauge_vote --space sdcrv.eth --space sdbal.eth --now 2024-01-25T08:00:00Z --keep-going
//! ```
//!
//! Upstream URLs can be overridden with `GAUGE_VOTE_*_URL` variables (see
//! `gauge_vote::config`), also read from a `.env` file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::{error, info, warn};

use gauge_vote::composer::ProposalComposer;
use gauge_vote::config::Endpoints;
use gauge_vote::http::HttpClient;
use gauge_vote::schedule::{BlockClient, ProposalSchedule};
use gauge_vote::sink::{ConsoleSink, FanoutSink, JsonlSink};
use gauge_vote::{RunSummary, Space, SpaceOutcome};

#[derive(Parser)]
#[command(name = "gauge_vote")]
#[command(about = "Create bi-weekly gauge vote proposals for Snapshot spaces")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Reference time (RFC 3339, default: now)
    #[arg(long)]
    now: Option<String>,

    /// Also append proposals as JSON lines to this file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only process these spaces (repeatable, default: all)
    #[arg(long = "space")]
    spaces: Vec<Space>,

    /// Keep processing remaining spaces when one fails
    #[arg(long, default_value = "false")]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(summary) if summary.failed().is_empty() => ExitCode::SUCCESS,
        Ok(summary) => {
            error!("Failed spaces: {:?}", summary.failed());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let endpoints = Endpoints::from_env()?;

    let now: DateTime<Utc> = match cli.now {
        Some(ref s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| anyhow::anyhow!("Invalid --now time '{}': {}", s, e))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    info!("=== Gauge Vote ===");
    info!("Reference time: {}", now);
    info!("Hub: {}", endpoints.hub_graphql);

    let http = HttpClient::new()?;
    let blocks = BlockClient::new(http.clone(), &endpoints.llama);
    let schedule = ProposalSchedule::resolve(&blocks, now).await?;

    let mut composer = ProposalComposer::new(&http, &endpoints).keep_going(cli.keep_going);
    if !cli.spaces.is_empty() {
        composer = composer.only_spaces(&cli.spaces);
    }
    info!("Spaces: {:?}", composer.spaces().iter().map(Space::as_str).collect::<Vec<_>>());

    let mut sink = FanoutSink::new().push(Box::new(ConsoleSink));
    if let Some(path) = cli.out {
        sink = sink.push(Box::new(JsonlSink::open(&path).await?));
        info!("Output: {}", path.display());
    }

    let summary = composer.run(&schedule, &mut sink).await?;

    info!("");
    info!("=== Summary ===");
    for (space, outcome) in &summary.outcomes {
        match outcome {
            SpaceOutcome::Emitted { choices } => info!("  {}: proposal emitted ({} choices)", space, choices),
            SpaceOutcome::NoGaugeHistory => info!("  {}: no previous gauge vote", space),
            SpaceOutcome::TooRecent { next_eligible_at, .. } => {
                info!("  {}: too recent, eligible from {}", space, next_eligible_at)
            }
            SpaceOutcome::NoGauges => info!("  {}: no gauges", space),
            SpaceOutcome::Failed { error } => warn!("  {}: FAILED: {}", space, error),
        }
    }

    Ok(summary)
}
