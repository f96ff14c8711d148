//! Snapshot hub proposal history
//!
//! Endpoint: POST https://hub.snapshot.org/graphql
//!
//! Only the first page the hub returns is scanned (no `first`/`skip`
//! pagination), so a gauge vote older than that page is not found.

use anyhow::{Context, Result};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::http::HttpClient;
use crate::types::{GraphqlRequest, GraphqlResponse, ProposalHistoryRecord, ProposalsData, Space};

/// Title marker of gauge vote proposals
pub const GAUGE_VOTE_MARKER: &str = "Gauge vote";

const PROPOSALS_QUERY: &str = r#"query Proposals($space: String!) {
  proposals(
    where: { space: $space }
    orderBy: "created"
    orderDirection: desc
  ) {
    title
    created
  }
}"#;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("GraphQL errors: {0}")]
    Graphql(String),

    #[error("GraphQL response has no data")]
    MissingData,
}

/// Snapshot hub GraphQL client
#[derive(Clone)]
pub struct HubClient {
    http: HttpClient,
    url: String,
}

impl HubClient {
    pub fn new(http: HttpClient, graphql_url: &str) -> Self {
        Self { http, url: graphql_url.to_string() }
    }

    /// Proposals of `space`, newest first
    pub async fn list_proposals(&self, space: Space) -> Result<Vec<ProposalHistoryRecord>> {
        let request = GraphqlRequest { query: PROPOSALS_QUERY, variables: json!({ "space": space.as_str() }) };

        let response: GraphqlResponse<ProposalsData> = self
            .http
            .post_json(&self.url, &request)
            .await
            .with_context(|| format!("Failed to query proposals of {}", space))?;

        if !response.errors.is_empty() {
            let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(HubError::Graphql(messages.join("; ")).into());
        }

        let data = response.data.ok_or(HubError::MissingData)?;
        debug!("{}: {} proposals listed", space, data.proposals.len());
        Ok(data.proposals)
    }

    /// Most recent proposal of `space` whose title contains "Gauge vote"
    pub async fn get_last_gauge_proposal(&self, space: Space) -> Result<Option<ProposalHistoryRecord>> {
        let proposals = self.list_proposals(space).await?;
        Ok(last_gauge_proposal(proposals))
    }
}

/// First record (in the given newest-first order) titled as a gauge vote
pub fn last_gauge_proposal(proposals: Vec<ProposalHistoryRecord>) -> Option<ProposalHistoryRecord> {
    proposals.into_iter().find(|p| p.title.contains(GAUGE_VOTE_MARKER))
}
