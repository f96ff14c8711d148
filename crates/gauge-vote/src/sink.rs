//! Proposal sinks
//!
//! The composer hands every finished proposal to a `ProposalSink`. Signed
//! submission to the hub would be another implementation of the same trait.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::types::Proposal;

/// Destination for composed proposals
#[async_trait]
pub trait ProposalSink: Send {
    async fn submit(&mut self, proposal: &Proposal) -> Result<()>;
}

/// Pretty-printed JSON on stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl ProposalSink for ConsoleSink {
    async fn submit(&mut self, proposal: &Proposal) -> Result<()> {
        let json = serde_json::to_string_pretty(proposal)?;
        println!("{}", json);
        Ok(())
    }
}

/// One JSON object per line, appended to a file
pub struct JsonlSink {
    path: PathBuf,
    file: File,
}

impl JsonlSink {
    /// Open `path` for appending, creating parent directories as needed
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open output file {}", path.display()))?;

        Ok(Self { path: path.to_path_buf(), file })
    }
}

#[async_trait]
impl ProposalSink for JsonlSink {
    async fn submit(&mut self, proposal: &Proposal) -> Result<()> {
        let mut line = serde_json::to_string(proposal)?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        self.file.flush().await?;

        info!("{}: proposal appended to {}", proposal.space, self.path.display());
        Ok(())
    }
}

/// Collects proposals in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub proposals: Vec<Proposal>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProposalSink for MemorySink {
    async fn submit(&mut self, proposal: &Proposal) -> Result<()> {
        self.proposals.push(proposal.clone());
        Ok(())
    }
}

/// Forwards every proposal to each inner sink, in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn ProposalSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, sink: Box<dyn ProposalSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl ProposalSink for FanoutSink {
    async fn submit(&mut self, proposal: &Proposal) -> Result<()> {
        for sink in &mut self.sinks {
            sink.submit(proposal).await?;
        }
        Ok(())
    }
}
