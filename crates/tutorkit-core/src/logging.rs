//! The logging collaborator boundary.
//!
//! Interaction records are fire-and-forget: a sink failure must never block
//! or fail the user-facing operation that triggered it. Call sites go
//! through [`record_interaction`], which logs and swallows errors.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::model::InteractionRecord;

/// Append-only sink for interaction records.
#[async_trait]
pub trait InteractionSink: Send + Sync {
    async fn record(&self, record: InteractionRecord) -> anyhow::Result<()>;
}

/// Write a record, logging (not propagating) any sink failure.
pub async fn record_interaction(sink: &dyn InteractionSink, record: InteractionRecord) {
    let question_id = record.question_id;
    if let Err(e) = sink.record(record).await {
        tracing::warn!("failed to persist interaction for question {question_id}: {e:#}");
    }
}

/// In-memory sink for tests and inspection.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<InteractionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<InteractionRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionSink for MemorySink {
    async fn record(&self, record: InteractionRecord) -> anyhow::Result<()> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

/// Appends one JSON object per line. The file is opened per record, so no
/// long-lived handle is shared across concurrent sessions.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl InteractionSink for JsonlSink {
    async fn record(&self, record: InteractionRecord) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
