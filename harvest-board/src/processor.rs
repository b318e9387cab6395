//! BoardOperationProcessor - runs commands and records activity

use crate::context::BoardContext;
use crate::error::BoardError;
use harvest_operations::{async_trait, Execute, OperationProcessor};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Executes board commands, timing them and appending logged results to the
/// context's activity log with actor attribution.
#[derive(Debug, Clone, Default)]
pub struct BoardOperationProcessor {
    actor: Option<String>,
}

impl BoardOperationProcessor {
    /// Processor without an explicit actor; falls back to the configured one
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor that attributes every entry to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardError> for BoardOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &BoardContext) -> Result<Value, BoardError>
    where
        O: Execute<BoardContext, BoardError> + Send + Sync,
    {
        let op = operation.op_string();
        let started = Instant::now();
        let (result, log_entry) = operation.execute(ctx).await.split();
        let elapsed = started.elapsed().as_millis() as u64;

        if let Some(mut entry) = log_entry {
            if let Some(actor) = self.actor.as_ref().or(ctx.config().actor.as_ref()) {
                entry = entry.with_actor(actor.clone());
            }
            ctx.append_activity(entry.with_duration_ms(elapsed));
        }

        match &result {
            Ok(_) => debug!(%op, elapsed_ms = elapsed, "operation completed"),
            Err(err) => warn!(%op, error = %err, "operation failed"),
        }
        result
    }
}
