//! Operation processor trait

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations and takes care of what happens around them
/// (timing, actor attribution, persisting log entries).
#[async_trait]
pub trait OperationProcessor<C, E>
where
    C: Send + Sync,
    E: Send,
{
    /// Execute the operation and record its log entry if it produced one
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + Send + Sync;
}
