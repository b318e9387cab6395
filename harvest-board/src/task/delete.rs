//! DeleteTask command

use crate::context::{logged, BoardContext};
use crate::error::{BoardError, Result};
use crate::types::TaskId;
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Delete a task from the board and the record store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteTask {
    /// The task ID to delete
    pub id: TaskId,
}

impl_operation!(DeleteTask, verb = "delete", noun = "task", description = "Delete a task");

impl DeleteTask {
    pub fn new(id: TaskId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let _guard = ctx.coordinator().lock().await;
            let task = ctx.store().get(self.id)?;

            ctx.client().delete_task(self.id).await?;
            ctx.store().remove(self.id)?;
            ctx.coordinator().publish();
            info!(task = %self.id, "task deleted");

            Ok(json!({
                "deleted": true,
                "id": self.id,
                "title": task.title,
            }))
        }
        .await;

        logged(self, result)
    }
}
