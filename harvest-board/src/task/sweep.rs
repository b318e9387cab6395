//! SweepOverdue command

use crate::context::{logged, BoardContext};
use crate::coordinator::MoveIntent;
use crate::error::{BoardError, Result};
use crate::overdue::overdue_tasks;
use crate::types::{Lane, TaskId};
use chrono::NaiveDate;
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Move every unfinished task whose due date has passed into `overdue`.
///
/// Each task is a separate move, so one rejected save rolls back only that
/// move and the sweep carries on.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SweepOverdue {
    /// Date to compare due dates against; defaults to the local date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,
}

impl_operation!(SweepOverdue, verb = "sweep", noun = "overdue", description = "Move past-due tasks to the overdue lane");

impl SweepOverdue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_of(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for SweepOverdue {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let today = self.today.unwrap_or_else(|| ctx.today());
            let due = overdue_tasks(&ctx.store().get_all(), today);

            let mut moved: Vec<TaskId> = Vec::new();
            let mut failed = Vec::new();
            for id in due {
                match ctx
                    .coordinator()
                    .move_task(MoveIntent::to_end(id, Lane::Overdue))
                    .await
                {
                    Ok(_) => moved.push(id),
                    Err(err) => {
                        warn!(task = %id, error = %err, "could not mark task overdue");
                        failed.push(json!({ "id": id, "error": err.to_string() }));
                    }
                }
            }

            info!(%today, moved = moved.len(), failed = failed.len(), "overdue sweep finished");
            Ok(json!({
                "today": today,
                "moved": moved,
                "failed": failed,
            }))
        }
        .await;

        logged(self, result)
    }
}
