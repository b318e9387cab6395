//! CompleteTask command

use crate::context::{logged, BoardContext};
use crate::coordinator::MoveIntent;
use crate::error::{BoardError, Result};
use crate::types::{Lane, TaskId, TaskPatch};
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Toggle a task's completion.
///
/// Completing moves the task to the end of `completed`; reopening moves it
/// back to the end of `to_do`. The flag and the placement are saved in one
/// coordinated update, so a failed save rolls both back.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompleteTask {
    /// The task ID to toggle
    pub id: TaskId,
}

impl_operation!(CompleteTask, verb = "complete", noun = "task", description = "Toggle a task's completion");

impl CompleteTask {
    pub fn new(id: TaskId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CompleteTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let task = ctx.store().get(self.id)?;
            let completed = !task.completed;
            let lane = if completed { Lane::Completed } else { Lane::ToDo };

            let flag = TaskPatch {
                completed: Some(completed),
                ..TaskPatch::default()
            };
            let outcome = ctx
                .coordinator()
                .move_task_with(MoveIntent::to_end(self.id, lane), flag)
                .await?;
            let saved = outcome.task();
            info!(task = %self.id, completed, "task completion toggled");

            Ok(serde_json::to_value(saved)?)
        }
        .await;

        logged(self, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryRecords;
    use crate::config::BoardConfig;
    use crate::types::Task;
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryRecords>, BoardContext) {
        let records = Arc::new(MemoryRecords::with_tasks([
            Task::new(TaskId::new(1), "Turn compost"),
            Task::new(TaskId::new(2), "Bale hay")
                .with_status(Lane::Completed)
                .with_completed(true),
        ]));
        let ctx = BoardContext::in_memory(records.clone(), BoardConfig::default())
            .await
            .unwrap();
        (records, ctx)
    }

    #[tokio::test]
    async fn test_complete_moves_to_end_of_completed() {
        let (records, ctx) = setup().await;

        let result = CompleteTask::new(TaskId::new(1))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["completed"], true);
        assert_eq!(result["status"], "completed");

        let board = ctx.store().board();
        let done: Vec<_> = board.lane(Lane::Completed).iter().map(|t| t.id).collect();
        assert_eq!(done, vec![TaskId::new(2), TaskId::new(1)]);
        assert!(board.lane(Lane::Completed)[1].completed);
        assert!(records.record(TaskId::new(1)).await.unwrap().completed);
    }

    #[tokio::test]
    async fn test_reopen_moves_back_to_todo() {
        let (_records, ctx) = setup().await;

        CompleteTask::new(TaskId::new(2))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let task = ctx.store().get(TaskId::new(2)).unwrap();
        assert_eq!(task.status, Lane::ToDo);
        assert!(!task.completed);
        assert!(task.order_key > ctx.store().get(TaskId::new(1)).unwrap().order_key);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_lane_and_flag() {
        let (records, ctx) = setup().await;
        records.fail_next_updates(1);

        let result = CompleteTask::new(TaskId::new(1)).execute(&ctx).await;

        assert!(matches!(result.into_result(), Err(BoardError::Persistence { .. })));
        assert_eq!(records.update_calls(), 1);
        let task = ctx.store().get(TaskId::new(1)).unwrap();
        assert_eq!((task.status, task.completed), (Lane::ToDo, false));
        let server = records.record(TaskId::new(1)).await.unwrap();
        assert_eq!((server.status, server.completed), (Lane::ToDo, false));
    }

    #[tokio::test]
    async fn test_complete_saves_lane_and_flag_together() {
        let (records, ctx) = setup().await;

        CompleteTask::new(TaskId::new(1))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(records.update_calls(), 1);
    }

    #[tokio::test]
    async fn test_complete_task_already_in_completed_lane() {
        let records = Arc::new(MemoryRecords::with_tasks([Task::new(TaskId::new(3), "Dry seed")
            .with_status(Lane::Completed)
            .with_order_key(4.0)]));
        let ctx = BoardContext::in_memory(records.clone(), BoardConfig::default())
            .await
            .unwrap();

        let result = CompleteTask::new(TaskId::new(3))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["completed"], true);
        assert_eq!(result["order_key"], 4.0);
        assert!(records.record(TaskId::new(3)).await.unwrap().completed);
    }
}
