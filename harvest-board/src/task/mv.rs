//! MoveTask command

use crate::context::{logged, unlogged, BoardContext};
use crate::coordinator::{MoveIntent, MoveOutcome};
use crate::error::{BoardError, Result};
use crate::types::{Lane, TaskId};
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Move a task to a lane and position.
///
/// The board updates immediately; if the record store rejects the change the
/// whole board is rolled back and the error returned.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveTask {
    /// The task ID to move
    pub id: TaskId,
    /// Destination lane
    pub lane: String,
    /// Position within the destination lane; past the end appends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Fail with `MoveInProgress` instead of waiting for another move
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub no_wait: bool,
}

impl_operation!(MoveTask, verb = "move", noun = "task", description = "Move a task to a lane and position");

impl MoveTask {
    /// Move to the end of a lane
    pub fn to_lane(id: TaskId, lane: impl Into<String>) -> Self {
        Self {
            id,
            lane: lane.into(),
            index: None,
            no_wait: false,
        }
    }

    /// Move to a specific position within a lane
    pub fn to_position(id: TaskId, lane: impl Into<String>, index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::to_lane(id, lane)
        }
    }

    pub fn no_wait(mut self) -> Self {
        self.no_wait = true;
        self
    }

    fn intent(&self) -> Result<MoveIntent> {
        let lane: Lane = self.lane.parse()?;
        Ok(match self.index {
            Some(index) => MoveIntent::new(self.id, lane, index),
            None => MoveIntent::to_end(self.id, lane),
        })
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let outcome = async {
            let intent = self.intent()?;
            if self.no_wait {
                ctx.coordinator().try_move_task(intent).await
            } else {
                ctx.coordinator().move_task(intent).await
            }
        }
        .await;

        let to_value = |outcome: &MoveOutcome| -> Result<Value> {
            let task = outcome.task();
            let position = ctx
                .store()
                .board()
                .position_of(task.id)
                .map(|(_, index)| index);
            Ok(json!({
                "moved": outcome.moved(),
                "task": serde_json::to_value(task)?,
                "position": position,
            }))
        };

        match outcome {
            Ok(outcome @ MoveOutcome::Unchanged(_)) => unlogged(to_value(&outcome)),
            Ok(outcome) => logged(self, to_value(&outcome)),
            Err(err) => logged(self, Err(err)),
        }
    }
}
