//! GetTask command

use crate::context::{unlogged, BoardContext};
use crate::error::{BoardError, Result};
use crate::types::TaskId;
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a task by ID, with its farm and crop names and board position
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GetTask {
    /// The task ID to retrieve
    pub id: TaskId,
}

impl_operation!(GetTask, verb = "get", noun = "task", description = "Get a task by ID");

impl GetTask {
    pub fn new(id: TaskId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let board = ctx.store().board();
            let (lane, index) = board
                .position_of(self.id)
                .ok_or_else(|| BoardError::not_found(self.id))?;
            let task = &board.lane(lane)[index];

            let mut result = serde_json::to_value(task)?;
            result["farm_name"] = Value::from(ctx.names().farm_name(task));
            result["crop_name"] = ctx.names().crop_name(task).map_or(Value::Null, Value::from);
            result["position"] = Value::from(index);
            result["overdue"] = Value::from(crate::overdue::is_overdue(task, ctx.today()));
            Ok(result)
        }
        .await;

        unlogged(result)
    }
}
