//! GetBoard command

use crate::context::{unlogged, BoardContext};
use crate::error::{BoardError, Result};
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get the grouped board with task counts per lane
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GetBoard;

impl_operation!(GetBoard, verb = "get", noun = "board", description = "Retrieve the board with task counts");

#[async_trait]
impl Execute<BoardContext, BoardError> for GetBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let board = ctx.store().board();

            let mut result = serde_json::Map::new();
            result.insert("lanes".into(), serde_json::to_value(&board)?);
            result.insert("task_counts".into(), serde_json::to_value(board.counts())?);
            result.insert("state".into(), serde_json::to_value(ctx.coordinator().state())?);
            Ok(Value::Object(result))
        }
        .await;

        unlogged(result)
    }
}
