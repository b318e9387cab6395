//! ListTasks command

use crate::context::{unlogged, BoardContext};
use crate::error::{BoardError, Result};
use crate::filter::{StatusCounts, StatusFilter, TaskFilter};
use crate::types::{Lane, Task};
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// List tasks in board order, filtered by search text, completion and lane
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListTasks {
    /// Matched against title, farm name and crop name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    /// Restrict to one lane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
}

impl_operation!(ListTasks, verb = "list", noun = "tasks", description = "List tasks with optional filters");

impl ListTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_lane(mut self, lane: impl Into<String>) -> Self {
        self.lane = Some(lane.into());
        self
    }

    fn lane(&self) -> Result<Option<Lane>> {
        self.lane
            .as_deref()
            .map(|raw| {
                raw.parse::<Lane>()
                    .map_err(|_| BoardError::invalid_value("lane", format!("unknown lane '{}'", raw)))
            })
            .transpose()
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let lane = self.lane()?;
            let board = ctx.store().board();
            let scoped: Vec<&Task> = board
                .lanes()
                .filter(|(l, _)| lane.map_or(true, |wanted| wanted == *l))
                .flat_map(|(_, tasks)| tasks.iter())
                .collect();

            // Counts ignore the status filter so every tab shows its total
            let search = TaskFilter {
                search: self.search.clone(),
                status: StatusFilter::All,
            };
            let searched = search.apply(scoped.iter().copied(), ctx.names());
            let counts = StatusCounts::of(&searched);

            let tasks: Vec<Task> = searched
                .into_iter()
                .filter(|t| self.status.matches(t))
                .collect();

            Ok(json!({
                "tasks": tasks,
                "count": tasks.len(),
                "counts": counts,
            }))
        }
        .await;

        unlogged(result)
    }
}
