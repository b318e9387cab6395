//! RebalanceLane command

use crate::context::{logged, BoardContext};
use crate::error::{BoardError, Result};
use crate::types::{rebalance, Lane, TaskPatch};
use harvest_operations::{async_trait, impl_operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Renumber a lane's order keys to evenly spaced integers.
///
/// Repeated midpoint inserts eventually run out of float precision between
/// two neighbours. Rebalancing restores room without changing display order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RebalanceLane {
    /// The lane to renumber
    pub lane: String,
}

impl_operation!(RebalanceLane, verb = "rebalance", noun = "lane", description = "Renumber a lane's order keys");

impl RebalanceLane {
    pub fn new(lane: impl Into<String>) -> Self {
        Self { lane: lane.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for RebalanceLane {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value> = async {
            let lane: Lane = self.lane.parse()?;

            let _guard = ctx.coordinator().lock().await;
            let board = ctx.store().board();
            let assignments = rebalance(board.lane(lane));

            let mut renumbered = 0;
            for (id, key) in &assignments {
                let patch = TaskPatch {
                    order_key: Some(*key),
                    ..TaskPatch::default()
                };
                if let Err(err) = ctx.client().update_task(*id, &patch).await {
                    warn!(%lane, task = %id, error = %err, renumbered, "rebalance interrupted");
                    ctx.coordinator().publish();
                    return Err(BoardError::persistence(format!(
                        "rebalance of {} stopped after {} of {} tasks: {}",
                        lane,
                        renumbered,
                        assignments.len(),
                        err
                    )));
                }
                ctx.store().apply_local(*id, &patch)?;
                renumbered += 1;
            }

            ctx.coordinator().publish();
            info!(%lane, renumbered, "lane rebalanced");

            Ok(json!({
                "lane": lane,
                "renumbered": renumbered,
            }))
        }
        .await;

        logged(self, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MemoryRecords, RecordClient};
    use crate::config::BoardConfig;
    use crate::types::{NewTask, OrderKey, Task, TaskId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryRecords>, BoardContext) {
        let records = Arc::new(MemoryRecords::with_tasks([
            Task::new(TaskId::new(1), "A").with_order_key(0.5),
            Task::new(TaskId::new(2), "B").with_order_key(0.500_000_000_000_000_1),
            Task::new(TaskId::new(3), "C").with_order_key(-3.0),
            Task::new(TaskId::new(4), "D")
                .with_status(Lane::Overdue)
                .with_order_key(9.0),
        ]));
        let ctx = BoardContext::in_memory(records.clone(), BoardConfig::default())
            .await
            .unwrap();
        (records, ctx)
    }

    fn lane_ids(ctx: &BoardContext, lane: Lane) -> Vec<TaskId> {
        ctx.store().board().lane(lane).iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_rebalance_preserves_order() {
        let (records, ctx) = setup().await;
        let before = lane_ids(&ctx, Lane::ToDo);

        let result = RebalanceLane::new("to_do")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["renumbered"], 3);
        assert_eq!(lane_ids(&ctx, Lane::ToDo), before);
        let keys: Vec<OrderKey> = ctx
            .store()
            .board()
            .lane(Lane::ToDo)
            .iter()
            .map(|t| t.order_key)
            .collect();
        assert_eq!(keys, vec![OrderKey::new(1.0), OrderKey::new(2.0), OrderKey::new(3.0)]);
        assert_eq!(records.update_calls(), 3);
        assert_eq!(ctx.store().get(TaskId::new(4)).unwrap().order_key, OrderKey::new(9.0));
    }

    /// Accepts a fixed number of updates, then rejects the rest
    struct SavesThenFails {
        inner: Arc<MemoryRecords>,
        remaining: AtomicUsize,
    }

    #[async_trait]
    impl RecordClient for SavesThenFails {
        async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
            if self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err()
            {
                return Err(BoardError::persistence("connection reset"));
            }
            self.inner.update_task(id, patch).await
        }

        async fn create_task(&self, new: &NewTask) -> Result<Task> {
            self.inner.create_task(new).await
        }

        async fn delete_task(&self, id: TaskId) -> Result<()> {
            self.inner.delete_task(id).await
        }
    }

    #[tokio::test]
    async fn test_interrupted_rebalance_keeps_order() {
        let (records, _) = setup().await;
        let client = Arc::new(SavesThenFails {
            inner: records.clone(),
            remaining: AtomicUsize::new(1),
        });
        let ctx = BoardContext::with_config(client, BoardConfig::default()).with_source(records);
        ctx.load().await.unwrap();
        let before = lane_ids(&ctx, Lane::ToDo);

        let result = RebalanceLane::new("to_do").execute(&ctx).await;

        assert!(result.should_log());
        assert!(matches!(result.into_result(), Err(BoardError::Persistence { .. })));
        assert_eq!(lane_ids(&ctx, Lane::ToDo), before);
        assert_eq!(ctx.store().get(TaskId::new(2)).unwrap().order_key, OrderKey::new(3.0));
    }

    #[tokio::test]
    async fn test_rebalance_empty_lane() {
        let (records, ctx) = setup().await;

        let result = RebalanceLane::new("in_progress")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["renumbered"], 0);
        assert_eq!(records.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_rebalance_unknown_lane() {
        let (_records, ctx) = setup().await;
        let result = RebalanceLane::new("backlog").execute(&ctx).await;
        assert!(matches!(result.into_result(), Err(BoardError::InvalidMove { .. })));
    }
}
