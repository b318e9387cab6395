//! MoveCoordinator - optimistic drag-and-drop moves with full-board rollback
//!
//! A move runs through `Idle → Applying → Persisting → {Committed | RolledBack}`.
//! The store is updated and the board published before the single
//! persistence call; if that call fails the pre-move snapshot (or a fresh
//! fetch) replaces the whole list and the error is returned to the caller.
//!
//! Moves are serialized: a second move waits behind the one being persisted,
//! so optimistic states are always applied in the order they complete.

use crate::client::{RecordClient, TaskSource};
use crate::config::{BoardConfig, RollbackStrategy};
use crate::error::{BoardError, Result};
use crate::logging::{LaneCounts, Pretty};
use crate::store::TaskStore;
use crate::types::{allocate, gap_exhausted, BoardView, Lane, Task, TaskId, TaskPatch};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Where the coordinator is in the current (or last) move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Idle,
    Applying,
    Persisting,
    Committed,
    RolledBack,
}

/// A request to drop a task at `index` of `lane`.
///
/// `index` counts positions in the destination lane with the moved task
/// taken out; anything past the end appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub task_id: TaskId,
    pub lane: Lane,
    pub index: usize,
}

impl MoveIntent {
    pub fn new(task_id: TaskId, lane: Lane, index: usize) -> Self {
        Self {
            task_id,
            lane,
            index,
        }
    }

    /// Drop at the end of `lane`
    pub fn to_end(task_id: TaskId, lane: Lane) -> Self {
        Self::new(task_id, lane, usize::MAX)
    }
}

/// How a move finished
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Same lane, same index; nothing was touched
    Unchanged(Task),
    /// Persisted; carries the record the store returned
    Committed(Task),
}

impl MoveOutcome {
    pub fn task(&self) -> &Task {
        match self {
            Self::Unchanged(task) | Self::Committed(task) => task,
        }
    }

    pub fn moved(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Held while a move (or another store-mutating command) runs
pub struct MoveGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

/// The pre-move board, put back if a move is dropped before it settles.
///
/// A caller timeout, `select!` or task abort can drop the move future while
/// the save is outstanding. Unless `settle` was called the snapshot is
/// restored and the machine ends in `RolledBack`.
struct PendingMove<'a> {
    coordinator: &'a MoveCoordinator,
    snapshot: Option<Vec<Task>>,
}

impl<'a> PendingMove<'a> {
    fn new(coordinator: &'a MoveCoordinator, snapshot: Vec<Task>) -> Self {
        Self {
            coordinator,
            snapshot: Some(snapshot),
        }
    }

    /// Disarm and hand back the snapshot
    fn settle(mut self) -> Vec<Task> {
        self.snapshot.take().unwrap_or_default()
    }
}

impl Drop for PendingMove<'_> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!("move dropped while persisting, restoring board");
            self.coordinator.store.replace_all(snapshot);
            self.coordinator.publish();
            self.coordinator.set_state(MoveState::RolledBack);
        }
    }
}

/// Orchestrates moves against an injected store and record client
pub struct MoveCoordinator {
    store: Arc<TaskStore>,
    client: Arc<dyn RecordClient>,
    source: Option<Arc<dyn TaskSource>>,
    rollback: RollbackStrategy,
    timeout: Option<Duration>,
    in_flight: Mutex<()>,
    state: std::sync::Mutex<MoveState>,
    board_tx: watch::Sender<BoardView>,
}

impl MoveCoordinator {
    /// Create a coordinator over the given store and client
    pub fn new(store: Arc<TaskStore>, client: Arc<dyn RecordClient>) -> Self {
        let (board_tx, _) = watch::channel(store.board());
        Self {
            store,
            client,
            source: None,
            rollback: RollbackStrategy::default(),
            timeout: None,
            in_flight: Mutex::new(()),
            state: std::sync::Mutex::new(MoveState::Idle),
            board_tx,
        }
    }

    /// Use a task source for reloads and refetch rollback
    pub fn with_source(mut self, source: Arc<dyn TaskSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_rollback(mut self, strategy: RollbackStrategy) -> Self {
        self.rollback = strategy;
        self
    }

    /// Treat a persistence call that takes longer than `timeout` as failed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply rollback and timeout settings from configuration
    pub fn with_config(mut self, config: &BoardConfig) -> Self {
        self.rollback = config.rollback;
        self.timeout = config.persist_timeout();
        self
    }

    /// The store this coordinator mutates
    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Current state of the move machine
    pub fn state(&self) -> MoveState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: MoveState) {
        debug!(?state, "move state");
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Receive every board the renderer should show
    pub fn subscribe(&self) -> watch::Receiver<BoardView> {
        self.board_tx.subscribe()
    }

    /// Push the store's current board to subscribers
    pub fn publish(&self) {
        self.board_tx.send_replace(self.store.board());
    }

    /// Wait for exclusive access to the store.
    ///
    /// Commands that change the task list outside a move take this so they
    /// never interleave with a move being persisted.
    pub async fn lock(&self) -> MoveGuard<'_> {
        MoveGuard {
            _guard: self.in_flight.lock().await,
        }
    }

    /// Move a task, queuing behind any move still being persisted
    pub async fn move_task(&self, intent: MoveIntent) -> Result<MoveOutcome> {
        self.move_task_with(intent, TaskPatch::default()).await
    }

    /// Move a task and save `extra` fields in the same update.
    ///
    /// The placement and the extra fields succeed or roll back together. With
    /// a non-empty `extra`, a move to the task's current position still
    /// persists, keeping the existing key.
    pub async fn move_task_with(&self, intent: MoveIntent, extra: TaskPatch) -> Result<MoveOutcome> {
        let _guard = self.lock().await;
        self.run(intent, extra).await
    }

    /// Move a task, or fail with [`BoardError::MoveInProgress`] if another
    /// move is being persisted
    pub async fn try_move_task(&self, intent: MoveIntent) -> Result<MoveOutcome> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| BoardError::MoveInProgress)?;
        self.run(intent, TaskPatch::default()).await
    }

    /// Replace the store from the task source and publish
    pub async fn reload(&self) -> Result<()> {
        let source = self.source.as_ref().ok_or(BoardError::NoTaskSource)?;
        let _guard = self.lock().await;
        let tasks = source.fetch_all().await?;
        self.store.replace_all(tasks);
        info!(lanes = %LaneCounts(&self.store.board()), "reloaded tasks");
        self.publish();
        Ok(())
    }

    async fn run(&self, intent: MoveIntent, extra: TaskPatch) -> Result<MoveOutcome> {
        self.set_state(MoveState::Idle);

        let snapshot = self.store.get_all();
        let board = crate::group::group(&snapshot);
        let (source_lane, source_index) = board
            .position_of(intent.task_id)
            .ok_or_else(|| BoardError::not_found(intent.task_id))?;

        let destination: Vec<Task> = board
            .lane(intent.lane)
            .iter()
            .filter(|t| t.id != intent.task_id)
            .cloned()
            .collect();
        let index = intent.index.min(destination.len());
        let in_place = intent.lane == source_lane && index == source_index;

        if in_place && extra.is_empty() {
            debug!(task = %intent.task_id, lane = %intent.lane, index, "move is a no-op");
            let task = board.lane(source_lane)[source_index].clone();
            return Ok(MoveOutcome::Unchanged(task));
        }

        self.set_state(MoveState::Applying);
        let key = if in_place {
            board.lane(source_lane)[source_index].order_key
        } else {
            if gap_exhausted(&destination, index) {
                warn!(
                    lane = %intent.lane,
                    index,
                    "order keys exhausted between neighbours; rebalance the lane"
                );
            }
            allocate(&destination, index)
        };

        let patch = TaskPatch {
            status: Some(intent.lane),
            order_key: Some(key),
            ..extra
        };
        debug!(task = %intent.task_id, "applying move{}", Pretty(&patch));
        self.store.apply_local(intent.task_id, &patch)?;
        let pending = PendingMove::new(self, snapshot);
        self.publish();

        self.set_state(MoveState::Persisting);
        let persisted = self.persist(intent.task_id, &patch).await;
        let snapshot = pending.settle();
        match persisted {
            Ok(saved) => {
                self.set_state(MoveState::Committed);
                info!(
                    task = %intent.task_id,
                    from = %source_lane,
                    to = %intent.lane,
                    key = %key,
                    "move committed"
                );
                Ok(MoveOutcome::Committed(saved))
            }
            Err(err) => {
                warn!(task = %intent.task_id, error = %err, "move failed, rolling back");
                self.roll_back(snapshot).await;
                self.set_state(MoveState::RolledBack);
                Err(match err {
                    BoardError::Persistence { .. } => err,
                    other => BoardError::persistence(other.to_string()),
                })
            }
        }
    }

    async fn persist(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let call = self.client.update_task(id, patch);
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                BoardError::persistence(format!("no response after {}ms", limit.as_millis()))
            })?,
            None => call.await,
        }
    }

    async fn roll_back(&self, snapshot: Vec<Task>) {
        let restored = match (self.rollback, &self.source) {
            (RollbackStrategy::Refetch, Some(source)) => match source.fetch_all().await {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(error = %err, "refetch failed, restoring snapshot");
                    snapshot
                }
            },
            _ => snapshot,
        };

        self.store.replace_all(restored);
        debug!(lanes = %LaneCounts(&self.store.board()), "board restored");
        self.publish();
    }
}
