//! BoardContext - access to the store, record client and activity log
//!
//! The context provides access, not logic. Commands do all the work.

use crate::client::{MemoryRecords, RecordClient, TaskSource};
use crate::config::BoardConfig;
use crate::coordinator::MoveCoordinator;
use crate::error::{BoardError, Result};
use crate::filter::Names;
use crate::store::TaskStore;
use crate::types::{allocate, Lane, OrderKey};
use chrono::NaiveDate;
use harvest_operations::{ExecutionResult, LogEntry, Operation};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Context passed to every command
pub struct BoardContext {
    store: Arc<TaskStore>,
    client: Arc<dyn RecordClient>,
    coordinator: MoveCoordinator,
    names: Names,
    config: BoardConfig,
    activity: Mutex<Vec<LogEntry>>,
}

impl BoardContext {
    /// Create a context with an empty store
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self::with_config(client, BoardConfig::default())
    }

    /// Create a context with an empty store and explicit settings
    pub fn with_config(client: Arc<dyn RecordClient>, config: BoardConfig) -> Self {
        let store = Arc::new(TaskStore::new());
        let coordinator = MoveCoordinator::new(store.clone(), client.clone()).with_config(&config);
        Self {
            store,
            client,
            coordinator,
            names: Names::default(),
            config,
            activity: Mutex::new(Vec::new()),
        }
    }

    /// Create a context backed by in-process records, loading them as the
    /// task source
    pub async fn in_memory(records: Arc<MemoryRecords>, config: BoardConfig) -> Result<Self> {
        let ctx = Self::with_config(records.clone(), config).with_source(records);
        ctx.load().await?;
        Ok(ctx)
    }

    /// Use a task source for loading, reloads and refetch rollback
    pub fn with_source(mut self, source: Arc<dyn TaskSource>) -> Self {
        self.coordinator = self.coordinator.with_source(source);
        self
    }

    /// Farm and crop names used by search
    pub fn with_names(mut self, names: Names) -> Self {
        self.names = names;
        self
    }

    /// Fill the store from the task source
    pub async fn load(&self) -> Result<()> {
        self.coordinator.reload().await
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn client(&self) -> &dyn RecordClient {
        self.client.as_ref()
    }

    pub fn coordinator(&self) -> &MoveCoordinator {
        &self.coordinator
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The date used for overdue checks when a command doesn't supply one
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Key that appends to the end of `to_do`
    pub fn next_todo_key(&self) -> OrderKey {
        let board = self.store.board();
        allocate(board.lane(Lane::ToDo), usize::MAX)
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the activity log
    pub fn append_activity(&self, entry: LogEntry) {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Activity log entries, newest first
    pub fn read_activity(&self, limit: Option<usize>) -> Vec<LogEntry> {
        let mut entries = self
            .activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }
}

/// Wrap a mutating command's result for the processor.
///
/// Successes are logged. A persistence failure is logged too, since the board
/// was changed and then rolled back; other failures changed nothing.
pub(crate) fn logged<O>(op: &O, result: Result<Value>) -> ExecutionResult<Value, BoardError>
where
    O: Operation + Serialize,
{
    ExecutionResult::write(
        result,
        |value| LogEntry::for_operation(op, value.clone()),
        |error| {
            matches!(error, BoardError::Persistence { .. }).then(|| LogEntry::failure(op, error))
        },
    )
}

/// Wrap a read-only command's result for the processor
pub(crate) fn unlogged(result: Result<Value>) -> ExecutionResult<Value, BoardError> {
    ExecutionResult::read(result)
}
