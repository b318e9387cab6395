//! Contracts with the hosted record store
//!
//! The board depends on two narrow seams: a [`RecordClient`] that writes task
//! records and a [`TaskSource`] that supplies the full list. [`MemoryRecords`]
//! implements both in process.

use crate::error::{BoardError, Result};
use crate::types::{NewTask, Task, TaskId, TaskPatch};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Writes task records to the backing store
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Update fields of an existing record, returning the stored record
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task>;

    /// Create a record; the store assigns the id
    async fn create_task(&self, new: &NewTask) -> Result<Task>;

    /// Delete a record
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}

/// Supplies the full task list for initial load, reload and refetch rollback
#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Task>>;
}

#[derive(Debug, Default)]
struct Records {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
}

/// In-process record store.
///
/// Ids are assigned sequentially from 1. Failures and latency can be injected
/// to exercise the rollback path.
#[derive(Debug, Default)]
pub struct MemoryRecords {
    records: Mutex<Records>,
    offline: AtomicBool,
    failing_updates: AtomicUsize,
    latency: std::sync::Mutex<Option<Duration>>,
    update_calls: AtomicUsize,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let tasks: BTreeMap<TaskId, Task> = tasks.into_iter().map(|t| (t.id, t)).collect();
        let next_id = tasks.keys().map(|id| id.get()).max().unwrap_or(0);
        Self {
            records: Mutex::new(Records { tasks, next_id }),
            ..Self::default()
        }
    }

    /// Every call fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Reject the next `count` update calls
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.store(count, Ordering::SeqCst);
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self
            .latency
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = latency;
    }

    /// How many update calls have been received
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// The stored copy of a record
    pub async fn record(&self, id: TaskId) -> Option<Task> {
        self.records.lock().await.tasks.get(&id).cloned()
    }

    async fn round_trip(&self) -> Result<()> {
        let latency = *self
            .latency
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(BoardError::persistence("record store unreachable"));
        }
        Ok(())
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_updates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl RecordClient for MemoryRecords {
    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.round_trip().await?;
        if self.take_injected_failure() {
            return Err(BoardError::persistence(format!("update of task {} rejected", id)));
        }

        let mut records = self.records.lock().await;
        let task = records
            .tasks
            .get_mut(&id)
            .ok_or_else(|| BoardError::not_found(id))?;
        patch.apply_to(task);
        debug!(task = %id, "record updated");
        Ok(task.clone())
    }

    async fn create_task(&self, new: &NewTask) -> Result<Task> {
        self.round_trip().await?;

        let mut records = self.records.lock().await;
        records.next_id += 1;
        let task = new.clone().into_task(TaskId::new(records.next_id));
        records.tasks.insert(task.id, task.clone());
        debug!(task = %task.id, "record created");
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.round_trip().await?;

        let mut records = self.records.lock().await;
        records
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BoardError::not_found(id))
    }
}

#[async_trait]
impl TaskSource for MemoryRecords {
    async fn fetch_all(&self) -> Result<Vec<Task>> {
        self.round_trip().await?;
        Ok(self.records.lock().await.tasks.values().cloned().collect())
    }
}
