//! TaskStore - the authoritative in-memory task list
//!
//! The store is an owned object injected where it is needed. Its methods are
//! the only way to change the task list; nothing hands out mutable access to
//! the underlying vector.

use crate::error::{BoardError, Result};
use crate::group::group;
use crate::types::{BoardView, Task, TaskId, TaskPatch};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Holds the current full set of tasks
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Task>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Task>> {
        self.tasks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every task, in arrival order
    pub fn get_all(&self) -> Vec<Task> {
        self.read().clone()
    }

    /// Snapshot of a single task
    pub fn get(&self, id: TaskId) -> Result<Task> {
        self.read()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| BoardError::not_found(id))
    }

    /// Whether a task is present
    pub fn contains(&self, id: TaskId) -> bool {
        self.read().iter().any(|t| t.id == id)
    }

    /// The current tasks grouped into lanes
    pub fn board(&self) -> BoardView {
        group(&self.read())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replace the whole task list (reload or rollback)
    pub fn replace_all(&self, tasks: Vec<Task>) {
        trace!(count = tasks.len(), "replacing task store contents");
        *self.write() = tasks;
    }

    /// Apply a patch in memory only. Nothing is persisted.
    pub fn apply_local(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let mut tasks = self.write();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::not_found(id))?;

        patch.apply_to(task);
        Ok(task.clone())
    }

    /// Add a freshly created task, replacing any stale copy with the same id
    pub fn insert(&self, task: Task) {
        let mut tasks = self.write();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => tasks.push(task),
        }
    }

    /// Accept a deletion made elsewhere
    pub fn remove(&self, id: TaskId) -> Result<Task> {
        let mut tasks = self.write();
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::not_found(id))?;
        Ok(tasks.remove(index))
    }
}
