//! Farm task board with optimistic drag-and-drop ordering
//!
//! This crate keeps an in-memory list of farm tasks, groups it into four
//! status lanes and lets tasks be moved between and within lanes. A move is
//! applied to the board immediately and then saved to the record store; if the
//! save fails, the whole board is rolled back.
//!
//! ## Overview
//!
//! - **Four fixed lanes** - `to_do`, `in_progress`, `completed`, `overdue`,
//!   derived from each task's `status`
//! - **Float order keys** - within a lane tasks sort by `order_key`; a drop
//!   between two tasks takes the midpoint of their keys
//! - **One save per move** - exactly one `update_task` call; no retries
//! - **Full rollback** - a failed save restores the whole pre-move list
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use harvest_board::{client::MemoryRecords, task::{AddTask, MoveTask}};
//! use harvest_board::{BoardConfig, BoardContext, Execute, FarmId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = Arc::new(MemoryRecords::new());
//! let ctx = BoardContext::in_memory(records, BoardConfig::load(None)?).await?;
//!
//! let due = chrono::NaiveDate::from_ymd_opt(2026, 6, 1).ok_or("bad date")?;
//! let task = AddTask::new("Irrigate orchard", FarmId::new(1), due)
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! let id = harvest_board::TaskId::new(task["id"].as_i64().ok_or("no id")?);
//! MoveTask::to_position(id, "in_progress", 0)
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! Renderers call [`MoveCoordinator::subscribe`] to receive every published
//! [`BoardView`], including the optimistic state while a save is in flight.

pub mod client;
mod config;
mod context;
mod coordinator;
mod error;
pub mod filter;
mod group;
pub mod logging;
pub mod overdue;
pub mod parse;
mod processor;
mod store;
pub mod types;

// Command modules
pub mod board;
pub mod task;

// Re-export Execute trait and types from operations crate
pub use harvest_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::{BoardConfig, RollbackStrategy, ENV_PREFIX};
pub use context::BoardContext;
pub use coordinator::{MoveCoordinator, MoveGuard, MoveIntent, MoveOutcome, MoveState};
pub use error::{BoardError, Result};
pub use group::group;
pub use logging::{LaneCounts, Pretty};
pub use parse::{parse_input, BoardCommand, ParsedCommand};
pub use processor::BoardOperationProcessor;
pub use store::TaskStore;

// Re-export commonly used types
pub use types::{
    BoardView, CropId, FarmId, Lane, NewTask, OrderKey, Priority, Task, TaskId, TaskKind,
    TaskPatch,
};
