//! Core types for the task board

mod board;
mod ids;
mod lane;
mod order;
mod task;

pub use board::BoardView;
pub use ids::{CropId, FarmId, TaskId};
pub use lane::Lane;
pub use order::{allocate, gap_exhausted, is_exhausted, rebalance, OrderKey};
pub use task::{NewTask, Priority, Task, TaskKind, TaskPatch};
pub(crate) use task::clearable;
