//! # Harvest Operations
//!
//! Command plumbing shared by the board crates. A command is a plain struct
//! whose fields are its parameters; it names itself through [`Operation`],
//! runs through [`Execute`], and tells an [`OperationProcessor`] whether the
//! run belongs in the activity log via [`ExecutionResult`].
//!
//! ## Example
//!
//! ```ignore
//! use harvest_operations::*;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct DeleteTask {
//!     /// The task to delete
//!     pub id: TaskId,
//! }
//!
//! impl_operation!(DeleteTask, verb = "delete", noun = "task", description = "Delete a task");
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardError> for DeleteTask {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
//!         let result = ctx.delete(self.id).await;
//!         ExecutionResult::write(result, |v| LogEntry::for_operation(self, v.clone()), |_| None)
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
