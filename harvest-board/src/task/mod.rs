//! Task commands

mod add;
mod complete;
mod delete;
mod get;
mod list;
mod mv;
mod rebalance;
mod sweep;
mod update;

pub use add::AddTask;
pub use complete::CompleteTask;
pub use delete::DeleteTask;
pub use get::GetTask;
pub use list::ListTasks;
pub use mv::MoveTask;
pub use rebalance::RebalanceLane;
pub use sweep::SweepOverdue;
pub use update::UpdateTask;
