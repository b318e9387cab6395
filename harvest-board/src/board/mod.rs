//! Board commands

mod get;

pub use get::GetBoard;
