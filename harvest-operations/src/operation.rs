//! Operation metadata and the execution trait

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata every command carries.
pub trait Operation: Send + Sync {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The thing acted upon, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical op string used in activity logs ("move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run an operation against a context.
///
/// Mutating operations return [`ExecutionResult::Logged`] so the processor can
/// record them; read-only operations return [`ExecutionResult::Unlogged`].
#[async_trait]
pub trait Execute<C, E>: Operation
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

/// Implement [`Operation`] for a command struct.
///
/// ```ignore
/// impl_operation!(MoveTask, verb = "move", noun = "task", description = "Move a task");
/// ```
#[macro_export]
macro_rules! impl_operation {
    ($ty:ty, verb = $verb:literal, noun = $noun:literal, description = $desc:literal $(,)?) => {
        impl $crate::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $desc
            }
        }
    };
}
