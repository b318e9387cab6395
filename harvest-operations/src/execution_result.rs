//! What an operation hands back to its processor

use crate::LogEntry;

/// Outcome of executing an operation.
///
/// The variant tells the processor whether to record the execution:
/// `Logged` for changes, `Unlogged` for reads and no-ops, and `Failed` with an
/// entry only when the failure itself left a trace (a move that was applied
/// and then rolled back).
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Wrap a read-only result; nothing is ever recorded
    pub fn read(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed {
                error,
                log_entry: None,
            },
        }
    }

    /// Wrap a mutating result. Successes are always recorded; `on_error`
    /// decides whether a failure is.
    pub fn write(
        result: Result<T, E>,
        on_success: impl FnOnce(&T) -> LogEntry,
        on_error: impl FnOnce(&E) -> Option<LogEntry>,
    ) -> Self {
        match result {
            Ok(value) => Self::Logged {
                log_entry: on_success(&value),
                value,
            },
            Err(error) => Self::Failed {
                log_entry: on_error(&error),
                error,
            },
        }
    }

    /// Separate the caller's result from the entry to record
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Drop the log entry
    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }

    /// The entry the processor would record, if any
    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Unlogged { .. } => None,
            Self::Failed { log_entry, .. } => log_entry.as_ref(),
        }
    }

    pub fn should_log(&self) -> bool {
        self.log_entry().is_some()
    }
}
