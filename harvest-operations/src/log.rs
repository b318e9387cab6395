//! Activity log entries

use crate::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;

/// One recorded command execution.
///
/// Entries are identified by a ULID, so sorting by `id` sorts by creation
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID of this entry
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string, e.g. "move task"
    pub op: String,

    /// The command's own fields
    pub input: Value,

    /// The command's result, or `{"error": "..."}` for a failure
    pub output: Value,

    /// Person or device that issued the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Wall time spent executing, filled in by the processor
    #[serde(default)]
    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(op: impl Into<String>, input: Value, output: Value) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor: None,
            duration_ms: 0,
        }
    }

    /// Entry for an operation, using its serialized fields as the input
    pub fn for_operation<O>(operation: &O, output: Value) -> Self
    where
        O: Operation + Serialize,
    {
        let input = serde_json::to_value(operation).unwrap_or(Value::Null);
        Self::new(operation.op_string(), input, output)
    }

    /// Entry recording that an operation failed
    pub fn failure<O>(operation: &O, error: &impl Display) -> Self
    where
        O: Operation + Serialize,
    {
        Self::for_operation(operation, json!({ "error": error.to_string() }))
    }

    /// True when the entry records a failure
    pub fn is_failure(&self) -> bool {
        self.output.get("error").is_some_and(Value::is_string)
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
