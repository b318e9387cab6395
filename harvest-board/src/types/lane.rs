//! The four fixed board lanes

use crate::error::{BoardError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A status lane on the task board.
///
/// Lane membership is derived from a task's `status` field. Records with a
/// missing or unrecognized status land in [`Lane::ToDo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    #[default]
    ToDo,
    InProgress,
    Completed,
    Overdue,
}

impl Lane {
    /// All lanes in board display order
    pub const ALL: [Lane; 4] = [Lane::ToDo, Lane::InProgress, Lane::Completed, Lane::Overdue];

    /// The wire name of this lane
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::ToDo => "to_do",
            Lane::InProgress => "in_progress",
            Lane::Completed => "completed",
            Lane::Overdue => "overdue",
        }
    }

    /// Recognize a status string, tolerating case, dashes and spaces.
    fn recognize(raw: &str) -> Option<Lane> {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "to_do" | "todo" => Some(Lane::ToDo),
            "in_progress" => Some(Lane::InProgress),
            "completed" => Some(Lane::Completed),
            "overdue" => Some(Lane::Overdue),
            _ => None,
        }
    }

    /// Map a stored status value to its lane, falling back to `to_do`.
    pub fn from_status(raw: &str) -> Lane {
        Self::recognize(raw).unwrap_or_default()
    }
}

impl FromStr for Lane {
    type Err = BoardError;

    /// Strict parse used for move intents: an unknown lane is an invalid move.
    fn from_str(s: &str) -> Result<Self> {
        Self::recognize(s).ok_or_else(|| BoardError::invalid_move(format!("unknown lane '{}'", s)))
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Lane {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Any shape is accepted; only a recognized string selects a lane.
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(serde_json::Value::String(s)) => Lane::from_status(&s),
            _ => Lane::default(),
        })
    }
}
