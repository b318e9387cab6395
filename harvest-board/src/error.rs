//! Error types for the task board

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task id not present in the store
    #[error("task not found: {id}")]
    NotFound { id: String },

    /// Malformed move intent
    #[error("invalid move: {message}")]
    InvalidMove { message: String },

    /// Remote update rejected or unreachable; the board was rolled back
    #[error("persistence failed: {message}")]
    Persistence { message: String },

    /// Another move is still being persisted
    #[error("move busy - another move is being saved")]
    MoveInProgress,

    /// No task source to reload from
    #[error("no task source configured")]
    NoTaskSource,

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Command input could not be understood
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a not-found error
    pub fn not_found(id: impl ToString) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Create an invalid move error
    pub fn invalid_move(message: impl Into<String>) -> Self {
        Self::InvalidMove {
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Check if the user can simply try again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence { .. } | Self::MoveInProgress)
    }
}

impl From<figment::Error> for BoardError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
