//! Core error types for Spendlog.

use thiserror::Error;

/// Core error type shared by every expense backend.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No record with the given id.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind, e.g. "expense" or "savings goal".
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A field failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The backing storage could not be read or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The remote backend rejected or failed the request.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The session token was refused.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Stored or received data cannot be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Shorthand for a missing expense.
    pub fn expense_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "expense",
            id: id.into(),
        }
    }

    /// Shorthand for a missing savings goal.
    pub fn goal_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "savings goal",
            id: id.into(),
        }
    }

    /// Returns true if retrying the same call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Backend(_))
    }
}
