//! Store error types.

use spendlog_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind.
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A field failed validation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The blob store cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Blob key contains characters that cannot be stored.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The blob was written by a newer version.
    #[error("Unsupported schema version {found} for '{key}' (supported: {supported})")]
    UnsupportedSchema {
        /// Blob key.
        key: String,
        /// Version found in the blob.
        found: u32,
        /// Highest version this build understands.
        supported: u32,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { kind, id } => StoreError::NotFound { kind, id },
            CoreError::Validation(msg) => StoreError::Validation(msg),
            CoreError::Serialization(e) => StoreError::Serialization(e),
            CoreError::StorageUnavailable(msg) | CoreError::Backend(msg) => {
                StoreError::Unavailable(msg)
            }
            CoreError::InvalidData(msg) => StoreError::Parse(msg),
            CoreError::Unauthorized(msg) => StoreError::Config(format!("unauthorized: {msg}")),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => CoreError::NotFound { kind, id },
            StoreError::Validation(msg) => CoreError::Validation(msg),
            StoreError::Serialization(e) => CoreError::Serialization(e),
            other @ (StoreError::Unavailable(_) | StoreError::Io(_)) => {
                CoreError::StorageUnavailable(other.to_string())
            }
            other => CoreError::InvalidData(other.to_string()),
        }
    }
}
