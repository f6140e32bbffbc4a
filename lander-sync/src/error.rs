//! Error types for the store boundary.

use lander_types::FieldErrors;
use thiserror::Error;

/// Result type for store operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors returned by a [`SectionStore`](crate::SectionStore) or the
/// action lock.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status without a structured validation body.
    #[error("http {status}: {message}")]
    Http { status: u16, message: String },

    /// The store rejected the write with field-keyed errors.
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    /// The addressed section does not exist remotely.
    #[error("not found: {0}")]
    NotFound(String),

    /// A body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Another mutating action is still in flight.
    #[error("another action is in progress")]
    Busy,

    /// The client could not be configured.
    #[error("config error: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Busy => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
