// Error types shared across the service

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by stores, services, and engines
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing caller input
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (username or email already taken)
    #[error("{0}")]
    Conflict(String),

    /// Credentials did not match. A lookup miss and a verify miss produce
    /// this same variant so callers cannot probe for account existence.
    #[error("invalid credentials")]
    AuthFailed,

    /// Resolved id has no backing record
    #[error("not found")]
    NotFound,

    /// Unexpected persistence or dependency failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        CoreError::Conflict(msg.into())
    }

    /// Create an internal error from a plain message
    pub fn internal(msg: impl Into<String>) -> Self {
        CoreError::Internal(anyhow::anyhow!(msg.into()))
    }
}
