// file: src/error.rs
// version: 1.0.0
// guid: f34d763d-dc1b-402a-bab2-70492607394c

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, InvokeError>;

/// Error types for dotnet-invoke
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invocation failed: {0}")]
    Invocation(#[from] crate::reporter::InvocationFailure),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    StateTransition {
        from: crate::invocation::InvocationState,
        to: crate::invocation::InvocationState,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl InvokeError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new logging error
    pub fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }
}
