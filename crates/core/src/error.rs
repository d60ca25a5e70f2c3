//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of a domain rule.
///
/// HTTP, decoding and rendering failures have their own error types in the
/// crates that perform them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input rejected before anything was changed, e.g. an empty chat message.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier that does not parse, e.g. a non-numeric order id.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Unknown order or conversation.
    #[error("not found")]
    NotFound,

    /// Not possible in the current state, e.g. sending while disconnected.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
