//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Aggregates raise `Validation` and `InvariantViolation`; `AggregateNotFound`
/// is reported by handlers after a repository miss.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Bad construction input. Never persisted.
    #[error("validation error: {0}")]
    Validation(String),

    /// An illegal state transition or a broken business rule.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for an `InvariantViolation` with a static message.
    #[must_use]
    pub fn invariant(message: &str) -> Self {
        Self::InvariantViolation(message.to_owned())
    }

    /// Shorthand for a `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
