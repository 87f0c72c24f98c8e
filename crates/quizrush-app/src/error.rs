//! QuizRush: application error types.

use quizrush_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors surfaced by the composition root.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is present but invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// A command or query failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// The domain error behind this failure, if any.
    #[must_use]
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Config(_) | Self::Telemetry(_) => None,
        }
    }
}
