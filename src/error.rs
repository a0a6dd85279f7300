//! Error types for the clock core and the application layer

use thiserror::Error;

/// Errors raised by the clock core.
///
/// Every variant is recoverable: the caller re-prompts the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClockError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ClockError::InvalidInput(msg.into())
    }
}

/// Errors raised by the application layer around the core
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("failed to lock {0}")]
    Poisoned(&'static str),

    #[error("background task failed: {0}")]
    Task(String),
}
