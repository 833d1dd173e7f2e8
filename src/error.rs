//! Error types for the fixed-window limiter.

use thiserror::Error;

/// Main error type for limiter operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimiterError {
    /// The window duration is zero or too large to schedule
    #[error("duration must be greater than zero and fit in a schedulable window")]
    InvalidDuration,

    /// The per-window limit is zero
    #[error("limit must be greater than zero")]
    InvalidLimit,

    /// The time unit is not one of the recognized values
    #[error("expected one of 'second', 'minute', 'hour' but got '{0}'")]
    InvalidUnit(String),

    /// `start` was called on a limiter whose resetter is already running
    #[error("rate limiter is already running")]
    AlreadyRunning,

    /// `start` was called outside of a tokio runtime
    #[error("no tokio runtime available to run the window resetter")]
    NoRuntime,

    /// Serialized configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for limiter operations.
pub type Result<T> = std::result::Result<T, LimiterError>;
