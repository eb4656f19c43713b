//! Error types for NexaChat Core.

use thiserror::Error;

/// Core errors that can occur while building or mutating messages.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("message index {index} out of range (log holds {len} messages)")]
    OutOfRange { index: usize, len: usize },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),
}

/// Validation errors for locally composed messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message has neither text nor image")]
    EmptyMessage,
}

impl CoreError {
    /// True if this error is a rejected draft rather than a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}
