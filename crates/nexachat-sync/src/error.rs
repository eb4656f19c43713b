//! Error types for the sync module.

use thiserror::Error;

/// Errors that can occur on the broadcast channel.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A message could not be turned into a wire payload, or back.
    #[error("codec error: {0}")]
    Codec(#[from] nexachat_core::CoreError),

    /// The bus was closed and can no longer publish or subscribe.
    #[error("broadcast channel {0:?} is closed")]
    Closed(String),
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
