//! Error types for chat contexts.

use nexachat_core::CoreError;
use nexachat_store::StoreError;
use nexachat_sync::SyncError;
use thiserror::Error;

/// Errors that can occur during chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Message construction or log mutation failed.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Persistence failed. The in-memory log keeps the mutation.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Broadcast failed. Siblings will not see the message.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),
}

impl ChatError {
    /// True if a reaction targeted a message index that does not exist.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ChatError::Core(CoreError::OutOfRange { .. }))
    }
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
