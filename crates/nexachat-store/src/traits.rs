//! BlobStore trait: the abstract key-value interface behind durable storage.
//!
//! The chat log is persisted as one opaque string under one key, so the
//! backend only needs whole-value reads and overwrites.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async key-value storage of string blobs.
///
/// # Design Notes
///
/// - **Whole-value writes**: `put_blob` replaces the previous value in one
///   atomic step. Readers see either the old or the new value, never a mix.
/// - **Shared**: several contexts may hold handles to the same backend, the
///   way tabs of one origin share browser storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get_blob(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put_blob(&self, key: &str, value: &str) -> Result<()>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    async fn remove_blob(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<B: BlobStore + ?Sized> BlobStore for Arc<B> {
    async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        (**self).get_blob(key).await
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        (**self).put_blob(key, value).await
    }

    async fn remove_blob(&self, key: &str) -> Result<()> {
        (**self).remove_blob(key).await
    }
}
