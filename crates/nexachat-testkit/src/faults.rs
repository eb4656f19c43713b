//! Storage fault injection.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use nexachat_store::{BlobStore, MemoryStore, Result, StoreError};

/// A [`MemoryStore`] whose writes can be made to fail on demand.
///
/// Clones share the switch, the counters and the underlying map.
#[derive(Clone, Default)]
pub struct FaultyStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `put_blob` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `put_blob` calls so far, failed ones included.
    pub fn write_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// The map successful writes land in.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for FaultyStore {
    async fn get_blob(&self, key: &str) -> Result<Option<String>> {
        self.inner.get_blob(key).await
    }

    async fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "storage quota exceeded",
            )));
        }
        self.inner.put_blob(key, value).await
    }

    async fn remove_blob(&self, key: &str) -> Result<()> {
        self.inner.remove_blob(key).await
    }
}
