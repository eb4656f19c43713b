//! DurableStore: the whole message log as one blob under one key.
//!
//! Every save serializes the complete log and overwrites the previous value.
//! There are no incremental writes, so a reader never observes a partially
//! applied mutation.

use nexachat_core::{decode_log, encode_log, Message};

use crate::error::{Result, StoreError};
use crate::traits::BlobStore;

/// Storage key used by the chat application.
pub const DEFAULT_STORAGE_KEY: &str = "chatMessages";

/// What to do when the stored payload cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log a warning and start from an empty log.
    #[default]
    Recover,
    /// Fail the load with [`StoreError::Deserialization`].
    Strict,
}

/// Outcome of [`DurableStore::load_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub messages: Vec<Message>,
    /// Set when the stored payload was unreadable and discarded.
    pub recovered: Option<String>,
}

/// Persists a message log through a [`BlobStore`].
pub struct DurableStore<B> {
    backend: B,
    key: String,
    policy: LoadPolicy,
}

impl<B: BlobStore> DurableStore<B> {
    /// Wrap `backend` using the default key and [`LoadPolicy::Recover`].
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            policy: LoadPolicy::default(),
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the persisted log. Absent data is an empty log.
    pub async fn load(&self) -> Result<Vec<Message>> {
        Ok(self.load_report().await?.messages)
    }

    /// Load the persisted log, reporting whether a corrupt payload was dropped.
    pub async fn load_report(&self) -> Result<LoadReport> {
        let Some(raw) = self.backend.get_blob(&self.key).await? else {
            return Ok(LoadReport::default());
        };

        match decode_log(&raw) {
            Ok(messages) => {
                tracing::debug!(key = %self.key, len = messages.len(), "loaded message log");
                Ok(LoadReport {
                    messages,
                    recovered: None,
                })
            }
            Err(e) => match self.policy {
                LoadPolicy::Strict => Err(StoreError::Deserialization(e.to_string())),
                LoadPolicy::Recover => {
                    tracing::warn!(
                        key = %self.key,
                        error = %e,
                        "stored message log is unreadable, starting empty"
                    );
                    Ok(LoadReport {
                        messages: Vec::new(),
                        recovered: Some(e.to_string()),
                    })
                }
            },
        }
    }

    /// Replace the stored log with `log`.
    pub async fn save(&self, log: &[Message]) -> Result<()> {
        let raw = encode_log(log).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.put_blob(&self.key, &raw).await?;
        tracing::debug!(key = %self.key, len = log.len(), "saved message log");
        Ok(())
    }

    /// Forget the stored log.
    pub async fn clear(&self) -> Result<()> {
        self.backend.remove_blob(&self.key).await
    }
}
