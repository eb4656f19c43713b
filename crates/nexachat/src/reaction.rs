//! Reactions: append a symbol to a message's reaction list and persist.
//!
//! Reactions are local to the context that applied them. They are written
//! to durable storage but never published, so sibling contexts keep their
//! own (possibly different) reaction lists for the same message.

use nexachat_core::MessageLog;
use nexachat_store::{BlobStore, DurableStore};

use crate::error::Result;

/// Applies reactions to one context's log.
pub struct ReactionMutator<'a, B> {
    log: &'a mut MessageLog,
    store: &'a DurableStore<B>,
}

impl<'a, B: BlobStore> ReactionMutator<'a, B> {
    pub fn new(log: &'a mut MessageLog, store: &'a DurableStore<B>) -> Self {
        Self { log, store }
    }

    /// Add `symbol` to the message at `index` and save the whole log.
    ///
    /// An out-of-range index fails with `CoreError::OutOfRange` before
    /// anything is written.
    pub async fn react(&mut self, index: usize, symbol: &str) -> Result<()> {
        self.apply(index, symbol)?;
        self.save(index).await
    }

    /// Add `symbol` to the in-memory log only.
    pub fn apply(&mut self, index: usize, symbol: &str) -> Result<()> {
        self.log.apply_reaction(index, symbol).map_err(|e| {
            tracing::debug!(index, len = self.log.len(), "reaction rejected");
            e
        })?;
        tracing::debug!(index, symbol, "applied reaction");
        Ok(())
    }

    /// Write the log holding the reaction at `index`. The in-memory reaction
    /// stays applied if this fails.
    pub async fn save(&self, index: usize) -> Result<()> {
        self.store.save(self.log.all()).await.map_err(|e| {
            tracing::error!(index, error = %e, "failed to persist reaction");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexachat_core::{FixedClock, Message};
    use nexachat_store::MemoryStore;

    fn log_with(texts: &[&str]) -> MessageLog {
        let clock = FixedClock::new("t");
        let mut log = MessageLog::new();
        for t in texts {
            log.append(Message::draft("A").text(*t).into_message(&clock).unwrap());
        }
        log
    }

    #[tokio::test]
    async fn test_react_persists() {
        let store = DurableStore::new(MemoryStore::new());
        let mut log = log_with(&["hi"]);

        ReactionMutator::new(&mut log, &store).react(0, "👍").await.unwrap();

        assert_eq!(log.get(0).unwrap().reactions, vec!["👍"]);
        assert_eq!(store.load().await.unwrap(), log.all().to_vec());
    }

    #[tokio::test]
    async fn test_react_out_of_range_writes_nothing() {
        let store = DurableStore::new(MemoryStore::new());
        let mut log = log_with(&["hi"]);

        let err = ReactionMutator::new(&mut log, &store)
            .react(3, "❤️")
            .await
            .unwrap_err();

        assert!(err.is_out_of_range());
        assert!(log.get(0).unwrap().reactions.is_empty());
        assert!(store.backend().is_empty());
    }

    #[tokio::test]
    async fn test_apply_without_save() {
        let store = DurableStore::new(MemoryStore::new());
        let mut log = log_with(&["hi"]);

        let mut mutator = ReactionMutator::new(&mut log, &store);
        mutator.apply(0, "❤️").unwrap();
        assert!(store.backend().is_empty());

        mutator.save(0).await.unwrap();
        assert_eq!(store.load().await.unwrap()[0].reactions, vec!["❤️"]);
    }
}
