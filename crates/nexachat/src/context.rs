//! The chat context: one execution context's view of the conversation.
//!
//! A `ChatContext` owns its message log exclusively and keeps it in step
//! with durable storage and the broadcast channel:
//!
//! - a local send appends, saves the whole log, then publishes;
//! - a remote message appends and saves;
//! - a reaction mutates and saves, without publishing.

use std::sync::Arc;

use tokio::sync::watch;

use nexachat_core::{
    random_display_name, Clock, ContextId, CoreError, Message, MessageDraft, MessageLog,
    SystemClock, DEFAULT_TIME_FORMAT,
};
use nexachat_store::{BlobStore, DurableStore, LoadPolicy, LoadReport, DEFAULT_STORAGE_KEY};
use nexachat_sync::{BroadcastBus, MemoryBus, MemoryHub, Subscription, DEFAULT_CHANNEL_NAME};

use crate::error::Result;
use crate::reaction::ReactionMutator;

/// Configuration for a chat context.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Broadcast channel joined by [`ChatContext::join`].
    pub channel_name: String,
    /// Key holding the serialized log in durable storage.
    pub storage_key: String,
    /// Handling of an unreadable stored log at startup.
    pub load_policy: LoadPolicy,
    /// chrono strftime format for `sentAt`.
    pub time_format: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            load_policy: LoadPolicy::Recover,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

/// One execution context of the chat.
///
/// Methods take `&mut self`: a context processes one operation at a time,
/// so its log and its store writes never interleave.
pub struct ChatContext<B: BlobStore, T: BroadcastBus> {
    /// Display name used by [`ChatContext::say`].
    author: String,
    log: MessageLog,
    store: DurableStore<B>,
    bus: T,
    /// Live subscription, `None` once it ended.
    subscription: Option<Subscription>,
    /// Why the stored history was discarded at the last load, if it was.
    recovered: Option<String>,
    clock: Arc<dyn Clock>,
    /// Bumped after every applied mutation.
    changes: watch::Sender<u64>,
    config: ChatConfig,
}

impl<B: BlobStore> ChatContext<B, MemoryBus> {
    /// Open a context on `hub`, joining `config.channel_name` under a fresh
    /// context id.
    pub async fn join(config: ChatConfig, backend: B, hub: &Arc<MemoryHub>) -> Result<Self> {
        let bus = hub.join(config.channel_name.clone(), ContextId::random());
        Self::open(config, backend, bus).await
    }
}

impl<B: BlobStore, T: BroadcastBus> ChatContext<B, T> {
    /// Hydrate the log from storage and subscribe to the bus.
    pub async fn open(config: ChatConfig, backend: B, bus: T) -> Result<Self> {
        let clock = SystemClock::new(config.time_format.clone())?;
        let store = DurableStore::new(backend)
            .with_key(config.storage_key.clone())
            .with_policy(config.load_policy);

        let report = store.load_report().await?;
        if let Some(reason) = &report.recovered {
            tracing::warn!(context = %bus.context_id(), %reason, "discarded unreadable chat history");
        }
        let LoadReport { messages, recovered } = report;

        let subscription = bus.subscribe().await?;
        let (changes, _) = watch::channel(0);

        tracing::debug!(
            context = %bus.context_id(),
            channel = bus.channel_name(),
            len = messages.len(),
            "opened chat context"
        );

        Ok(Self {
            author: random_display_name(),
            log: MessageLog::from_messages(messages),
            store,
            bus,
            subscription: Some(subscription),
            recovered,
            clock: Arc::new(clock),
            changes,
            config,
        })
    }

    /// Use `author` as this context's display name.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Stamp new messages with `clock` instead of the wall clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn context_id(&self) -> ContextId {
        self.bus.context_id()
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Current messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        self.log.all()
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn store(&self) -> &DurableStore<B> {
        &self.store
    }

    /// Change notifications for renderers. The value increases after every
    /// applied mutation.
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// The decode error that made the last load start from an empty log.
    ///
    /// `None` when the stored history was read intact (or was absent).
    pub fn recovered_from(&self) -> Option<&str> {
        self.recovered.as_deref()
    }

    /// Whether remote messages can still arrive.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Local Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a message from `author`.
    ///
    /// Returns the new message's index, or `None` if neither text nor image
    /// was given (nothing is created).
    pub async fn send(
        &mut self,
        author: &str,
        text: Option<&str>,
        image: Option<&str>,
    ) -> Result<Option<usize>> {
        self.send_draft(MessageDraft {
            author: author.to_string(),
            text: text.map(str::to_string),
            image: image.map(str::to_string),
        })
        .await
    }

    /// Send a text message under this context's own display name.
    pub async fn say(&mut self, text: &str) -> Result<Option<usize>> {
        let author = self.author.clone();
        self.send(&author, Some(text), None).await
    }

    /// Validate, append, persist, then publish a draft.
    pub async fn send_draft(&mut self, draft: MessageDraft) -> Result<Option<usize>> {
        let message = match draft.into_message(self.clock.as_ref()) {
            Ok(message) => message,
            Err(CoreError::Validation(reason)) => {
                tracing::debug!(%reason, "ignoring empty message");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let index = self.log.append(message.clone());
        self.notify();
        self.persist().await?;

        self.bus.publish(&message).await.map_err(|e| {
            tracing::error!(index, error = %e, "failed to publish message");
            e
        })?;

        tracing::debug!(context = %self.context_id(), index, "sent message");
        Ok(Some(index))
    }

    /// Add a reaction to the message at `index`. Not broadcast.
    ///
    /// If the save fails the reaction stays in the log and watchers are
    /// still notified.
    pub async fn react(&mut self, index: usize, symbol: &str) -> Result<()> {
        let mut mutator = ReactionMutator::new(&mut self.log, &self.store);
        mutator.apply(index, symbol)?;
        let saved = mutator.save(index).await;
        self.notify();
        saved
    }

    /// Replace the in-memory log with what durable storage currently holds.
    ///
    /// This is how a context picks up messages it missed while it was not
    /// listening, provided their senders persisted them.
    pub async fn reload(&mut self) -> Result<()> {
        let LoadReport { messages, recovered } = self.store.load_report().await?;
        tracing::debug!(
            before = self.log.len(),
            after = messages.len(),
            "reloaded chat history"
        );
        self.log = MessageLog::from_messages(messages);
        self.recovered = recovered;
        self.notify();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remote Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a message published by a sibling context.
    ///
    /// Messages are not deduplicated.
    pub async fn receive(&mut self, message: Message) -> Result<usize> {
        let index = self.log.append(message);
        self.notify();
        self.persist().await?;
        tracing::debug!(context = %self.context_id(), index, "received message");
        Ok(index)
    }

    /// Apply every remote message already waiting in the inbox.
    ///
    /// Returns how many were applied. Does not wait for new ones.
    pub async fn pump(&mut self) -> Result<usize> {
        let mut applied = 0;
        loop {
            let next = self.subscription.as_mut().and_then(Subscription::try_recv);
            let Some(message) = next else {
                return Ok(applied);
            };
            self.receive(message).await?;
            applied += 1;
        }
    }

    /// Apply remote messages as they arrive until the subscription ends.
    ///
    /// A failed save is logged and does not stop the loop.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let next = match self.subscription.as_mut() {
                Some(subscription) => subscription.recv().await,
                None => return Ok(()),
            };
            match next {
                Some(message) => {
                    // Already logged by `persist`.
                    let _ = self.receive(message).await;
                }
                None => {
                    tracing::debug!(context = %self.context_id(), "subscription ended");
                    self.subscription = None;
                    return Ok(());
                }
            }
        }
    }

    /// Subscribe again, replacing the current subscription.
    pub async fn resubscribe(&mut self) -> Result<()> {
        self.subscription = Some(self.bus.subscribe().await?);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn persist(&self) -> Result<()> {
        self.store.save(self.log.all()).await.map_err(|e| {
            tracing::error!(len = self.log.len(), error = %e, "failed to persist message log");
            e.into()
        })
    }

    fn notify(&self) {
        self.changes.send_modify(|v| *v += 1);
    }
}
