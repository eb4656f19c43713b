//! In-process broadcast hub.
//!
//! Plays the role of the browser's same-origin broadcast channel for
//! contexts living in one process: each subscribed context owns a bounded
//! inbox, and publishing copies the serialized payload into every sibling
//! inbox on the same channel name.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};

use nexachat_core::{encode_message, ContextId, Message};

use crate::bus::{BroadcastBus, Envelope, Subscription};
use crate::error::{Result, SyncError};

/// Default number of undelivered payloads buffered per context.
pub const DEFAULT_INBOX_CAPACITY: usize = 1000;

type Inboxes = HashMap<ContextId, mpsc::Sender<Envelope>>;

/// Shared state for all channels in this process.
pub struct MemoryHub {
    /// Inbox senders per channel name, per context.
    channels: RwLock<HashMap<String, Inboxes>>,
    capacity: usize,
}

impl MemoryHub {
    /// Create a new hub with the default inbox capacity.
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_INBOX_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            channels: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        })
    }

    /// Create a bus for `context_id` on `channel`.
    ///
    /// The context does not receive anything until it subscribes.
    pub fn join(self: &Arc<Self>, channel: impl Into<String>, context_id: ContextId) -> MemoryBus {
        MemoryBus {
            hub: Arc::clone(self),
            channel: channel.into(),
            context_id,
            closed: AtomicBool::new(false),
        }
    }

    /// Number of contexts currently subscribed to `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        channels
            .get(channel)
            .map(|inboxes| inboxes.values().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    fn register(&self, channel: &str, context_id: ContextId) -> mpsc::Receiver<Envelope> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        let replaced = channels
            .entry(channel.to_string())
            .or_default()
            .insert(context_id, tx);
        if replaced.is_some() {
            tracing::debug!(context = %context_id, channel, "replaced previous subscription");
        }
        rx
    }

    fn unregister(&self, channel: &str, context_id: ContextId) {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(inboxes) = channels.get_mut(channel) {
            inboxes.remove(&context_id);
            if inboxes.is_empty() {
                channels.remove(channel);
            }
        }
    }

    fn prune(&self, channel: &str, stale: &[ContextId]) {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(inboxes) = channels.get_mut(channel) {
            // Only drop inboxes that are still closed; the context may have
            // re-subscribed since the publish observed them.
            inboxes.retain(|id, tx| !(stale.contains(id) && tx.is_closed()));
            if inboxes.is_empty() {
                channels.remove(channel);
            }
        }
    }
}

/// One context's handle on a [`MemoryHub`] channel.
///
/// Dropping the bus removes the context from the channel.
pub struct MemoryBus {
    hub: Arc<MemoryHub>,
    channel: String,
    context_id: ContextId,
    closed: AtomicBool,
}

impl MemoryBus {
    /// Leave the channel. The live subscription, if any, ends after its
    /// buffered payloads; later publish or subscribe calls fail.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.hub.unregister(&self.channel, self.context_id);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(SyncError::Closed(self.channel.clone()));
        }
        Ok(())
    }

    pub fn hub(&self) -> &Arc<MemoryHub> {
        &self.hub
    }
}

impl Drop for MemoryBus {
    fn drop(&mut self) {
        self.close();
    }
}

#[async_trait]
impl BroadcastBus for MemoryBus {
    async fn publish(&self, message: &Message) -> Result<()> {
        self.ensure_open()?;
        let envelope = Envelope {
            from: self.context_id,
            payload: encode_message(message)?,
        };

        let mut stale = Vec::new();
        let mut delivered = 0usize;
        {
            let channels = self.hub.channels.read().unwrap_or_else(PoisonError::into_inner);
            let Some(inboxes) = channels.get(&self.channel) else {
                tracing::trace!(channel = %self.channel, "published with no listeners");
                return Ok(());
            };

            for (peer, tx) in inboxes.iter().filter(|(peer, _)| **peer != self.context_id) {
                match tx.try_send(envelope.clone()) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(peer = %peer, channel = %self.channel, "inbox full, dropping payload");
                    }
                    Err(TrySendError::Closed(_)) => stale.push(*peer),
                }
            }
        }

        if !stale.is_empty() {
            self.hub.prune(&self.channel, &stale);
        }

        tracing::debug!(
            context = %self.context_id,
            channel = %self.channel,
            delivered,
            "published message"
        );
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        self.ensure_open()?;
        let rx = self.hub.register(&self.channel, self.context_id);
        Ok(Subscription::new(rx))
    }

    fn context_id(&self) -> ContextId {
        self.context_id
    }

    fn channel_name(&self) -> &str {
        &self.channel
    }
}
