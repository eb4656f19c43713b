//! Broadcast bus abstraction.
//!
//! A bus connects every execution context that joined the same named
//! channel. Publishing hands a serialized copy of a message to each *other*
//! subscribed context; nothing is shared by reference.

use async_trait::async_trait;
use tokio::sync::mpsc;

use nexachat_core::{decode_message, ContextId, Message};

use crate::error::Result;

/// Channel name used by the chat application.
pub const DEFAULT_CHANNEL_NAME: &str = "modern-chat";

/// A serialized message in flight, tagged with its publisher.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub from: ContextId,
    /// JSON record of the message.
    pub payload: String,
}

/// Pub/sub channel between sibling contexts.
///
/// Delivery is best-effort: no acknowledgement, no retry, and a context that
/// is not subscribed when a message is published never sees it.
#[async_trait]
pub trait BroadcastBus: Send + Sync {
    /// Send a copy of `message` to every other subscriber on the channel.
    async fn publish(&self, message: &Message) -> Result<()>;

    /// Start receiving payloads published by other contexts.
    ///
    /// Only one subscription per context is live. Subscribing again replaces
    /// the previous subscription, which ends once its buffer is drained.
    async fn subscribe(&self) -> Result<Subscription>;

    /// Identity of the context this bus belongs to.
    fn context_id(&self) -> ContextId;

    /// Name of the joined channel.
    fn channel_name(&self) -> &str;
}

/// Incoming side of a bus, yielding messages in the order they arrived.
pub struct Subscription {
    receiver: mpsc::Receiver<Envelope>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<Envelope>) -> Self {
        Self { receiver }
    }

    /// Wait for the next message.
    ///
    /// Returns `None` once the subscription has been replaced or the bus
    /// closed, after all buffered payloads were delivered. Payloads that
    /// fail to decode are skipped.
    pub async fn recv(&mut self) -> Option<Message> {
        while let Some(envelope) = self.receiver.recv().await {
            if let Some(message) = open(envelope) {
                return Some(message);
            }
        }
        None
    }

    /// Take the next already-delivered message without waiting.
    pub fn try_recv(&mut self) -> Option<Message> {
        while let Ok(envelope) = self.receiver.try_recv() {
            if let Some(message) = open(envelope) {
                return Some(message);
            }
        }
        None
    }
}

fn open(envelope: Envelope) -> Option<Message> {
    match decode_message(&envelope.payload) {
        Ok(message) => {
            tracing::trace!(from = %envelope.from, "received broadcast payload");
            Some(message)
        }
        Err(e) => {
            tracing::warn!(from = %envelope.from, error = %e, "dropping undecodable broadcast payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexachat_core::{encode_message, FixedClock};

    fn envelope(payload: &str) -> Envelope {
        Envelope {
            from: ContextId::from_bytes([1; 16]),
            payload: payload.to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscription_skips_garbage() {
        let (tx, rx) = mpsc::channel(8);
        let mut sub = Subscription::new(rx);

        let msg = Message::draft("A")
            .text("ok")
            .into_message(&FixedClock::new("t"))
            .unwrap();

        tx.send(envelope("garbage")).await.unwrap();
        tx.send(envelope(&encode_message(&msg).unwrap())).await.unwrap();
        drop(tx);

        assert_eq!(sub.recv().await, Some(msg));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let (_tx, rx) = mpsc::channel(8);
        let mut sub = Subscription::new(rx);
        assert_eq!(sub.try_recv(), None);
    }
}
