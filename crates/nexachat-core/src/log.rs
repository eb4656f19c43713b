//! The message log: an append-only, position-addressed sequence.
//!
//! A log belongs to exactly one execution context. Messages are never
//! removed or reordered, so an index handed out by [`MessageLog::append`]
//! stays valid for the lifetime of the log.

use crate::error::CoreError;
use crate::message::Message;

/// Ordered messages of one context.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    /// Bumped on every mutation.
    revision: u64,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a log from previously persisted messages.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            revision: 0,
        }
    }

    /// Append a message and return its index.
    ///
    /// The caller is responsible for having validated the message.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.revision += 1;
        self.messages.len() - 1
    }

    /// Append `symbol` to the reactions of the message at `index`.
    pub fn apply_reaction(&mut self, index: usize, symbol: impl Into<String>) -> Result<(), CoreError> {
        let len = self.messages.len();
        let message = self
            .messages
            .get_mut(index)
            .ok_or(CoreError::OutOfRange { index, len })?;
        message.reactions.push(symbol.into());
        self.revision += 1;
        Ok(())
    }

    /// All messages, oldest first.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of mutations since the log was created or hydrated.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
