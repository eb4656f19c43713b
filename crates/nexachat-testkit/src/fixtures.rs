//! Test fixtures and helpers.
//!
//! Common setup code for multi-context tests.

use std::sync::Arc;

use nexachat::{ChatConfig, ChatContext, Result};
use nexachat_core::{FixedClock, Message};
use nexachat_store::{BlobStore, MemoryStore};
use nexachat_sync::{BroadcastBus, MemoryBus, MemoryHub};

/// `sentAt` stamped by fixture contexts.
pub const FIXTURE_TIME: &str = "12:00:00 PM";

/// A chat context backed by in-memory storage and bus.
pub type TestContext = ChatContext<MemoryStore, MemoryBus>;

/// A set of contexts sharing one broadcast hub.
pub struct TestNetwork {
    pub hub: Arc<MemoryHub>,
    pub config: ChatConfig,
}

impl TestNetwork {
    /// Create a new network on the default channel.
    pub fn new() -> Self {
        Self {
            hub: MemoryHub::new(),
            config: ChatConfig::default(),
        }
    }

    /// Create a network whose contexts join `channel`.
    pub fn on_channel(channel: &str) -> Self {
        Self {
            hub: MemoryHub::new(),
            config: ChatConfig {
                channel_name: channel.to_string(),
                ..ChatConfig::default()
            },
        }
    }

    /// Open a context with its own private storage.
    pub async fn context(&self, author: &str) -> Result<TestContext> {
        self.context_with_store(author, MemoryStore::new()).await
    }

    /// Open a context on an existing store, e.g. to model a reload.
    pub async fn context_with_store(&self, author: &str, store: MemoryStore) -> Result<TestContext> {
        self.context_on(author, store).await
    }

    /// Open a context on any storage backend.
    pub async fn context_on<B: BlobStore>(
        &self,
        author: &str,
        backend: B,
    ) -> Result<ChatContext<B, MemoryBus>> {
        Ok(ChatContext::join(self.config.clone(), backend, &self.hub)
            .await?
            .with_author(author)
            .with_clock(Arc::new(FixedClock::new(FIXTURE_TIME))))
    }

    /// Open `count` contexts named `User0`, `User1`, ...
    pub async fn contexts(&self, count: usize) -> Result<Vec<TestContext>> {
        let mut contexts = Vec::with_capacity(count);
        for i in 0..count {
            contexts.push(self.context(&format!("User{}", i)).await?);
        }
        Ok(contexts)
    }
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply every pending remote message in every context.
pub async fn pump_all(contexts: &mut [TestContext]) -> Result<usize> {
    let mut total = 0;
    for ctx in contexts.iter_mut() {
        total += ctx.pump().await?;
    }
    Ok(total)
}

/// A text message as a fixture context would stamp it.
pub fn text_message(author: &str, text: &str) -> Message {
    Message {
        author: author.to_string(),
        text: Some(text.to_string()),
        image: None,
        sent_at: FIXTURE_TIME.to_string(),
        reactions: Vec::new(),
    }
}

/// Texts of a context's messages, in log order. Image-only entries are skipped.
pub fn texts<B: BlobStore, T: BroadcastBus>(ctx: &ChatContext<B, T>) -> Vec<String> {
    ctx.messages().iter().filter_map(|m| m.text.clone()).collect()
}

/// Install a fmt subscriber writing to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}
