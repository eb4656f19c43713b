//! # NexaChat
//!
//! Serverless group chat state shared by independent execution contexts
//! (tabs, windows, or any set of cooperating instances in one origin).
//!
//! ## Overview
//!
//! Each context owns a [`ChatContext`]:
//!
//! - **Message log**: append-only, index-addressed, owned by one context
//! - **Durable store**: the whole log saved as one blob after every change
//! - **Broadcast bus**: locally sent messages are copied to every sibling
//! - **Reactions**: applied and saved locally, never broadcast
//!
//! Contexts never share memory. Each orders messages by the time it saw
//! them, so two contexts may disagree on the order of concurrent sends, and
//! reaction lists may differ between contexts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nexachat::{ChatConfig, ChatContext};
//! use nexachat::store::MemoryStore;
//! use nexachat::sync::MemoryHub;
//!
//! async fn example() {
//!     let hub = MemoryHub::new();
//!     let storage = MemoryStore::new();
//!
//!     let mut tab_a = ChatContext::join(ChatConfig::default(), storage.clone(), &hub)
//!         .await
//!         .unwrap();
//!     let mut tab_b = ChatContext::join(ChatConfig::default(), storage, &hub)
//!         .await
//!         .unwrap();
//!
//!     tab_a.send("Alice", Some("hi"), None).await.unwrap();
//!     tab_b.pump().await.unwrap();
//!     assert_eq!(tab_b.messages().len(), 1);
//!
//!     tab_b.react(0, "👍").await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `nexachat::core` - Messages, the message log, clocks
//! - `nexachat::store` - Durable storage backends
//! - `nexachat::sync` - Broadcast bus and the in-memory hub

pub mod context;
pub mod error;
pub mod reaction;

// Re-export component crates
pub use nexachat_core as core;
pub use nexachat_store as store;
pub use nexachat_sync as sync;

// Re-export main types for convenience
pub use context::{ChatConfig, ChatContext};
pub use error::{ChatError, Result};
pub use reaction::ReactionMutator;

pub use nexachat_core::{ContextId, Message, MessageDraft, MessageLog, REACTION_PALETTE};
