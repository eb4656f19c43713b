//! # NexaChat Sync
//!
//! Fan-out of chat messages between execution contexts sharing a named
//! broadcast channel.
//!
//! ## Overview
//!
//! Every context that joined a channel and subscribed gets a copy of each
//! message published by any *other* context on that channel. There is no
//! server, no acknowledgement and no retry.
//!
//! ## Key Properties
//!
//! - **No self-delivery**: a publisher never receives its own payload
//! - **Receipt order**: each subscriber sees payloads in arrival order
//! - **Best-effort**: contexts not subscribed at publish time miss the message
//! - **By value**: payloads cross the bus as serialized JSON records
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nexachat_core::{ContextId, FixedClock, Message};
//! use nexachat_sync::{BroadcastBus, MemoryHub, DEFAULT_CHANNEL_NAME};
//!
//! async fn example() {
//!     let hub = MemoryHub::new();
//!     let tab_a = hub.join(DEFAULT_CHANNEL_NAME, ContextId::random());
//!     let tab_b = hub.join(DEFAULT_CHANNEL_NAME, ContextId::random());
//!
//!     let mut inbox = tab_b.subscribe().await.unwrap();
//!
//!     let msg = Message::draft("Alice").text("hi").into_message(&FixedClock::new("now")).unwrap();
//!     tab_a.publish(&msg).await.unwrap();
//!
//!     assert_eq!(inbox.recv().await, Some(msg));
//! }
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Context A                 Hub                  Context B
//!   |--- publish(msg) ------>|                       |
//!   |                        |--- Envelope(json) --->| inbox
//!   |                        |                       |--- recv() -> msg
//! ```

pub mod bus;
pub mod error;
pub mod memory;

pub use bus::{BroadcastBus, Envelope, Subscription, DEFAULT_CHANNEL_NAME};
pub use error::{Result, SyncError};
pub use memory::{MemoryBus, MemoryHub, DEFAULT_INBOX_CAPACITY};
