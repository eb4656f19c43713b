//! # NexaChat Store
//!
//! Durable storage for NexaChat. The whole message log is kept as a single
//! serialized blob under one key, behind the [`BlobStore`] trait.
//!
//! ## Key Types
//!
//! - [`BlobStore`] - Async key-value trait for string blobs
//! - [`SqliteStore`] - SQLite-based persistent backend
//! - [`MemoryStore`] - In-memory backend for tests and ephemeral contexts
//! - [`DurableStore`] - Loads and saves a message log through a backend
//! - [`LoadPolicy`] - Recover or fail when stored data is unreadable
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nexachat_store::{DurableStore, SqliteStore};
//!
//! async fn example() {
//!     let store = DurableStore::new(SqliteStore::open("chat.db").unwrap());
//!
//!     let log = store.load().await.unwrap();
//!     store.save(&log).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-log writes**: every save replaces the stored payload
//! - **Fail soft**: an unreadable payload loads as an empty log under
//!   [`LoadPolicy::Recover`]
//! - **Legacy records**: payloads written with `user`/`img`/`time` field
//!   names still decode

pub mod durable;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use durable::{DurableStore, LoadPolicy, LoadReport, DEFAULT_STORAGE_KEY};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::BlobStore;
