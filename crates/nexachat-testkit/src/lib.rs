//! # NexaChat Testkit
//!
//! Testing utilities for NexaChat.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Wire vectors**: known JSON records, canonical and legacy, with the
//!   messages they decode to
//! - **Generators**: Proptest strategies for drafts, messages and logs
//! - **Fixtures**: Multi-context setups on one in-memory hub
//! - **Faults**: A storage backend whose writes fail on demand
//!
//! ## Wire Vectors
//!
//! ```rust
//! use nexachat_testkit::vectors::verify_all_vectors;
//!
//! assert!(verify_all_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use nexachat_testkit::generators::message_log;
//!
//! proptest! {
//!     #[test]
//!     fn encode_decode(log in message_log(10)) {
//!         let raw = nexachat_core::encode_log(&log).unwrap();
//!         prop_assert_eq!(nexachat_core::decode_log(&raw).unwrap(), log);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use nexachat_testkit::fixtures::TestNetwork;
//!
//! async fn example() {
//!     let net = TestNetwork::new();
//!     let mut alice = net.context("Alice").await.unwrap();
//!     let mut bob = net.context("Bob").await.unwrap();
//!
//!     alice.say("hi").await.unwrap();
//!     bob.pump().await.unwrap();
//! }
//! ```

pub mod faults;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use faults::FaultyStore;
pub use fixtures::{init_tracing, pump_all, text_message, texts, TestContext, TestNetwork, FIXTURE_TIME};
pub use generators::{message, message_log, valid_draft};
pub use vectors::{all_vectors, verify_all_vectors, WireVector};
