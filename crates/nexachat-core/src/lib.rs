//! # NexaChat Core
//!
//! Pure primitives for NexaChat: messages, the per-context message log, and
//! the JSON record format shared by storage and the broadcast channel.
//!
//! This crate contains no I/O, no storage, no channels.
//!
//! ## Key Types
//!
//! - [`Message`] - One chat entry: author, optional text/image, time, reactions
//! - [`MessageDraft`] - Unvalidated user input, turned into a [`Message`]
//! - [`MessageLog`] - Append-only, index-addressed sequence of messages
//! - [`Clock`] - Source of the display-formatted `sentAt` string
//! - [`ContextId`] - Identity of one execution context on a channel

pub mod clock;
pub mod error;
pub mod log;
pub mod message;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock, DEFAULT_TIME_FORMAT};
pub use error::{CoreError, ValidationError};
pub use log::MessageLog;
pub use message::{
    decode_log, decode_message, encode_log, encode_message, Message, MessageDraft,
    REACTION_PALETTE,
};
pub use types::{random_display_name, ContextId};
