//! Chat messages and their JSON wire form.
//!
//! The same record shape is used on the broadcast channel and in durable
//! storage:
//!
//! ```text
//! {"author": "User417", "text": "hi", "image": null, "sentAt": "3:04:05 PM", "reactions": ["👍"]}
//! ```
//!
//! Records written by older clients spell the fields `user`, `img` and
//! `time`; both spellings decode, only the canonical one is written. A
//! record carrying both spellings of a field decodes with the canonical one.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CoreError, ValidationError};

/// Reactions offered by the chat UI. Any string is accepted as a reaction.
pub const REACTION_PALETTE: [&str; 2] = ["❤️", "👍"];

/// A chat message.
///
/// Immutable once appended to a log, except for `reactions`, which only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord")]
pub struct Message {
    /// Display name of the originating context.
    pub author: String,

    pub text: Option<String>,

    /// Opaque image reference, typically a base64 data URI.
    pub image: Option<String>,

    #[serde(rename = "sentAt")]
    pub sent_at: String,

    pub reactions: Vec<String>,
}

/// Decoding shape accepting both field spellings.
///
/// When a record carries both, the canonical field wins and the legacy one
/// is ignored.
#[derive(Deserialize)]
struct WireRecord {
    author: Option<String>,
    user: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(rename = "sentAt")]
    sent_at: Option<String>,
    time: Option<String>,
    #[serde(default)]
    reactions: Option<Vec<String>>,
}

impl TryFrom<WireRecord> for Message {
    type Error = &'static str;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let author = wire.author.or(wire.user).ok_or("missing field `author`")?;
        Ok(Self {
            author,
            text: wire.text,
            image: wire.image.or(wire.img),
            sent_at: wire.sent_at.or(wire.time).unwrap_or_default(),
            reactions: wire.reactions.unwrap_or_default(),
        })
    }
}

impl Message {
    /// Start composing a message from `author`.
    pub fn draft(author: impl Into<String>) -> MessageDraft {
        MessageDraft::new(author)
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|i| !i.is_empty())
    }
}

/// An unvalidated message as collected from user input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub author: String,
    pub text: Option<String>,
    pub image: Option<String>,
}

impl MessageDraft {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: None,
            image: None,
        }
    }

    /// Set the text body.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach an already-encoded image reference.
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check that the draft carries something to show.
    ///
    /// Empty strings count as absent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        let has_image = self.image.as_deref().is_some_and(|i| !i.is_empty());
        if !has_text && !has_image {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(())
    }

    /// Validate and stamp the draft, producing a message with no reactions.
    pub fn into_message(self, clock: &dyn Clock) -> Result<Message, CoreError> {
        self.validate()?;
        Ok(Message {
            author: self.author,
            text: self.text.filter(|t| !t.is_empty()),
            image: self.image.filter(|i| !i.is_empty()),
            sent_at: clock.now_display(),
            reactions: Vec::new(),
        })
    }
}

/// Encode a single message as a JSON record.
pub fn encode_message(message: &Message) -> Result<String, CoreError> {
    serde_json::to_string(message).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Decode a single JSON record.
pub fn decode_message(raw: &str) -> Result<Message, CoreError> {
    serde_json::from_str(raw).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// Encode a whole log as a JSON array.
pub fn encode_log(messages: &[Message]) -> Result<String, CoreError> {
    serde_json::to_string(messages).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Decode a JSON array of records. A literal `null` decodes as an empty log.
pub fn decode_log(raw: &str) -> Result<Vec<Message>, CoreError> {
    let parsed: Option<Vec<Message>> =
        serde_json::from_str(raw).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    Ok(parsed.unwrap_or_default())
}
