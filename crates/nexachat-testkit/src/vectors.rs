//! Wire vectors: known JSON records and the messages they must decode to.
//!
//! Both storage and the broadcast channel carry these records, so any
//! implementation talking to the same channel or reading the same storage
//! key has to agree on them.

use nexachat_core::{decode_message, encode_message, Message};

/// A single wire vector.
#[derive(Debug, Clone)]
pub struct WireVector {
    pub name: &'static str,
    pub description: &'static str,
    /// Record as it appears on the wire or in storage.
    pub json: &'static str,
    /// Whether encoding `expected` reproduces `json` (modulo whitespace and key order).
    pub canonical: bool,
    pub expected: Message,
}

fn message(
    author: &str,
    text: Option<&str>,
    image: Option<&str>,
    sent_at: &str,
    reactions: &[&str],
) -> Message {
    Message {
        author: author.to_string(),
        text: text.map(String::from),
        image: image.map(String::from),
        sent_at: sent_at.to_string(),
        reactions: reactions.iter().map(|r| r.to_string()).collect(),
    }
}

/// All wire vectors.
pub fn all_vectors() -> Vec<WireVector> {
    vec![
        WireVector {
            name: "text_only",
            description: "Plain text message, no reactions",
            json: r#"{"author":"Alice","text":"hi","image":null,"sentAt":"3:04:05 PM","reactions":[]}"#,
            canonical: true,
            expected: message("Alice", Some("hi"), None, "3:04:05 PM", &[]),
        },
        WireVector {
            name: "image_only",
            description: "Image attachment without text",
            json: r#"{"author":"User42","text":null,"image":"data:image/png;base64,iVBORw0KGgo=","sentAt":"9:00:00 AM","reactions":[]}"#,
            canonical: true,
            expected: message(
                "User42",
                None,
                Some("data:image/png;base64,iVBORw0KGgo="),
                "9:00:00 AM",
                &[],
            ),
        },
        WireVector {
            name: "reactions_ordered",
            description: "Reaction order is insertion order, duplicates kept",
            json: r#"{"author":"Bob","text":"lunch?","image":null,"sentAt":"11:59:59 AM","reactions":["❤️","👍","❤️"]}"#,
            canonical: true,
            expected: message("Bob", Some("lunch?"), None, "11:59:59 AM", &["❤️", "👍", "❤️"]),
        },
        WireVector {
            name: "legacy_field_names",
            description: "Record written with user/img/time field names",
            json: r#"{"user":"User7","text":"old","img":null,"time":"1:00:00 PM","reactions":["👍"]}"#,
            canonical: false,
            expected: message("User7", Some("old"), None, "1:00:00 PM", &["👍"]),
        },
        WireVector {
            name: "legacy_empty_text_with_image",
            description: "Legacy image message carrying an empty text string",
            json: r#"{"user":"User8","text":"","img":"data:image/gif;base64,R0lG","time":"2:00:00 PM","reactions":[]}"#,
            canonical: false,
            expected: message("User8", Some(""), Some("data:image/gif;base64,R0lG"), "2:00:00 PM", &[]),
        },
        WireVector {
            name: "missing_optionals",
            description: "Absent text, image and reactions decode as empty",
            json: r#"{"author":"Eve","sentAt":"5:05:05 PM","text":"x"}"#,
            canonical: false,
            expected: message("Eve", Some("x"), None, "5:05:05 PM", &[]),
        },
    ]
}

/// Check every vector, returning the names of the ones that failed.
pub fn verify_all_vectors() -> Vec<&'static str> {
    all_vectors()
        .into_iter()
        .filter(|v| !verify_vector(v))
        .map(|v| v.name)
        .collect()
}

/// Check one vector: it decodes to `expected`, and canonical vectors
/// re-encode to the same JSON value.
pub fn verify_vector(vector: &WireVector) -> bool {
    let Ok(decoded) = decode_message(vector.json) else {
        return false;
    };
    if decoded != vector.expected {
        return false;
    }
    if !vector.canonical {
        return true;
    }
    let Ok(encoded) = encode_message(&vector.expected) else {
        return false;
    };
    let reencoded: serde_json::Value = match serde_json::from_str(&encoded) {
        Ok(v) => v,
        Err(_) => return false,
    };
    let original: serde_json::Value = match serde_json::from_str(vector.json) {
        Ok(v) => v,
        Err(_) => return false,
    };
    reencoded == original
}
