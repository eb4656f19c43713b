//! Proptest generators for property-based testing.

use proptest::prelude::*;

use nexachat_core::{Message, MessageDraft, REACTION_PALETTE};

/// Generate a display name.
pub fn author() -> impl Strategy<Value = String> {
    "User[0-9]{1,3}".prop_map(String::from)
}

/// Generate non-empty message text, including non-ASCII.
pub fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 !?,.😊é]{1,64}".prop_map(String::from)
}

/// Generate a data-URI image reference.
pub fn image_ref() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{4,64}".prop_map(|b64| format!("data:image/png;base64,{}", b64))
}

/// Generate a reaction, mostly from the palette.
pub fn reaction() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::sample::select(REACTION_PALETTE.to_vec()).prop_map(String::from),
        1 => "[a-z]{1,3}".prop_map(String::from),
    ]
}

/// Generate a draft that passes validation.
pub fn valid_draft() -> impl Strategy<Value = MessageDraft> {
    (author(), prop::option::of(text()), prop::option::of(image_ref()))
        .prop_filter("needs text or image", |(_, t, i)| t.is_some() || i.is_some())
        .prop_map(|(author, text, image)| MessageDraft { author, text, image })
}

/// Generate a draft that validation rejects.
pub fn empty_draft() -> impl Strategy<Value = MessageDraft> {
    (
        author(),
        prop::option::of(Just(String::new())),
        prop::option::of(Just(String::new())),
    )
        .prop_map(|(author, text, image)| MessageDraft { author, text, image })
}

/// Generate a stored message, reactions included.
pub fn message() -> impl Strategy<Value = Message> {
    (
        valid_draft(),
        "[0-9]{1,2}:[0-9]{2}:[0-9]{2} [AP]M",
        prop::collection::vec(reaction(), 0..5),
    )
        .prop_map(|(draft, sent_at, reactions)| Message {
            author: draft.author,
            text: draft.text,
            image: draft.image,
            sent_at,
            reactions,
        })
}

/// Generate a log of up to `max_len` messages.
pub fn message_log(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(message(), 0..=max_len)
}
