//! Identity types for execution contexts.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 16-byte identifier for one execution context (one open tab or window).
///
/// Contexts are anonymous; the id only distinguishes siblings on a
/// broadcast channel so a publisher never receives its own payloads.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub [u8; 16]);

impl ContextId {
    /// Create a new ContextId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generate a random context ID.
    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 16] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextId({})", &self.to_hex()[..8])
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..8])
    }
}

impl From<[u8; 16]> for ContextId {
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

/// Pick a throwaway display name such as `User417`.
///
/// Names are not unique; two contexts may draw the same one.
pub fn random_display_name() -> String {
    format!("User{}", rand::thread_rng().gen_range(0..1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_id_hex_roundtrip() {
        let id = ContextId::from_bytes([0x42; 16]);
        let recovered = ContextId::from_hex(&id.to_hex()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_context_id_rejects_wrong_length() {
        assert!(ContextId::from_hex("abcd").is_err());
    }

    #[test]
    fn test_context_id_display() {
        let id = ContextId::from_bytes([0xab; 16]);
        assert_eq!(format!("{}", id), "abababab");
        assert!(format!("{:?}", id).starts_with("ContextId("));
    }

    #[test]
    fn test_random_context_ids_differ() {
        assert_ne!(ContextId::random(), ContextId::random());
    }

    #[test]
    fn test_display_name_shape() {
        let name = random_display_name();
        let suffix = name.strip_prefix("User").unwrap();
        let n: u32 = suffix.parse().unwrap();
        assert!(n < 1000);
    }
}
