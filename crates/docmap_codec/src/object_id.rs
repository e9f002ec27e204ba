//! Document identity.

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Store-assigned identity of a document.
///
/// Object IDs are 128-bit random values that are:
/// - Assigned by the store driver on first save
/// - Immutable once assigned
/// - Printed and parsed as hyphenated UUID text
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 16]);

impl ObjectId {
    /// Number of bytes in an object id.
    pub const LEN: usize = 16;

    /// Creates an object id from raw bytes.
    #[inline]
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Generates a fresh random object id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().into_bytes())
    }

    /// Parses the textual representation of an object id.
    ///
    /// Accepts the hyphenated, simple and braced UUID forms.
    pub fn parse_str(input: &str) -> CodecResult<Self> {
        Uuid::parse_str(input.trim())
            .map(|uuid| Self(uuid.into_bytes()))
            .map_err(|e| CodecError::invalid_object_id(input, e.to_string()))
    }

    /// Returns the raw bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates an object id from a slice.
    ///
    /// Returns `None` if the slice is not exactly 16 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(slice).ok().map(Self)
    }

    fn to_uuid(self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_uuid())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uuid())
    }
}

impl FromStr for ObjectId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl From<[u8; 16]> for ObjectId {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<ObjectId> for [u8; 16] {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

// Textual form keeps JSON transport readable.
impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_str(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_unique() {
        let id1 = ObjectId::new();
        let id2 = ObjectId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn display_parses_back() {
        let id = ObjectId::new();
        let parsed: ObjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_accepts_simple_form_and_whitespace() {
        let id = ObjectId::from_bytes([0xab; 16]);
        let simple = id.to_string().replace('-', "");
        assert_eq!(ObjectId::parse_str(&simple).unwrap(), id);
        assert_eq!(ObjectId::parse_str(&format!("  {id} ")).unwrap(), id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = ObjectId::parse_str("not-an-id").unwrap_err();
        assert!(matches!(err, CodecError::InvalidObjectId { ref input, .. } if input == "not-an-id"));
    }

    #[test]
    fn from_slice() {
        assert!(ObjectId::from_slice(&[0u8; 16]).is_some());
        assert!(ObjectId::from_slice(&[0u8; 12]).is_none());
        assert!(ObjectId::from_slice(&[0u8; 17]).is_none());
    }

    #[test]
    fn serde_uses_text() {
        let id = ObjectId::from_bytes([1; 16]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
