//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding, decoding or converting values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document to CBOR.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode CBOR bytes into a document.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// A textual identity could not be parsed.
    #[error("invalid object id {input:?}: {reason}")]
    InvalidObjectId {
        /// The rejected input.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A required field was absent.
    #[error("missing field: {key}")]
    MissingField {
        /// Name of the missing field.
        key: String,
    },

    /// A value had a different type than the caller asked for.
    #[error("unexpected value type: expected {expected}, found {actual}")]
    UnexpectedType {
        /// The requested type.
        expected: &'static str,
        /// The type actually present.
        actual: &'static str,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }

    /// Create an invalid object id error.
    pub fn invalid_object_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidObjectId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField { key: key.into() }
    }

    /// Create an unexpected type error.
    pub fn unexpected_type(expected: &'static str, actual: &'static str) -> Self {
        Self::UnexpectedType { expected, actual }
    }
}
