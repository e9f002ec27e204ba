//! Error types for driver operations.

use docmap_codec::CodecError;
use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// A stored document could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A database or collection name was rejected.
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        /// Either `"database"` or `"collection"`.
        kind: &'static str,
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A query filter could not be evaluated.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Description of the problem.
        message: String,
    },

    /// The store did not acknowledge a write.
    #[error("write concern failed on {namespace}: {message}")]
    WriteConcern {
        /// `database.collection` the write targeted.
        namespace: String,
        /// Description reported by the store.
        message: String,
    },

    /// The connection has been closed.
    #[error("connection is closed")]
    Closed,
}

impl DriverError {
    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Creates a write concern error.
    pub fn write_concern(namespace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteConcern {
            namespace: namespace.into(),
            message: message.into(),
        }
    }
}
