//! Error types for ODM operations.

use crate::schema::ValidationError;
use docmap_codec::CodecError;
use docmap_driver::DriverError;
use thiserror::Error;

/// Result type for ODM operations.
pub type OdmResult<T> = Result<T, OdmError>;

/// Errors that can occur in ODM operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OdmError {
    /// A binding tried to resolve before a connection was configured.
    #[error("no connection configured")]
    ConnectionNotConfigured,

    /// The shared connection was configured twice.
    #[error("connection is already configured")]
    ConnectionAlreadyConfigured,

    /// Field values were rejected by the entity's schema.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A field that was expected to exist is absent.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing field name.
        key: String,
    },

    /// The entity has never been saved, or was already removed.
    #[error("could not remove not in db document")]
    NotPersisted,

    /// The entity was removed and no longer accepts writes.
    #[error("entity in {namespace} was removed")]
    Removed {
        /// `database.collection` the entity was bound to.
        namespace: String,
    },

    /// Error reported by the store driver.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Error converting field values.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl OdmError {
    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates a removed entity error.
    pub fn removed(namespace: impl Into<String>) -> Self {
        Self::Removed {
            namespace: namespace.into(),
        }
    }
}
