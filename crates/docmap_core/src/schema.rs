//! Entity schemas.
//!
//! The ODM does not validate fields itself: it asks the entity's
//! [`Schema`] to check a mapping before building a new entity, and to
//! produce a default instance when none is supplied.

use docmap_codec::Document;
use thiserror::Error;

/// A field mapping was rejected by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    path: String,
    message: String,
}

impl ValidationError {
    /// Creates a validation error for a dotted field path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the dotted path of the offending field.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validates field mappings and builds default instances.
pub trait Schema: Send + Sync {
    /// Checks a plain field mapping.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first problem found.
    fn validate(&self, fields: &Document) -> Result<(), ValidationError>;

    /// Builds the field mapping of a fresh entity.
    fn build_instance(&self) -> Document;
}

/// A schema that accepts every mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSchema;

impl Schema for OpenSchema {
    fn validate(&self, _fields: &Document) -> Result<(), ValidationError> {
        Ok(())
    }

    fn build_instance(&self) -> Document {
        Document::new()
    }
}
