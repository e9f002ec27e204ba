//! The entity trait.

use crate::entity::EntityState;
use crate::error::OdmResult;
use crate::schema::{OpenSchema, Schema};
use docmap_codec::{CodecError, Document, ObjectId, Value};

/// A typed record bound to one collection.
///
/// Implementors are thin structs around an [`EntityState`]. They name
/// their storage location and schema; everything else is provided.
///
/// # Example
///
/// ```rust
/// use docmap_codec::{Document, Value};
/// use docmap_core::{Entity, EntityState, Schema, ValidationError};
///
/// struct TitleRequired;
///
/// impl Schema for TitleRequired {
///     fn validate(&self, fields: &Document) -> Result<(), ValidationError> {
///         match fields.get("title") {
///             Some(Value::Text(_)) => Ok(()),
///             _ => Err(ValidationError::new("title", "required field missing")),
///         }
///     }
///
///     fn build_instance(&self) -> Document {
///         Document::new()
///     }
/// }
///
/// struct Post {
///     state: EntityState,
/// }
///
/// impl Entity for Post {
///     const DATABASE: &'static str = "blog";
///     const COLLECTION: &'static str = "posts";
///
///     fn schema() -> Box<dyn Schema> {
///         Box::new(TitleRequired)
///     }
///
///     fn from_state(state: EntityState) -> Self {
///         Self { state }
///     }
///
///     fn state(&self) -> &EntityState {
///         &self.state
///     }
///
///     fn state_mut(&mut self) -> &mut EntityState {
///         &mut self.state
///     }
/// }
/// ```
pub trait Entity: Sized + Send + 'static {
    /// Logical database the entity is stored in.
    const DATABASE: &'static str;

    /// Collection the entity is stored in.
    const COLLECTION: &'static str;

    /// Returns the schema new entities are checked against.
    fn schema() -> Box<dyn Schema> {
        Box::new(OpenSchema)
    }

    /// Wraps state into the entity type.
    fn from_state(state: EntityState) -> Self;

    /// Returns the entity's state.
    fn state(&self) -> &EntityState;

    /// Returns the entity's state mutably.
    fn state_mut(&mut self) -> &mut EntityState;

    /// Returns the stored identity, if any.
    fn id(&self) -> Option<ObjectId> {
        self.state().id()
    }

    /// Returns `true` if the entity is known to be stored.
    fn is_persisted(&self) -> bool {
        self.state().is_persisted()
    }

    /// Returns the raw field mapping.
    fn fields(&self) -> &Document {
        self.state().fields()
    }

    /// Returns a field value.
    fn get(&self, key: &str) -> Option<&Value> {
        self.state().get(key)
    }

    /// Returns a field converted to `T`.
    ///
    /// # Errors
    ///
    /// See [`EntityState::get_as`].
    fn get_as<'a, T>(&'a self, key: &str) -> OdmResult<T>
    where
        T: TryFrom<&'a Value, Error = CodecError>,
    {
        self.state().get_as(key)
    }

    /// Sets a field, returning its previous value.
    ///
    /// # Errors
    ///
    /// See [`EntityState::set`].
    fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> OdmResult<Option<Value>> {
        self.state_mut().set(key, value)
    }

    /// Deletes a field, returning its value.
    ///
    /// # Errors
    ///
    /// See [`EntityState::delete`].
    fn delete(&mut self, key: &str) -> OdmResult<Value> {
        self.state_mut().delete(key)
    }

    /// Saves the entity, returning its identity.
    ///
    /// # Errors
    ///
    /// See [`EntityState::save`].
    fn save(&mut self) -> OdmResult<ObjectId> {
        self.state_mut().save()
    }

    /// Removes the entity from its collection.
    ///
    /// # Errors
    ///
    /// See [`EntityState::remove`].
    fn remove(&mut self) -> OdmResult<()> {
        self.state_mut().remove()
    }
}
