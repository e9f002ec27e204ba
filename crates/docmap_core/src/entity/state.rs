//! Field state and lifecycle of a single entity.

use crate::binding::CollectionBinding;
use crate::error::{OdmError, OdmResult};
use crate::schema::{Schema, ValidationError};
use docmap_codec::{CodecError, Document, ObjectId, Value, ID_FIELD};
use std::sync::Arc;
use tracing::{debug, info};

/// The state behind every entity: its binding, fields and persistence flags.
///
/// # Lifecycle
///
/// - [`EntityState::new`] and [`EntityState::validated`] build unsaved state
/// - [`EntityState::from_raw`] wraps a stored record and counts as saved
/// - [`EntityState::save`] writes the fields and records the identity
/// - [`EntityState::remove`] deletes the record and clears the fields
///
/// The identity field `_id` only appears after a successful save or when
/// the state was built from a stored record.
#[derive(Debug, Clone)]
pub struct EntityState {
    binding: Arc<CollectionBinding>,
    fields: Document,
    persisted: bool,
    removed: bool,
}

impl EntityState {
    /// Creates empty, unsaved state.
    pub fn new(binding: Arc<CollectionBinding>) -> Self {
        Self {
            binding,
            fields: Document::new(),
            persisted: false,
            removed: false,
        }
    }

    /// Wraps a raw stored record without validating it.
    ///
    /// State built from a record is considered saved; with `None` it is
    /// empty and unsaved.
    pub fn from_raw(binding: Arc<CollectionBinding>, raw: Option<Document>) -> Self {
        let persisted = raw.is_some();
        Self {
            binding,
            fields: raw.unwrap_or_default(),
            persisted,
            removed: false,
        }
    }

    /// Builds unsaved state for a new record.
    ///
    /// With `Some(fields)` the mapping is checked by `schema` and copied in;
    /// with `None` the fields come from the schema's default instance.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::Validation`] if the mapping carries an identity
    /// or the schema rejects it.
    pub fn validated(
        binding: Arc<CollectionBinding>,
        schema: &dyn Schema,
        fields: Option<Document>,
    ) -> OdmResult<Self> {
        let fields = match fields {
            Some(fields) => {
                if fields.contains_key(ID_FIELD) {
                    return Err(ValidationError::new(
                        ID_FIELD,
                        "identity is assigned by the store",
                    )
                    .into());
                }
                schema.validate(&fields)?;
                fields
            }
            None => schema.build_instance(),
        };

        Ok(Self {
            binding,
            fields,
            persisted: false,
            removed: false,
        })
    }

    /// Returns the binding this entity is stored through.
    pub fn binding(&self) -> &Arc<CollectionBinding> {
        &self.binding
    }

    /// Returns the field mapping.
    pub fn fields(&self) -> &Document {
        &self.fields
    }

    /// Consumes the state, returning the field mapping.
    pub fn into_fields(self) -> Document {
        self.fields
    }

    /// Returns `true` if the fields are known to be stored.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Returns `true` once [`EntityState::remove`] has succeeded.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Returns the stored identity, if the entity has one.
    pub fn id(&self) -> Option<ObjectId> {
        self.fields.id()
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a field converted to `T`.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::KeyNotFound`] if the field is absent, or a codec
    /// error if it holds another type.
    pub fn get_as<'a, T>(&'a self, key: &str) -> OdmResult<T>
    where
        T: TryFrom<&'a Value, Error = CodecError>,
    {
        let value = self
            .fields
            .get(key)
            .ok_or_else(|| OdmError::key_not_found(key))?;
        Ok(T::try_from(value)?)
    }

    /// Sets a field, returning its previous value.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::Removed`] if the entity was removed and the
    /// configuration rejects writes after removal.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> OdmResult<Option<Value>> {
        self.ensure_writable()?;
        Ok(self.fields.insert(key, value))
    }

    /// Deletes a field, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::KeyNotFound`] if the field is absent, or
    /// [`OdmError::Removed`] as for [`EntityState::set`].
    pub fn delete(&mut self, key: &str) -> OdmResult<Value> {
        self.ensure_writable()?;
        self.fields
            .remove(key)
            .ok_or_else(|| OdmError::key_not_found(key))
    }

    /// Writes the fields to the bound collection.
    ///
    /// The store assigns an identity on the first save; later saves replace
    /// the same record. The identity is merged into the fields as `_id`.
    ///
    /// # Errors
    ///
    /// Returns binding resolution errors and driver errors unchanged, or
    /// [`OdmError::Removed`] as for [`EntityState::set`].
    pub fn save(&mut self) -> OdmResult<ObjectId> {
        self.ensure_writable()?;
        let handle = self.binding.resolve()?;

        let id = handle.save(&self.fields, self.binding.config().write_concern)?;
        self.fields.insert(ID_FIELD, id);
        self.persisted = true;
        self.removed = false;

        info!(namespace = %self.binding.namespace(), %id, "saved entity");
        Ok(id)
    }

    /// Deletes the stored record and clears the fields.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::NotPersisted`] if the entity is not stored,
    /// [`OdmError::KeyNotFound`] if a stored record carries no identity,
    /// and driver errors unchanged.
    pub fn remove(&mut self) -> OdmResult<()> {
        if !self.persisted {
            return Err(OdmError::NotPersisted);
        }
        let id = match self.fields.get(ID_FIELD) {
            Some(Value::ObjectId(id)) => *id,
            Some(other) => {
                return Err(CodecError::unexpected_type("object_id", other.type_name()).into())
            }
            None => return Err(OdmError::key_not_found(ID_FIELD)),
        };

        let handle = self.binding.resolve()?;
        let removed = handle.remove(&id, self.binding.config().write_concern)?;
        self.fields.clear();
        self.persisted = false;
        self.removed = true;

        debug!(namespace = %self.binding.namespace(), %id, removed, "removed entity");
        Ok(())
    }

    fn ensure_writable(&self) -> OdmResult<()> {
        if self.removed && self.binding.config().reject_writes_after_remove {
            return Err(OdmError::removed(self.binding.namespace()));
        }
        Ok(())
    }
}
