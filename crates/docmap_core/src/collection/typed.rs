//! Typed collection implementation.

use crate::binding::CollectionBinding;
use crate::connection::SharedConnection;
use crate::cursor::Cursor;
use crate::entity::{Entity, EntityState};
use crate::error::OdmResult;
use docmap_codec::{Document, ObjectId, ID_FIELD};
use docmap_driver::{CollectionHandle, FindOptions};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// Entry point for the entities of type `E`.
///
/// `Collection<E>` owns the binding for `E::DATABASE` / `E::COLLECTION`
/// and provides construction and query helpers. Every entity it builds or
/// returns shares that binding.
///
/// Queries are passed to the store as-is; nothing is filtered locally.
///
/// # Example
///
/// ```rust,ignore
/// use docmap_codec::doc;
/// use docmap_core::{Collection, Entity};
///
/// let users: Collection<User> = Collection::new(&shared);
///
/// // Insert
/// let mut user = users.create(Some(doc! { "name" => "abs" }))?;
/// let id = user.save()?;
///
/// // Get by ID
/// let found = users.by_id(&id.to_string())?;
///
/// // Iterate
/// for user in users.find(doc! { "age" => doc! { "$gt" => 25 } })? {
///     println!("{:?}", user?.get("name"));
/// }
/// ```
pub struct Collection<E: Entity> {
    binding: Arc<CollectionBinding>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Collection<E> {
    /// Creates the collection of `E` on a shared connection.
    ///
    /// Collections of the same entity type share one binding.
    pub fn new(shared: &Arc<SharedConnection>) -> Self {
        Self::with_binding(shared.binding(E::DATABASE, E::COLLECTION))
    }

    /// Creates a collection over an existing binding.
    pub fn with_binding(binding: Arc<CollectionBinding>) -> Self {
        Self {
            binding,
            _marker: PhantomData,
        }
    }

    /// Returns the binding.
    pub fn binding(&self) -> &Arc<CollectionBinding> {
        &self.binding
    }

    /// Returns the collection handle, resolving the binding on first use.
    ///
    /// # Errors
    ///
    /// See [`CollectionBinding::resolve`].
    pub fn resolve(&self) -> OdmResult<Arc<dyn CollectionHandle>> {
        self.binding.resolve()
    }

    /// Builds an empty, unsaved entity.
    pub fn new_entity(&self) -> E {
        E::from_state(EntityState::new(Arc::clone(&self.binding)))
    }

    /// Wraps a stored record without validating it.
    pub fn from_raw(&self, raw: Option<Document>) -> E {
        E::from_state(EntityState::from_raw(Arc::clone(&self.binding), raw))
    }

    /// Builds a new, unsaved entity checked against `E::schema()`.
    ///
    /// With `None` the fields come from the schema's default instance.
    ///
    /// # Errors
    ///
    /// See [`EntityState::validated`].
    pub fn create(&self, fields: Option<Document>) -> OdmResult<E> {
        let schema = E::schema();
        let state = EntityState::validated(Arc::clone(&self.binding), schema.as_ref(), fields)?;
        Ok(E::from_state(state))
    }

    /// Returns find options carrying the configured batch size.
    pub fn options(&self) -> FindOptions {
        FindOptions::new().batch_size(self.binding.config().batch_size)
    }

    /// Queries the collection, yielding entities.
    ///
    /// # Errors
    ///
    /// Returns binding resolution errors, or the driver's error if it
    /// rejects the criteria.
    pub fn find(&self, criteria: Document) -> OdmResult<Cursor<E>> {
        self.find_with(criteria, self.options())
    }

    /// Queries the collection with explicit options, yielding entities.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn find_with(&self, criteria: Document, options: FindOptions) -> OdmResult<Cursor<E>> {
        let raw = self.resolve()?.find(criteria, options)?;
        let binding = Arc::clone(&self.binding);
        Ok(Cursor::new(raw, move |document| {
            E::from_state(EntityState::from_raw(Arc::clone(&binding), Some(document)))
        }))
    }

    /// Queries the collection, yielding raw records.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn find_raw(&self, criteria: Document, options: FindOptions) -> OdmResult<Cursor<Document>> {
        Ok(Cursor::raw(self.resolve()?.find(criteria, options)?))
    }

    /// Returns the single entity matching `criteria`.
    ///
    /// With no match returns `None`. With several matches a warning is
    /// logged and the first one is returned.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn one(&self, criteria: Document) -> OdmResult<Option<E>> {
        self.one_with(criteria, self.options())
    }

    /// Returns the single entity matching `criteria`, with explicit options.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn one_with(&self, criteria: Document, options: FindOptions) -> OdmResult<Option<E>> {
        let mut cursor = self.find_with(criteria.clone(), options)?;
        match cursor.matched_count()? {
            0 => Ok(None),
            1 => cursor.advance(),
            matched => {
                warn!(
                    namespace = %self.binding.namespace(),
                    ?criteria,
                    matched,
                    "expected one document, returning the first"
                );
                cursor.advance()
            }
        }
    }

    /// Returns the entity whose `_id` is the given textual identity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OdmError::Codec`] if `id` is not a valid identity,
    /// otherwise see [`Collection::find`].
    pub fn by_id(&self, id: &str) -> OdmResult<Option<E>> {
        self.by_key(ID_FIELD, id)
    }

    /// Returns the entity whose `key` field holds the given textual identity.
    ///
    /// # Errors
    ///
    /// See [`Collection::by_id`].
    pub fn by_key(&self, key: &str, id: &str) -> OdmResult<Option<E>> {
        let id = ObjectId::parse_str(id)?;
        let mut criteria = Document::new();
        criteria.insert(key, id);
        self.one(criteria)
    }

    /// Returns the entity stored under `id`.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn get(&self, id: ObjectId) -> OdmResult<Option<E>> {
        let mut criteria = Document::new();
        criteria.insert(ID_FIELD, id);
        self.one(criteria)
    }

    /// Counts the entities matching `criteria`.
    ///
    /// # Errors
    ///
    /// See [`Collection::find`].
    pub fn count(&self, criteria: &Document) -> OdmResult<u64> {
        Ok(self.resolve()?.count(criteria)?)
    }
}

impl<E: Entity> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self::with_binding(Arc::clone(&self.binding))
    }
}

impl<E: Entity> fmt::Debug for Collection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("entity", &std::any::type_name::<E>())
            .field("binding", &self.binding)
            .finish()
    }
}
