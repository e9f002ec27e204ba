//! Lazy binding of an entity type to one collection.

use crate::config::OdmConfig;
use crate::connection::SharedConnection;
use crate::error::OdmResult;
use docmap_driver::CollectionHandle;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Connects an entity type to its backing collection.
///
/// The binding knows the database and collection names up front but only
/// obtains a collection handle on the first call to [`resolve`]. The handle
/// is cached; every later call returns the same one.
///
/// Resolving is local to the driver: names are validated and a handle is
/// built, but no request reaches the store.
///
/// [`resolve`]: CollectionBinding::resolve
pub struct CollectionBinding {
    database: String,
    collection: String,
    shared: Arc<SharedConnection>,
    handle: RwLock<Option<Arc<dyn CollectionHandle>>>,
}

impl CollectionBinding {
    /// Creates an unresolved binding.
    pub fn new(
        shared: Arc<SharedConnection>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            shared,
            handle: RwLock::new(None),
        }
    }

    /// Returns the target database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the target collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns `database.collection`.
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }

    /// Returns the configuration of the shared connection.
    pub fn config(&self) -> &OdmConfig {
        self.shared.config()
    }

    /// Returns `true` once a handle has been cached.
    pub fn is_resolved(&self) -> bool {
        self.handle.read().is_some()
    }

    /// Returns the collection handle, resolving it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OdmError::ConnectionNotConfigured`] if the shared
    /// connection has not been set, or the driver's error if it rejects
    /// the database or collection name.
    pub fn resolve(&self) -> OdmResult<Arc<dyn CollectionHandle>> {
        if let Some(handle) = self.handle.read().as_ref() {
            return Ok(Arc::clone(handle));
        }

        let connection = self.shared.get()?;
        let resolved = connection
            .database(&self.database)?
            .collection(&self.collection)?;

        let mut slot = self.handle.write();
        // another thread may have won the race
        let handle = slot.get_or_insert_with(|| {
            debug!(
                database = %self.database,
                collection = %self.collection,
                "resolved collection binding"
            );
            resolved
        });
        Ok(Arc::clone(handle))
    }
}

impl fmt::Debug for CollectionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionBinding")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OdmError;
    use docmap_driver::{DriverError, InMemoryConnection};

    fn shared() -> (InMemoryConnection, Arc<SharedConnection>) {
        let connection = InMemoryConnection::new();
        let shared = Arc::new(SharedConnection::with_connection(
            Arc::new(connection.clone()),
            OdmConfig::default(),
        ));
        (connection, shared)
    }

    #[test]
    fn resolve_requires_connection() {
        let shared = Arc::new(SharedConnection::new(OdmConfig::default()));
        let binding = CollectionBinding::new(shared, "app", "users");

        assert!(matches!(
            binding.resolve(),
            Err(OdmError::ConnectionNotConfigured)
        ));
        assert!(!binding.is_resolved());
    }

    #[test]
    fn resolve_is_cached_and_local() {
        let (connection, shared) = shared();
        let binding = CollectionBinding::new(shared, "app", "users");

        let first = binding.resolve().unwrap();
        let second = binding.resolve().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(binding.is_resolved());
        assert_eq!(first.namespace(), "app.users");
        assert_eq!(connection.round_trips(), 0);
    }

    #[test]
    fn connection_set_after_binding_creation() {
        let shared = Arc::new(SharedConnection::new(OdmConfig::default()));
        let binding = CollectionBinding::new(Arc::clone(&shared), "app", "users");

        shared.set(Arc::new(InMemoryConnection::new())).unwrap();
        assert!(binding.resolve().is_ok());
    }

    #[test]
    fn invalid_names_propagate() {
        let (_, shared) = shared();
        let binding = CollectionBinding::new(shared, "app", "");

        assert!(matches!(
            binding.resolve(),
            Err(OdmError::Driver(DriverError::InvalidName { .. }))
        ));
    }
}
