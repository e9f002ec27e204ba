//! Shared connection state.

use crate::binding::CollectionBinding;
use crate::config::OdmConfig;
use crate::error::{OdmError, OdmResult};
use docmap_driver::Connection;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

/// The connection every binding resolves through.
///
/// A `SharedConnection` is created once at startup, wrapped in an `Arc`
/// and handed to every [`crate::Collection`]. The underlying driver
/// connection is set exactly once, possibly after bindings have been
/// created; bindings only need it when they first resolve.
///
/// It also hands out one [`CollectionBinding`] per namespace, so every
/// collection of the same entity type shares a single cached handle.
///
/// # Example
///
/// ```rust
/// use docmap_core::{OdmConfig, SharedConnection};
/// use docmap_driver::InMemoryConnection;
/// use std::sync::Arc;
///
/// let shared = Arc::new(SharedConnection::new(OdmConfig::default()));
/// assert!(!shared.is_configured());
///
/// shared.set(Arc::new(InMemoryConnection::new())).unwrap();
/// assert!(shared.set(Arc::new(InMemoryConnection::new())).is_err());
/// ```
pub struct SharedConnection {
    connection: RwLock<Option<Arc<dyn Connection>>>,
    bindings: Mutex<HashMap<(String, String), Weak<CollectionBinding>>>,
    config: OdmConfig,
}

impl SharedConnection {
    /// Creates an unconfigured shared connection.
    pub fn new(config: OdmConfig) -> Self {
        Self {
            connection: RwLock::new(None),
            bindings: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Creates a shared connection that is already configured.
    pub fn with_connection(connection: Arc<dyn Connection>, config: OdmConfig) -> Self {
        let shared = Self::new(config);
        *shared.connection.write() = Some(connection);
        shared
    }

    /// Sets the driver connection.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::ConnectionAlreadyConfigured`] if a connection
    /// was already set.
    pub fn set(&self, connection: Arc<dyn Connection>) -> OdmResult<()> {
        let mut slot = self.connection.write();
        if slot.is_some() {
            return Err(OdmError::ConnectionAlreadyConfigured);
        }
        *slot = Some(connection);
        debug!("shared connection configured");
        Ok(())
    }

    /// Returns the driver connection.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::ConnectionNotConfigured`] while no connection is set.
    pub fn get(&self) -> OdmResult<Arc<dyn Connection>> {
        self.connection
            .read()
            .clone()
            .ok_or(OdmError::ConnectionNotConfigured)
    }

    /// Returns `true` once a connection has been set.
    pub fn is_configured(&self) -> bool {
        self.connection.read().is_some()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OdmConfig {
        &self.config
    }

    /// Returns the binding for `database.collection`, creating it on first use.
    ///
    /// Creating a binding does not resolve it. The binding lives as long
    /// as some collection or entity holds it.
    pub fn binding(self: &Arc<Self>, database: &str, collection: &str) -> Arc<CollectionBinding> {
        let mut bindings = self.bindings.lock();
        let key = (database.to_string(), collection.to_string());
        if let Some(existing) = bindings.get(&key).and_then(Weak::upgrade) {
            return existing;
        }
        let binding = Arc::new(CollectionBinding::new(Arc::clone(self), database, collection));
        bindings.insert(key, Arc::downgrade(&binding));
        binding
    }
}

impl fmt::Debug for SharedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedConnection")
            .field("configured", &self.is_configured())
            .field("bindings", &self.bindings.lock().len())
            .field("config", &self.config)
            .finish()
    }
}
