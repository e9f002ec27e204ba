//! Test fixtures and ODM helpers.
//!
//! Provides convenience functions for setting up an ODM over the
//! in-memory driver and seeding it with data.

use docmap_codec::Document;
use docmap_core::{Collection, Entity, OdmConfig, SharedConnection};
use docmap_driver::{Connection, InMemoryConnection, WriteConcern};
use std::sync::Arc;

/// An ODM wired to a fresh in-memory store.
pub struct TestOdm {
    /// The in-memory store, for inspection and fault injection.
    pub connection: InMemoryConnection,
    /// The shared connection collections are built on.
    pub shared: Arc<SharedConnection>,
}

impl TestOdm {
    /// Creates a test ODM with the default configuration.
    pub fn new() -> Self {
        Self::with_config(OdmConfig::default())
    }

    /// Creates a test ODM with a custom configuration.
    pub fn with_config(config: OdmConfig) -> Self {
        let connection = InMemoryConnection::new();
        let shared = Arc::new(SharedConnection::with_connection(
            Arc::new(connection.clone()),
            config,
        ));
        Self { connection, shared }
    }

    /// Creates a test ODM whose shared connection is not yet configured.
    ///
    /// The store is created but not attached; call [`TestOdm::attach`].
    pub fn detached() -> Self {
        Self {
            connection: InMemoryConnection::new(),
            shared: Arc::new(SharedConnection::new(OdmConfig::default())),
        }
    }

    /// Attaches the store to a detached shared connection.
    pub fn attach(&self) {
        self.shared
            .set(Arc::new(self.connection.clone()))
            .expect("Shared connection already configured");
    }

    /// Returns the collection of `E`.
    pub fn collection<E: Entity>(&self) -> Collection<E> {
        Collection::new(&self.shared)
    }

    /// Returns the number of round trips the store has served.
    pub fn round_trips(&self) -> u64 {
        self.connection.round_trips()
    }

    /// Writes raw documents straight into a collection, bypassing the ODM.
    pub fn seed(&self, database: &str, collection: &str, documents: &[Document]) {
        let handle = self
            .connection
            .database(database)
            .and_then(|db| db.collection(collection))
            .expect("Failed to resolve seed collection");
        for document in documents {
            handle
                .save(document, WriteConcern::Acknowledged)
                .expect("Failed to seed document");
        }
    }
}

impl Default for TestOdm {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a fresh in-memory ODM.
///
/// # Example
///
/// ```rust
/// use docmap_testkit::{with_memory_odm, User};
///
/// with_memory_odm(|odm| {
///     let users = odm.collection::<User>();
///     assert_eq!(users.count(&Default::default()).unwrap(), 0);
/// });
/// ```
pub fn with_memory_odm<F, R>(f: F) -> R
where
    F: FnOnce(&TestOdm) -> R,
{
    let odm = TestOdm::new();
    f(&odm)
}

/// Parses a JSON array of objects into documents.
///
/// # Errors
///
/// Returns the JSON error if the input is not an array of objects.
pub fn load_json_fixture(json: &str) -> serde_json::Result<Vec<Document>> {
    serde_json::from_str(json)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use crate::entities::User;

    /// Users with distinct names and ascending ages.
    pub const USERS_JSON: &str = r#"[
        {"name": "abs", "age": 31, "tags": ["admin"]},
        {"name": "neema", "age": 27, "tags": []},
        {"name": "juma", "age": 45, "tags": ["ops", "admin"]}
    ]"#;

    /// Creates an ODM whose user collection holds [`USERS_JSON`].
    pub fn populated_users() -> TestOdm {
        let odm = TestOdm::new();
        let users = load_json_fixture(USERS_JSON).expect("Invalid user fixture");
        odm.seed(User::DATABASE, User::COLLECTION, &users);
        odm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Note, User};

    #[test]
    fn test_memory_odm() {
        let odm = TestOdm::new();
        assert!(odm.shared.is_configured());
        assert_eq!(odm.round_trips(), 0);
    }

    #[test]
    fn test_detached_odm() {
        let odm = TestOdm::detached();
        assert!(!odm.shared.is_configured());
        odm.attach();
        assert!(odm.collection::<Note>().resolve().is_ok());
    }

    #[test]
    fn test_json_fixture() {
        let documents = load_json_fixture(scenarios::USERS_JSON).unwrap();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].get_str("name").unwrap(), "abs");
        assert_eq!(documents[2].get_i64("age").unwrap(), 45);

        assert!(load_json_fixture("{}").is_err());
    }

    #[test]
    fn test_populated_scenario() {
        let odm = scenarios::populated_users();
        assert_eq!(odm.connection.document_count("app", "users"), 3);
        with_memory_odm(|fresh| {
            assert_eq!(fresh.connection.document_count("app", "users"), 0);
        });
        let users = odm.collection::<User>();
        assert_eq!(users.count(&Document::new()).unwrap(), 3);
    }
}
