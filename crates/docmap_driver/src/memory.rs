//! In-memory document store driver.

use crate::error::{DriverError, DriverResult};
use crate::filter;
use crate::names::{validate_collection_name, validate_database_name};
use crate::options::{FindOptions, SortOrder, WriteConcern};
use crate::traits::{CollectionHandle, Connection, Database, RawCursor};
use docmap_codec::{from_cbor, to_cbor, CodecError, Document, ObjectId, Value, ID_FIELD};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Fully qualified collection name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Namespace {
    database: String,
    collection: String,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// A stored document: its identity plus its CBOR encoding.
#[derive(Debug, Clone)]
struct StoredDocument {
    id: ObjectId,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct StoreInner {
    collections: RwLock<HashMap<Namespace, Vec<StoredDocument>>>,
    round_trips: AtomicU64,
    pending_failure: Mutex<Option<String>>,
    closed: AtomicBool,
}

impl StoreInner {
    /// Records one exchange with the store, failing if the connection is closed.
    fn round_trip(&self) -> DriverResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DriverError::Closed);
        }
        self.round_trips.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Consumes an injected write failure, if one is armed.
    fn take_failure(&self, namespace: &Namespace, concern: WriteConcern) -> DriverResult<bool> {
        match self.pending_failure.lock().take() {
            Some(message) if concern.is_acknowledged() => {
                Err(DriverError::write_concern(namespace.to_string(), message))
            }
            Some(message) => {
                trace!(%namespace, %message, "unacknowledged write lost");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn matching(&self, namespace: &Namespace, filter: &Document) -> DriverResult<Vec<Document>> {
        let collections = self.collections.read();
        let Some(stored) = collections.get(namespace) else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for entry in stored {
            let document = from_cbor(&entry.bytes)?;
            if filter::matches(&document, filter)? {
                matched.push(document);
            }
        }
        Ok(matched)
    }

    /// Runs a query and returns the matching documents in result order,
    /// after the query's sort and skip, unprojected.
    fn ordered(
        &self,
        namespace: &Namespace,
        filter: &Document,
        options: &FindOptions,
    ) -> DriverResult<Vec<Document>> {
        let mut matched = self.matching(namespace, filter)?;

        if let Some((path, order)) = &options.sort {
            matched.sort_by(|a, b| {
                let ordering = filter::sort_order(a.get_path(path), b.get_path(path));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        Ok(matched
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .collect())
    }

    /// Identities of the query's result set, in result order.
    fn result_ids(
        &self,
        namespace: &Namespace,
        filter: &Document,
        options: &FindOptions,
    ) -> DriverResult<VecDeque<ObjectId>> {
        Ok(self
            .ordered(namespace, filter, options)?
            .iter()
            .filter_map(Document::id)
            .collect())
    }

    /// Loads the current version of a document, if it is still stored.
    fn load(&self, namespace: &Namespace, id: &ObjectId) -> DriverResult<Option<Document>> {
        let collections = self.collections.read();
        let entry = collections
            .get(namespace)
            .and_then(|stored| stored.iter().find(|entry| entry.id == *id));
        match entry {
            Some(entry) => Ok(Some(from_cbor(&entry.bytes)?)),
            None => Ok(None),
        }
    }
}

fn project(document: Document, fields: Option<&[String]>) -> Document {
    let Some(fields) = fields else {
        return document;
    };
    document
        .into_iter()
        .filter(|(key, _)| key == ID_FIELD || fields.iter().any(|f| f == key))
        .collect()
}

/// An in-memory document store.
///
/// This driver keeps every collection in memory and is suitable for:
/// - Unit and integration tests
/// - Ephemeral stores that don't need persistence
///
/// Documents are kept CBOR-encoded in insertion order. Every operation that
/// would cross the network on a real store counts as one round trip, which
/// [`InMemoryConnection::round_trips`] reports. Resolving databases and
/// collections is local and never counts.
///
/// # Example
///
/// ```rust
/// use docmap_codec::doc;
/// use docmap_driver::{Connection, FindOptions, InMemoryConnection, WriteConcern};
///
/// let connection = InMemoryConnection::new();
/// let users = connection.database("app").unwrap().collection("users").unwrap();
/// let id = users.save(&doc! { "name" => "abs" }, WriteConcern::Acknowledged).unwrap();
///
/// let mut cursor = users.find(doc! { "name" => "abs" }, FindOptions::new()).unwrap();
/// assert_eq!(cursor.next_document().unwrap().unwrap().id(), Some(id));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnection {
    inner: Arc<StoreInner>,
}

impl InMemoryConnection {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many round trips the store has served.
    #[must_use]
    pub fn round_trips(&self) -> u64 {
        self.inner.round_trips.load(Ordering::Relaxed)
    }

    /// Makes the next write fail with `message`.
    ///
    /// Acknowledged writes report the failure as
    /// [`DriverError::WriteConcern`]; unacknowledged writes are silently lost.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        *self.inner.pending_failure.lock() = Some(message.into());
    }

    /// Closes the connection. Every later operation fails with [`DriverError::Closed`].
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    /// Returns the number of documents stored in a collection.
    #[must_use]
    pub fn document_count(&self, database: &str, collection: &str) -> usize {
        let namespace = Namespace {
            database: database.to_string(),
            collection: collection.to_string(),
        };
        self.inner
            .collections
            .read()
            .get(&namespace)
            .map_or(0, Vec::len)
    }

    /// Returns the names of collections that hold documents in `database`, sorted.
    #[must_use]
    pub fn collection_names(&self, database: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .collections
            .read()
            .iter()
            .filter(|(ns, docs)| ns.database == database && !docs.is_empty())
            .map(|(ns, _)| ns.collection.clone())
            .collect();
        names.sort();
        names
    }
}

impl Connection for InMemoryConnection {
    fn database(&self, name: &str) -> DriverResult<Arc<dyn Database>> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(DriverError::Closed);
        }
        validate_database_name(name)?;
        Ok(Arc::new(MemoryDatabase {
            name: name.to_string(),
            inner: Arc::clone(&self.inner),
        }))
    }
}

/// A database handle of the in-memory store.
#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    inner: Arc<StoreInner>,
}

impl Database for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection(&self, name: &str) -> DriverResult<Arc<dyn CollectionHandle>> {
        validate_collection_name(name)?;
        Ok(Arc::new(MemoryCollection {
            namespace: Namespace {
                database: self.name.clone(),
                collection: name.to_string(),
            },
            inner: Arc::clone(&self.inner),
        }))
    }
}

/// A collection handle of the in-memory store.
#[derive(Debug)]
pub struct MemoryCollection {
    namespace: Namespace,
    inner: Arc<StoreInner>,
}

impl CollectionHandle for MemoryCollection {
    fn database_name(&self) -> &str {
        &self.namespace.database
    }

    fn name(&self) -> &str {
        &self.namespace.collection
    }

    fn save(&self, document: &Document, concern: WriteConcern) -> DriverResult<ObjectId> {
        self.inner.round_trip()?;

        let id = match document.get(ID_FIELD) {
            None => ObjectId::new(),
            Some(Value::ObjectId(id)) => *id,
            Some(other) => {
                return Err(CodecError::unexpected_type("object_id", other.type_name()).into())
            }
        };

        if self.inner.take_failure(&self.namespace, concern)? {
            return Ok(id);
        }

        let mut stored = document.clone();
        stored.insert(ID_FIELD, id);
        let bytes = to_cbor(&stored)?;

        let mut collections = self.inner.collections.write();
        let documents = collections.entry(self.namespace.clone()).or_default();
        match documents.iter_mut().find(|entry| entry.id == id) {
            Some(existing) => existing.bytes = bytes,
            None => documents.push(StoredDocument { id, bytes }),
        }

        trace!(namespace = %self.namespace, %id, "saved document");
        Ok(id)
    }

    fn remove(&self, id: &ObjectId, concern: WriteConcern) -> DriverResult<u64> {
        self.inner.round_trip()?;

        if self.inner.take_failure(&self.namespace, concern)? {
            return Ok(0);
        }

        let mut collections = self.inner.collections.write();
        let Some(documents) = collections.get_mut(&self.namespace) else {
            return Ok(0);
        };
        let before = documents.len();
        documents.retain(|entry| entry.id != *id);
        Ok((before - documents.len()) as u64)
    }

    fn find(&self, filter: Document, options: FindOptions) -> DriverResult<Box<dyn RawCursor>> {
        filter::validate(&filter)?;
        Ok(Box::new(MemoryCursor {
            inner: Arc::clone(&self.inner),
            namespace: self.namespace.clone(),
            filter,
            options,
            pending: None,
            buffer: VecDeque::new(),
            delivered: 0,
            exhausted: false,
        }))
    }

    fn count(&self, filter: &Document) -> DriverResult<u64> {
        self.inner.round_trip()?;
        Ok(self.inner.matching(&self.namespace, filter)?.len() as u64)
    }
}

/// A batch-fetching cursor over the in-memory store.
///
/// The first fetch fixes the result set: the identities of every matching
/// document, sorted, skipped and limited, are recorded then. Later batches
/// are served from that list, so writes made while iterating neither skip
/// nor repeat results. A document removed before its batch is fetched is
/// left out; one updated in between is returned in its current version.
pub struct MemoryCursor {
    inner: Arc<StoreInner>,
    namespace: Namespace,
    filter: Document,
    options: FindOptions,
    /// Result identities not yet fetched; `None` until the first fetch.
    pending: Option<VecDeque<ObjectId>>,
    buffer: VecDeque<Document>,
    /// Documents received from the store so far.
    delivered: usize,
    exhausted: bool,
}

impl fmt::Debug for MemoryCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCursor")
            .field("namespace", &self.namespace.to_string())
            .field("filter", &self.filter)
            .field("pending", &self.pending.as_ref().map(VecDeque::len))
            .field("buffered", &self.buffer.len())
            .field("delivered", &self.delivered)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl RawCursor for MemoryCursor {
    fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn refresh(&mut self) -> DriverResult<usize> {
        if self.exhausted {
            return Ok(0);
        }
        self.inner.round_trip()?;

        let batch_size = self.options.batch_size.max(1) as usize;
        let pending = match self.pending.take() {
            Some(pending) => pending,
            None => self
                .inner
                .result_ids(&self.namespace, &self.filter, &self.options)?,
        };
        let pending = self.pending.insert(pending);

        let mut batch = Vec::with_capacity(batch_size.min(pending.len()));
        while batch.len() < batch_size {
            let Some(id) = pending.pop_front() else {
                break;
            };
            if let Some(document) = self.inner.load(&self.namespace, &id)? {
                batch.push(project(document, self.options.projection.as_deref()));
            }
        }

        let fetched = batch.len();
        self.delivered += fetched;
        if pending.is_empty() {
            self.exhausted = true;
        }
        self.buffer.extend(batch);

        trace!(
            namespace = %self.namespace,
            fetched,
            exhausted = self.exhausted,
            "fetched cursor batch"
        );
        Ok(fetched)
    }

    fn pop_buffered(&mut self) -> Option<Document> {
        self.buffer.pop_front()
    }

    fn nth_document(&self, index: usize) -> DriverResult<Option<Document>> {
        self.inner.round_trip()?;
        Ok(self
            .inner
            .ordered(&self.namespace, &self.filter, &self.options)?
            .into_iter()
            .nth(index)
            .map(|document| project(document, self.options.projection.as_deref())))
    }

    fn count(&self) -> DriverResult<u64> {
        self.inner.round_trip()?;
        Ok(self.inner.matching(&self.namespace, &self.filter)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmap_codec::doc;

    fn users(connection: &InMemoryConnection) -> Arc<dyn CollectionHandle> {
        connection
            .database("app")
            .unwrap()
            .collection("users")
            .unwrap()
    }

    fn drain(cursor: &mut dyn RawCursor) -> Vec<Document> {
        let mut out = Vec::new();
        while let Some(document) = cursor.next_document().unwrap() {
            out.push(document);
        }
        out
    }

    #[test]
    fn resolving_handles_is_local() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        assert_eq!(handle.namespace(), "app.users");
        assert_eq!(connection.round_trips(), 0);
    }

    #[test]
    fn invalid_names_are_rejected() {
        let connection = InMemoryConnection::new();
        assert!(matches!(
            connection.database("bad.name"),
            Err(DriverError::InvalidName { kind: "database", .. })
        ));
        let db = connection.database("app").unwrap();
        assert!(matches!(
            db.collection("a$b"),
            Err(DriverError::InvalidName { kind: "collection", .. })
        ));
    }

    #[test]
    fn save_assigns_identity_and_upserts() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);

        let id = handle
            .save(&doc! { "name" => "abs" }, WriteConcern::Acknowledged)
            .unwrap();
        assert_eq!(connection.document_count("app", "users"), 1);

        let updated = doc! { ID_FIELD => id, "name" => "xyz" };
        assert_eq!(handle.save(&updated, WriteConcern::Acknowledged).unwrap(), id);
        assert_eq!(connection.document_count("app", "users"), 1);

        let mut cursor = handle.find(Document::new(), FindOptions::new()).unwrap();
        assert_eq!(drain(cursor.as_mut()), vec![updated]);
    }

    #[test]
    fn save_rejects_foreign_identity_types() {
        let connection = InMemoryConnection::new();
        let err = users(&connection)
            .save(&doc! { ID_FIELD => "abc" }, WriteConcern::Acknowledged)
            .unwrap_err();
        assert!(matches!(err, DriverError::Codec(CodecError::UnexpectedType { .. })));
    }

    #[test]
    fn remove_by_identity() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        let id = handle
            .save(&doc! { "name" => "abs" }, WriteConcern::Acknowledged)
            .unwrap();

        assert_eq!(handle.remove(&id, WriteConcern::Acknowledged).unwrap(), 1);
        assert_eq!(handle.remove(&id, WriteConcern::Acknowledged).unwrap(), 0);
        assert_eq!(connection.document_count("app", "users"), 0);
    }

    #[test]
    fn injected_failure_surfaces_only_when_acknowledged() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);

        connection.fail_next_write("disk full");
        let err = handle
            .save(&doc! { "name" => "abs" }, WriteConcern::Acknowledged)
            .unwrap_err();
        assert_eq!(err, DriverError::write_concern("app.users", "disk full"));
        assert_eq!(connection.document_count("app", "users"), 0);

        connection.fail_next_write("disk full");
        handle
            .save(&doc! { "name" => "abs" }, WriteConcern::Unacknowledged)
            .unwrap();
        assert_eq!(connection.document_count("app", "users"), 0);

        handle
            .save(&doc! { "name" => "abs" }, WriteConcern::Acknowledged)
            .unwrap();
        assert_eq!(connection.document_count("app", "users"), 1);
    }

    #[test]
    fn cursor_fetches_in_batches() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        for i in 0..5 {
            handle
                .save(&doc! { "n" => i }, WriteConcern::Acknowledged)
                .unwrap();
        }

        let before = connection.round_trips();
        let mut cursor = handle
            .find(Document::new(), FindOptions::new().batch_size(2))
            .unwrap();
        assert_eq!(connection.round_trips(), before);

        assert_eq!(cursor.refresh().unwrap(), 2);
        assert_eq!(cursor.buffered(), 2);
        let all = drain(cursor.as_mut());
        assert_eq!(all.len(), 5);
        // batches of 2, 2, 1
        assert_eq!(connection.round_trips(), before + 3);

        assert!(cursor.next_document().unwrap().is_none());
        assert_eq!(connection.round_trips(), before + 3);
    }

    #[test]
    fn cursor_result_set_survives_removals() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        for i in 0..6 {
            handle
                .save(&doc! { "n" => i }, WriteConcern::Acknowledged)
                .unwrap();
        }

        let mut cursor = handle
            .find(Document::new(), FindOptions::new().batch_size(2))
            .unwrap();
        let mut seen = Vec::new();
        while let Some(document) = cursor.next_document().unwrap() {
            seen.push(document.get_i64("n").unwrap());
            let id = document.id().unwrap();
            assert_eq!(handle.remove(&id, WriteConcern::Acknowledged).unwrap(), 1);
        }

        assert_eq!(seen, [0, 1, 2, 3, 4, 5]);
        assert_eq!(connection.document_count("app", "users"), 0);
    }

    #[test]
    fn cursor_skips_documents_removed_before_their_batch() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        let ids: Vec<ObjectId> = (0..4)
            .map(|i| {
                handle
                    .save(&doc! { "n" => i }, WriteConcern::Acknowledged)
                    .unwrap()
            })
            .collect();

        let mut cursor = handle
            .find(Document::new(), FindOptions::new().batch_size(1))
            .unwrap();
        assert_eq!(cursor.next_document().unwrap().unwrap().id(), Some(ids[0]));

        handle.remove(&ids[1], WriteConcern::Acknowledged).unwrap();
        handle.remove(&ids[2], WriteConcern::Acknowledged).unwrap();
        handle
            .save(&doc! { "n" => 9 }, WriteConcern::Acknowledged)
            .unwrap();

        let rest: Vec<ObjectId> = drain(cursor.as_mut())
            .iter()
            .filter_map(Document::id)
            .collect();
        assert_eq!(rest, [ids[3]]);
    }

    #[test]
    fn cursor_honours_filter_sort_skip_limit() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        for (name, age) in [("a", 40), ("b", 20), ("c", 30), ("d", 10)] {
            handle
                .save(&doc! { "name" => name, "age" => age }, WriteConcern::Acknowledged)
                .unwrap();
        }

        let options = FindOptions::new()
            .sort("age", SortOrder::Ascending)
            .skip(1)
            .limit(2)
            .projection(["name"]);
        let mut cursor = handle
            .find(doc! { "age" => doc! { "$gte" => 10 } }, options)
            .unwrap();

        let names: Vec<String> = drain(cursor.as_mut())
            .iter()
            .map(|d| d.get_str("name").unwrap().to_string())
            .collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!(cursor.count().unwrap(), 4);
    }

    #[test]
    fn nth_document_does_not_move_cursor() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        for i in 0..3 {
            handle
                .save(&doc! { "n" => i }, WriteConcern::Acknowledged)
                .unwrap();
        }

        let mut cursor = handle.find(Document::new(), FindOptions::new()).unwrap();
        let third = cursor.nth_document(2).unwrap().unwrap();
        assert_eq!(third.get_i64("n").unwrap(), 2);
        assert!(cursor.nth_document(3).unwrap().is_none());

        let first = cursor.next_document().unwrap().unwrap();
        assert_eq!(first.get_i64("n").unwrap(), 0);
    }

    #[test]
    fn invalid_filter_fails_at_find() {
        let connection = InMemoryConnection::new();
        let result = users(&connection).find(doc! { "$where" => "1" }, FindOptions::new());
        assert!(matches!(result, Err(DriverError::InvalidQuery { .. })));
    }

    #[test]
    fn closed_connection_rejects_everything() {
        let connection = InMemoryConnection::new();
        let handle = users(&connection);
        connection.close();

        assert_eq!(
            handle.save(&doc! {}, WriteConcern::Acknowledged).unwrap_err(),
            DriverError::Closed
        );
        assert!(matches!(connection.database("app"), Err(DriverError::Closed)));
    }

    #[test]
    fn collection_names_lists_non_empty() {
        let connection = InMemoryConnection::new();
        let db = connection.database("app").unwrap();
        db.collection("b")
            .unwrap()
            .save(&doc! { "x" => 1 }, WriteConcern::Acknowledged)
            .unwrap();
        db.collection("a")
            .unwrap()
            .save(&doc! { "x" => 1 }, WriteConcern::Acknowledged)
            .unwrap();
        assert_eq!(connection.collection_names("app"), ["a", "b"]);
        assert!(connection.collection_names("other").is_empty());
    }
}
