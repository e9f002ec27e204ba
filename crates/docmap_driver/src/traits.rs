//! Driver trait definitions.

use crate::error::DriverResult;
use crate::options::{FindOptions, WriteConcern};
use docmap_codec::{Document, ObjectId};
use std::sync::Arc;

/// An open connection to a document store.
///
/// A connection is indexed by database name, then by collection name, to
/// yield a [`CollectionHandle`]. Both lookups are local: they validate the
/// name and build a handle, but never talk to the store.
pub trait Connection: Send + Sync {
    /// Returns a handle to the named logical database.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::InvalidName`] if the name is not a
    /// legal database name, or [`crate::DriverError::Closed`] if the
    /// connection has been closed.
    fn database(&self, name: &str) -> DriverResult<Arc<dyn Database>>;
}

/// A logical database inside a connection.
pub trait Database: Send + Sync {
    /// Returns the database name.
    fn name(&self) -> &str;

    /// Returns a handle to the named collection.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::InvalidName`] if the name is not a
    /// legal collection name.
    fn collection(&self, name: &str) -> DriverResult<Arc<dyn CollectionHandle>>;
}

/// A handle to one collection.
///
/// # Invariants
///
/// - `save` upserts by `_id`: a document without an identity is inserted
///   under a fresh one, a document with one replaces the stored record
/// - `save` returns the identity the document is stored under
/// - `remove` is keyed by identity and succeeds even if nothing matched
/// - `find` does no I/O; the returned cursor fetches lazily
pub trait CollectionHandle: Send + Sync {
    /// Returns the database name.
    fn database_name(&self) -> &str;

    /// Returns the collection name.
    fn name(&self) -> &str;

    /// Returns `database.collection`.
    fn namespace(&self) -> String {
        format!("{}.{}", self.database_name(), self.name())
    }

    /// Inserts or replaces a document.
    ///
    /// # Errors
    ///
    /// With [`WriteConcern::Acknowledged`], returns any failure the store
    /// reports. Unacknowledged writes never report store failures.
    fn save(&self, document: &Document, concern: WriteConcern) -> DriverResult<ObjectId>;

    /// Removes the document stored under `id`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// With [`WriteConcern::Acknowledged`], returns any failure the store
    /// reports.
    fn remove(&self, id: &ObjectId, concern: WriteConcern) -> DriverResult<u64>;

    /// Opens a cursor over the documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DriverError::InvalidQuery`] if the filter is
    /// malformed in a way that can be detected without touching the store.
    fn find(&self, filter: Document, options: FindOptions) -> DriverResult<Box<dyn RawCursor>>;

    /// Counts the documents matching `filter`.
    fn count(&self, filter: &Document) -> DriverResult<u64>;
}

/// A lazily fetched, forward-only stream of stored documents.
///
/// The cursor owns a buffer of documents already received. When it runs
/// dry, [`RawCursor::refresh`] fetches the next batch from the store.
pub trait RawCursor: Send {
    /// Number of documents waiting in the local buffer.
    fn buffered(&self) -> usize;

    /// Fetches the next batch into the buffer.
    ///
    /// Returns the number of documents received; zero means the result
    /// set is exhausted and further refreshes will also return zero.
    fn refresh(&mut self) -> DriverResult<usize>;

    /// Pops the earliest buffered document without fetching.
    fn pop_buffered(&mut self) -> Option<Document>;

    /// Returns the next document, fetching a batch if the buffer is empty.
    ///
    /// Returns `Ok(None)` once the result set is exhausted.
    fn next_document(&mut self) -> DriverResult<Option<Document>> {
        if self.buffered() == 0 && self.refresh()? == 0 {
            return Ok(None);
        }
        Ok(self.pop_buffered())
    }

    /// Fetches the document at `index` within this cursor's result set.
    ///
    /// This is an independent fetch: it honours the cursor's filter, sort
    /// and skip but does not move or consume the cursor's own position.
    /// Returns `Ok(None)` if `index` is past the end.
    fn nth_document(&self, index: usize) -> DriverResult<Option<Document>>;

    /// Counts every document matching the cursor's filter, ignoring skip and limit.
    fn count(&self) -> DriverResult<u64>;
}
