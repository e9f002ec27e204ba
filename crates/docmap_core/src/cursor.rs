//! Result cursor that rehydrates stored records.

use crate::error::OdmResult;
use docmap_codec::Document;
use docmap_driver::RawCursor;
use std::fmt;
use tracing::debug;

type WrapFn<T> = Box<dyn Fn(Document) -> T + Send>;

/// A lazy, forward-only sequence of query results.
///
/// The cursor wraps the driver's cursor together with a conversion from a
/// raw record to `T`. For entity queries the conversion builds an entity
/// through the raw-construct path; [`Cursor::raw`] passes records through
/// unchanged.
///
/// Records are fetched from the store in batches as the cursor advances.
/// Once exhausted, the cursor keeps returning `Ok(None)`.
///
/// # Example
///
/// ```rust
/// use docmap_codec::doc;
/// use docmap_core::Cursor;
/// use docmap_driver::{Connection, FindOptions, InMemoryConnection, WriteConcern};
///
/// let connection = InMemoryConnection::new();
/// let notes = connection.database("app").unwrap().collection("notes").unwrap();
/// notes.save(&doc! { "n" => 1 }, WriteConcern::Acknowledged).unwrap();
///
/// let raw = notes.find(doc! {}, FindOptions::new()).unwrap();
/// let mut cursor = Cursor::new(raw, |d| d.get_i64("n").unwrap_or_default());
/// assert_eq!(cursor.advance().unwrap(), Some(1));
/// assert_eq!(cursor.advance().unwrap(), None);
/// ```
pub struct Cursor<T> {
    raw: Box<dyn RawCursor>,
    wrap: WrapFn<T>,
    wrapping: Option<&'static str>,
}

impl Cursor<Document> {
    /// Creates a cursor that yields raw records.
    pub fn raw(raw: Box<dyn RawCursor>) -> Self {
        Self {
            raw,
            wrap: Box::new(|document| document),
            wrapping: None,
        }
    }
}

impl<T> Cursor<T> {
    /// Creates a cursor that converts every record with `wrap`.
    pub fn new(raw: Box<dyn RawCursor>, wrap: impl Fn(Document) -> T + Send + 'static) -> Self {
        Self {
            raw,
            wrap: Box::new(wrap),
            wrapping: Some(std::any::type_name::<T>()),
        }
    }

    /// Returns `true` if records are converted rather than passed through.
    pub fn is_wrapping(&self) -> bool {
        self.wrapping.is_some()
    }

    /// Number of records received but not yet returned.
    pub fn buffered(&self) -> usize {
        self.raw.buffered()
    }

    /// Returns the next result, fetching a batch when the buffer is empty.
    ///
    /// # Errors
    ///
    /// Returns driver errors from fetching a batch.
    pub fn advance(&mut self) -> OdmResult<Option<T>> {
        if self.raw.buffered() == 0 && self.raw.refresh()? == 0 {
            return Ok(None);
        }
        Ok(self.raw.pop_buffered().map(|document| self.convert(document)))
    }

    /// Returns the result at `index` without moving the cursor.
    ///
    /// The record is fetched on its own and honours the query's sort and
    /// skip. Past the end, returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns driver errors from the fetch.
    pub fn get(&self, index: usize) -> OdmResult<Option<T>> {
        Ok(self
            .raw
            .nth_document(index)?
            .map(|document| self.convert(document)))
    }

    /// Counts every record matching the query, ignoring skip and limit.
    ///
    /// This asks the store and does not move the cursor, unlike
    /// [`Iterator::count`], which drains it.
    ///
    /// # Errors
    ///
    /// Returns driver errors from the count.
    pub fn matched_count(&self) -> OdmResult<u64> {
        Ok(self.raw.count()?)
    }

    fn convert(&self, document: Document) -> T {
        if let Some(type_name) = self.wrapping {
            debug!(wrapping = type_name, id = ?document.id(), "wrapping record");
        }
        (self.wrap)(document)
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = OdmResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }
}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("wrapping", &self.wrapping)
            .field("buffered", &self.raw.buffered())
            .finish_non_exhaustive()
    }
}
