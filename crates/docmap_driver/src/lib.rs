//! # Docmap Driver
//!
//! Connection, collection and cursor abstraction over a document store.
//!
//! The ODM layer never talks to a store directly. It holds a
//! [`Connection`], resolves a [`CollectionHandle`] through it and reads
//! results through a [`RawCursor`]. Drivers implement these traits.
//!
//! ## Design Principles
//!
//! - Resolving databases and collections is local and never does I/O
//! - Writes carry an explicit [`WriteConcern`]
//! - Cursors fetch lazily in batches
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Drivers
//!
//! - [`InMemoryConnection`] - For testing and ephemeral stores
//!
//! ## Example
//!
//! ```rust
//! use docmap_codec::doc;
//! use docmap_driver::{Connection, InMemoryConnection, WriteConcern};
//!
//! let connection = InMemoryConnection::new();
//! let notes = connection.database("app").unwrap().collection("notes").unwrap();
//! notes.save(&doc! { "body" => "hello" }, WriteConcern::Acknowledged).unwrap();
//! assert_eq!(notes.count(&doc! {}).unwrap(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod filter;
mod error;
mod memory;
mod names;
mod options;
mod traits;

pub use error::{DriverError, DriverResult};
pub use memory::{InMemoryConnection, MemoryCollection, MemoryCursor, MemoryDatabase};
pub use names::{validate_collection_name, validate_database_name, MAX_DATABASE_NAME_LEN};
pub use options::{FindOptions, SortOrder, WriteConcern, DEFAULT_BATCH_SIZE};
pub use traits::{CollectionHandle, Connection, Database, RawCursor};
