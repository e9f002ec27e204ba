//! # Docmap Core
//!
//! Object-document mapping for docmap.
//!
//! This crate provides:
//! - [`SharedConnection`], set once and passed to every collection
//! - [`CollectionBinding`], the lazily resolved handle of an entity type
//! - [`Entity`] and [`EntityState`] for field access, save and remove
//! - [`Collection`] for construction and queries
//! - [`Cursor`], which rehydrates stored records as entities
//! - [`Schema`], the contract new entities are validated through
//!
//! ## Example
//!
//! ```rust
//! use docmap_codec::doc;
//! use docmap_core::{Collection, Entity, EntityState, OdmConfig, SharedConnection};
//! use docmap_driver::InMemoryConnection;
//! use std::sync::Arc;
//!
//! struct Note {
//!     state: EntityState,
//! }
//!
//! impl Entity for Note {
//!     const DATABASE: &'static str = "app";
//!     const COLLECTION: &'static str = "notes";
//!
//!     fn from_state(state: EntityState) -> Self {
//!         Self { state }
//!     }
//!
//!     fn state(&self) -> &EntityState {
//!         &self.state
//!     }
//!
//!     fn state_mut(&mut self) -> &mut EntityState {
//!         &mut self.state
//!     }
//! }
//!
//! let shared = Arc::new(SharedConnection::new(OdmConfig::default()));
//! shared.set(Arc::new(InMemoryConnection::new())).unwrap();
//!
//! let notes: Collection<Note> = Collection::new(&shared);
//! let mut note = notes.create(Some(doc! { "body" => "hello" })).unwrap();
//! let id = note.save().unwrap();
//!
//! let found = notes.by_id(&id.to_string()).unwrap().unwrap();
//! assert_eq!(found.get_as::<String>("body").unwrap(), "hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod binding;
mod collection;
mod config;
mod connection;
mod cursor;
mod entity;
mod error;
mod schema;

pub use binding::CollectionBinding;
pub use collection::Collection;
pub use config::OdmConfig;
pub use connection::SharedConnection;
pub use cursor::Cursor;
pub use entity::{Entity, EntityState};
pub use error::{OdmError, OdmResult};
pub use schema::{OpenSchema, Schema, ValidationError};
