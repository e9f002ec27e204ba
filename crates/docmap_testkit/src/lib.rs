//! # Docmap Testkit
//!
//! Test utilities for docmap.
//!
//! This crate provides:
//! - Test fixtures over the in-memory driver
//! - Sample entity types with and without a structured schema
//! - Property-based test generators using proptest
//! - Log capture for asserting on tracing output
//!
//! ## Usage
//!
//! ```rust
//! use docmap_codec::doc;
//! use docmap_core::Entity;
//! use docmap_testkit::prelude::*;
//!
//! with_memory_odm(|odm| {
//!     let users = odm.collection::<User>();
//!     let mut user = users.create(Some(doc! { "name" => "abs" })).unwrap();
//!     user.save().unwrap();
//!     assert_eq!(odm.connection.document_count("app", "users"), 1);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entities;
pub mod fixtures;
pub mod generators;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::logging::*;
}

pub use entities::*;
pub use fixtures::*;
pub use generators::*;
pub use logging::*;
