//! # Docmap Schema
//!
//! Declarative schemas for docmap entities.
//!
//! The ODM core only knows the [`docmap_core::Schema`] contract. This crate
//! provides [`StructuredSchema`], an implementation built from typed field
//! declarations:
//!
//! ```rust
//! use docmap_codec::doc;
//! use docmap_core::Schema;
//! use docmap_schema::{FieldKind, StructuredSchema};
//!
//! let address = StructuredSchema::new().required("city", FieldKind::Text);
//! let schema = StructuredSchema::new()
//!     .required("name", FieldKind::Text)
//!     .optional("address", FieldKind::Document(address));
//!
//! let err = schema
//!     .validate(&doc! { "name" => "abs", "address" => doc! {} })
//!     .unwrap_err();
//! assert_eq!(err.path(), "address.city");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod structured;

pub use structured::{FieldKind, StructuredSchema};
