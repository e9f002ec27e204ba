//! Typed collection API.
//!
//! Provides `Collection<E>`, the entry point for constructing and querying
//! entities of one type.

mod typed;

pub use typed::Collection;
