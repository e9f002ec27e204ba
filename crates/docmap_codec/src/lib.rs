//! # docmap Codec
//!
//! Document values, identities and CBOR encoding for docmap.
//!
//! This crate provides:
//! - [`Value`]: every value a stored document may hold
//! - [`Document`]: a sorted field mapping, the unit of storage
//! - [`ObjectId`]: the store-assigned document identity
//! - [`to_cbor`] / [`from_cbor`]: the byte form drivers keep documents in
//!
//! ## Usage
//!
//! ```
//! use docmap_codec::{doc, from_cbor, to_cbor, ObjectId};
//!
//! let document = doc! { "_id" => ObjectId::new(), "name" => "abs" };
//! let bytes = to_cbor(&document).unwrap();
//! assert_eq!(from_cbor(&bytes).unwrap(), document);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod document;
mod encoder;
mod error;
mod object_id;
mod serde_impl;
mod value;

pub use decoder::from_cbor;
pub use document::{Document, ID_FIELD};
pub use encoder::{to_cbor, OBJECT_ID_TAG};
pub use error::{CodecError, CodecResult};
pub use object_id::ObjectId;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            "[a-zA-Z0-9 ]{0,16}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
            prop::array::uniform16(any::<u8>()).prop_map(|b| Value::ObjectId(ObjectId::from_bytes(b))),
        ]
    }

    proptest! {
        #[test]
        fn stored_bytes_decode_to_the_same_document(
            fields in prop::collection::btree_map("[a-z_]{1,8}", scalar(), 0..8)
        ) {
            let document: Document = fields.into_iter().collect();
            let decoded = from_cbor(&to_cbor(&document).unwrap()).unwrap();
            prop_assert_eq!(decoded, document);
        }
    }
}
