//! CBOR encoder for stored documents.

use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use ciborium::value::Value as Cbor;

/// CBOR tag marking a 16-byte identity (IANA "binary UUID").
pub const OBJECT_ID_TAG: u64 = 37;

/// Encode a document to CBOR bytes.
///
/// Field order follows the document's sorted key order, so identical
/// documents always produce identical bytes.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn to_cbor(document: &Document) -> CodecResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(64);
    ciborium::into_writer(&document_to_cbor(document), &mut buffer)
        .map_err(|e| CodecError::encoding_failed(format!("{e:?}")))?;
    Ok(buffer)
}

fn document_to_cbor(document: &Document) -> Cbor {
    Cbor::Map(
        document
            .iter()
            .map(|(key, value)| (Cbor::Text(key.clone()), value_to_cbor(value)))
            .collect(),
    )
}

fn value_to_cbor(value: &Value) -> Cbor {
    match value {
        Value::Null => Cbor::Null,
        Value::Bool(b) => Cbor::Bool(*b),
        Value::Integer(n) => Cbor::Integer((*n).into()),
        Value::Float(f) => Cbor::Float(*f),
        Value::Text(s) => Cbor::Text(s.clone()),
        Value::Bytes(b) => Cbor::Bytes(b.clone()),
        Value::ObjectId(id) => Cbor::Tag(OBJECT_ID_TAG, Box::new(Cbor::Bytes(id.as_bytes().to_vec()))),
        Value::Array(items) => Cbor::Array(items.iter().map(value_to_cbor).collect()),
        Value::Document(doc) => document_to_cbor(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::object_id::ObjectId;

    #[test]
    fn encoding_is_deterministic() {
        let a = doc! { "b" => 2, "a" => 1 };
        let b = doc! { "a" => 1, "b" => 2 };
        assert_eq!(to_cbor(&a).unwrap(), to_cbor(&b).unwrap());
    }

    #[test]
    fn empty_document_is_empty_map() {
        // 0xa0: map of length zero
        assert_eq!(to_cbor(&Document::new()).unwrap(), vec![0xa0]);
    }

    #[test]
    fn object_id_is_tagged() {
        let id = ObjectId::from_bytes([7; 16]);
        let bytes = to_cbor(&doc! { "_id" => id }).unwrap();
        // map(1), text(3) "_id", tag(37), bytes(16)
        assert_eq!(&bytes[..6], &[0xa1, 0x63, b'_', b'i', b'd', 0xd8]);
        assert_eq!(bytes[6], 37);
        assert_eq!(bytes[7], 0x50);
    }
}
