//! CBOR decoder for stored documents.

use crate::document::Document;
use crate::encoder::OBJECT_ID_TAG;
use crate::error::{CodecError, CodecResult};
use crate::object_id::ObjectId;
use crate::value::Value;
use ciborium::value::Value as Cbor;

/// Decode a document from CBOR bytes.
///
/// The top-level item must be a map with text keys. Tag 37 byte strings
/// are restored as [`ObjectId`]s; every other tag is rejected.
///
/// # Errors
///
/// Returns an error if the bytes are not valid CBOR or contain items
/// that have no document representation.
pub fn from_cbor(bytes: &[u8]) -> CodecResult<Document> {
    let cbor: Cbor = ciborium::from_reader(bytes)
        .map_err(|e| CodecError::decoding_failed(format!("{e:?}")))?;
    match cbor {
        Cbor::Map(entries) => map_to_document(entries),
        _ => Err(CodecError::decoding_failed("top-level item is not a map")),
    }
}

fn map_to_document(entries: Vec<(Cbor, Cbor)>) -> CodecResult<Document> {
    let mut document = Document::new();
    for (key, value) in entries {
        let key = match key {
            Cbor::Text(text) => text,
            _ => return Err(CodecError::decoding_failed("map key is not text")),
        };
        document.insert(key, cbor_to_value(value)?);
    }
    Ok(document)
}

fn cbor_to_value(cbor: Cbor) -> CodecResult<Value> {
    Ok(match cbor {
        Cbor::Null => Value::Null,
        Cbor::Bool(b) => Value::Bool(b),
        Cbor::Integer(n) => Value::Integer(
            i64::try_from(n).map_err(|_| CodecError::decoding_failed("integer out of range"))?,
        ),
        Cbor::Float(f) => Value::Float(f),
        Cbor::Text(s) => Value::Text(s),
        Cbor::Bytes(b) => Value::Bytes(b),
        Cbor::Tag(OBJECT_ID_TAG, inner) => match *inner {
            Cbor::Bytes(bytes) => Value::ObjectId(
                ObjectId::from_slice(&bytes)
                    .ok_or_else(|| CodecError::decoding_failed("object id must be 16 bytes"))?,
            ),
            _ => return Err(CodecError::decoding_failed("object id tag without bytes")),
        },
        Cbor::Tag(tag, _) => {
            return Err(CodecError::decoding_failed(format!("unsupported tag {tag}")))
        }
        Cbor::Array(items) => Value::Array(
            items
                .into_iter()
                .map(cbor_to_value)
                .collect::<CodecResult<_>>()?,
        ),
        Cbor::Map(entries) => Value::Document(map_to_document(entries)?),
        _ => return Err(CodecError::decoding_failed("unsupported CBOR item")),
    })
}
