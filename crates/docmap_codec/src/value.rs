//! Dynamic document value type.

use crate::document::Document;
use crate::error::{CodecError, CodecResult};
use crate::object_id::ObjectId;

/// A dynamic field value.
///
/// This type covers every value a stored document may hold. Nested
/// documents and arrays may contain any other value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Integer(i64),
    /// Double precision float.
    Float(f64),
    /// Text string (UTF-8).
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Document identity.
    ObjectId(ObjectId),
    /// Array of values.
    Array(Vec<Value>),
    /// Embedded document.
    Document(Document),
}

impl Value {
    /// Returns the name of this value's type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::ObjectId(_) => "object_id",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float. Integers are widened.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as an object id, if it is one.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as an embedded document, if it is one.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Look up a key in this value when it is a document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_document().and_then(|doc| doc.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::ObjectId(id)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(values)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl TryFrom<&Value> for bool {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_bool()
            .ok_or_else(|| CodecError::unexpected_type("bool", value.type_name()))
    }
}

impl TryFrom<&Value> for i64 {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_integer()
            .ok_or_else(|| CodecError::unexpected_type("integer", value.type_name()))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_float()
            .ok_or_else(|| CodecError::unexpected_type("float", value.type_name()))
    }
}

impl TryFrom<&Value> for String {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| CodecError::unexpected_type("text", value.type_name()))
    }
}

impl TryFrom<&Value> for ObjectId {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_object_id()
            .ok_or_else(|| CodecError::unexpected_type("object_id", value.type_name()))
    }
}

impl TryFrom<&Value> for Document {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_document()
            .cloned()
            .ok_or_else(|| CodecError::unexpected_type("document", value.type_name()))
    }
}

impl TryFrom<&Value> for Vec<Value> {
    type Error = CodecError;

    fn try_from(value: &Value) -> CodecResult<Self> {
        value
            .as_array()
            .map(<[Value]>::to_vec)
            .ok_or_else(|| CodecError::unexpected_type("array", value.type_name()))
    }
}
