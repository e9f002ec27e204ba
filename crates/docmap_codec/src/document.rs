//! Field mapping of a stored document.

use crate::error::{CodecError, CodecResult};
use crate::object_id::ObjectId;
use crate::value::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Name of the identity field every stored document carries.
pub const ID_FIELD: &str = "_id";

/// An ordered mapping from field names to values.
///
/// Keys are kept sorted so that two documents with the same fields always
/// iterate, print and encode identically.
#[derive(Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if the field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the value of a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a mutable reference to a top-level field.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Resolves a dotted path (`"address.city"`) through embedded documents.
    ///
    /// Numeric segments index into arrays.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Document(doc) => doc.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Inserts a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Removes every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Copies every field of `other` into this document, overwriting on conflict.
    pub fn merge(&mut self, other: Document) {
        self.fields.extend(other.fields);
    }

    /// Iterates over fields in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Iterates over field names in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.fields.keys()
    }

    /// Returns the identity field, if present and of the identity type.
    pub fn id(&self) -> Option<ObjectId> {
        self.get(ID_FIELD).and_then(Value::as_object_id)
    }

    /// Returns a copy of this document without the identity field.
    #[must_use]
    pub fn without_id(&self) -> Self {
        let mut copy = self.clone();
        copy.remove(ID_FIELD);
        copy
    }

    /// Returns a text field, failing if it is absent or not text.
    pub fn get_str(&self, key: &str) -> CodecResult<&str> {
        let value = self.require(key)?;
        value
            .as_text()
            .ok_or_else(|| CodecError::unexpected_type("text", value.type_name()))
    }

    /// Returns an integer field, failing if it is absent or not an integer.
    pub fn get_i64(&self, key: &str) -> CodecResult<i64> {
        i64::try_from(self.require(key)?)
    }

    fn require(&self, key: &str) -> CodecResult<&Value> {
        self.get(key).ok_or_else(|| CodecError::missing_field(key))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fields.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.fields
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Builds a [`Document`] from `key => value` pairs.
///
/// ```
/// use docmap_codec::{doc, Value};
///
/// let d = doc! { "name" => "abs", "age" => 7 };
/// assert_eq!(d.get("name"), Some(&Value::from("abs")));
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut document = $crate::Document::new();
        $(document.insert($key, $value);)+
        document
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    #[test]
    fn keys_are_sorted() {
        let d = doc! { "z" => 1, "a" => 2, "m" => 3 };
        let keys: Vec<&String> = d.keys().collect();
        assert_eq!(keys, ["a", "m", "z"]);
    }

    #[test]
    fn insert_returns_previous() {
        let mut d = Document::new();
        assert_eq!(d.insert("name", "abs"), None);
        assert_eq!(d.insert("name", "xyz"), Some(Value::from("abs")));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn dotted_paths() {
        let d = doc! {
            "address" => doc! { "city" => "Arusha" },
            "tags" => vec![Value::from("a"), Value::from("b")],
        };

        assert_eq!(d.get_path("address.city"), Some(&Value::from("Arusha")));
        assert_eq!(d.get_path("tags.1"), Some(&Value::from("b")));
        assert_eq!(d.get_path("tags.9"), None);
        assert_eq!(d.get_path("address.zip"), None);
        assert_eq!(d.get_path("missing.city"), None);
    }

    #[test]
    fn identity_helpers() {
        let id = ObjectId::new();
        let d = doc! { ID_FIELD => id, "name" => "abs" };
        assert_eq!(d.id(), Some(id));
        assert_eq!(d.without_id(), doc! { "name" => "abs" });

        let text_id = doc! { ID_FIELD => "not an object id" };
        assert_eq!(text_id.id(), None);
    }

    #[test]
    fn typed_getters() {
        let d = doc! { "name" => "abs", "age" => 3 };
        assert_eq!(d.get_str("name").unwrap(), "abs");
        assert_eq!(d.get_i64("age").unwrap(), 3);
        assert!(d.get_i64("name").is_err());
        assert_eq!(
            d.get_str("missing").unwrap_err(),
            CodecError::missing_field("missing")
        );
    }

    #[test]
    fn merge_overwrites() {
        let mut d = doc! { "a" => 1, "b" => 2 };
        d.merge(doc! { "b" => 20, "c" => 30 });
        assert_eq!(d, doc! { "a" => 1, "b" => 20, "c" => 30 });
    }
}
