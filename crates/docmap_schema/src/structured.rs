//! Structured schemas: declared, typed fields.

use docmap_codec::{Document, Value};
use docmap_core::{Schema, ValidationError};
use std::collections::BTreeMap;

/// The type a declared field must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any value.
    Any,
    /// Boolean.
    Bool,
    /// Integer.
    Integer,
    /// Float; integers are accepted too.
    Float,
    /// Text.
    Text,
    /// Byte string.
    Bytes,
    /// Object identity.
    ObjectId,
    /// Array whose elements all have the given kind.
    Array(Box<FieldKind>),
    /// Embedded document checked against a nested schema.
    Document(StructuredSchema),
}

impl FieldKind {
    /// Shorthand for an array of `kind`.
    pub fn array_of(kind: FieldKind) -> Self {
        Self::Array(Box::new(kind))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::ObjectId => "object_id",
            Self::Array(_) => "array",
            Self::Document(_) => "document",
        }
    }

    /// Value a fresh instance holds when the field has no default.
    fn zero_value(&self) -> Value {
        match self {
            Self::Any | Self::ObjectId => Value::Null,
            Self::Bool => Value::Bool(false),
            Self::Integer => Value::Integer(0),
            Self::Float => Value::Float(0.0),
            Self::Text => Value::Text(String::new()),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Array(_) => Value::Array(Vec::new()),
            Self::Document(schema) => Value::Document(schema.build_instance()),
        }
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        let accepted = match (self, value) {
            (Self::Any, _)
            | (Self::Bool, Value::Bool(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Float, Value::Float(_) | Value::Integer(_))
            | (Self::Text, Value::Text(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::ObjectId, Value::ObjectId(_)) => true,
            (Self::Array(element), Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    element.check(item, &format!("{path}.{index}"))?;
                }
                true
            }
            (Self::Document(schema), Value::Document(nested)) => {
                schema.validate_at(nested, path)?;
                true
            }
            _ => false,
        };

        if accepted {
            Ok(())
        } else {
            Err(ValidationError::new(
                path,
                format!("expected {}, found {}", self.name(), value.type_name()),
            ))
        }
    }
}

/// Declaration of one field.
#[derive(Debug, Clone, PartialEq)]
struct FieldSpec {
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
}

/// A schema of declared, typed fields.
///
/// - Required fields must be present and not null
/// - Optional fields may be absent or null
/// - Undeclared fields are rejected unless [`allow_extra`] is set
/// - Embedded documents and array elements are checked recursively
///
/// # Example
///
/// ```rust
/// use docmap_codec::doc;
/// use docmap_core::Schema;
/// use docmap_schema::{FieldKind, StructuredSchema};
///
/// let schema = StructuredSchema::new()
///     .required("name", FieldKind::Text)
///     .optional("age", FieldKind::Integer)
///     .with_default("role", FieldKind::Text, "member");
///
/// assert!(schema.validate(&doc! { "name" => "abs" }).is_ok());
/// assert!(schema.validate(&doc! { "age" => 3 }).is_err());
/// assert_eq!(schema.build_instance().get_str("role").unwrap(), "member");
/// ```
///
/// [`allow_extra`]: StructuredSchema::allow_extra
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredSchema {
    fields: BTreeMap<String, FieldSpec>,
    allow_extra: bool,
}

impl StructuredSchema {
    /// Creates a schema with no fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required field.
    #[must_use]
    pub fn required(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declare(name, kind, true, None)
    }

    /// Declares an optional field.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.declare(name, kind, false, None)
    }

    /// Declares an optional field with the value fresh instances start with.
    #[must_use]
    pub fn with_default(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        default: impl Into<Value>,
    ) -> Self {
        self.declare(name, kind, false, Some(default.into()))
    }

    /// Sets whether undeclared fields are accepted.
    #[must_use]
    pub fn allow_extra(mut self, value: bool) -> Self {
        self.allow_extra = value;
        self
    }

    /// Returns `true` if the field is declared.
    pub fn declares(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn declare(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        required: bool,
        default: Option<Value>,
    ) -> Self {
        self.fields.insert(
            name.into(),
            FieldSpec {
                kind,
                required,
                default,
            },
        );
        self
    }

    fn validate_at(&self, fields: &Document, prefix: &str) -> Result<(), ValidationError> {
        let path_of = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };

        for (key, value) in fields {
            let path = path_of(key);
            match self.fields.get(key) {
                None if self.allow_extra => {}
                None => return Err(ValidationError::new(path, "undeclared field")),
                Some(spec) if value.is_null() => {
                    if spec.required {
                        return Err(ValidationError::new(path, "required field is null"));
                    }
                }
                Some(spec) => spec.kind.check(value, &path)?,
            }
        }

        for (key, spec) in &self.fields {
            if spec.required && !fields.contains_key(key) {
                return Err(ValidationError::new(path_of(key), "required field missing"));
            }
        }
        Ok(())
    }
}

impl Schema for StructuredSchema {
    fn validate(&self, fields: &Document) -> Result<(), ValidationError> {
        self.validate_at(fields, "")
    }

    fn build_instance(&self) -> Document {
        self.fields
            .iter()
            .map(|(name, spec)| {
                let value = spec
                    .default
                    .clone()
                    .unwrap_or_else(|| spec.kind.zero_value());
                (name.clone(), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docmap_codec::{doc, ObjectId};

    fn address() -> StructuredSchema {
        StructuredSchema::new()
            .required("city", FieldKind::Text)
            .optional("zip", FieldKind::Text)
    }

    fn person() -> StructuredSchema {
        StructuredSchema::new()
            .required("name", FieldKind::Text)
            .optional("age", FieldKind::Integer)
            .optional("score", FieldKind::Float)
            .optional("owner", FieldKind::ObjectId)
            .with_default("tags", FieldKind::array_of(FieldKind::Text), Vec::<Value>::new())
            .optional("address", FieldKind::Document(address()))
    }

    #[test]
    fn accepts_valid_mapping() {
        let fields = doc! {
            "name" => "abs",
            "age" => 30,
            "score" => 7,
            "owner" => ObjectId::new(),
            "tags" => vec![Value::from("a")],
            "address" => doc! { "city" => "Mwanza" },
        };
        assert_eq!(person().validate(&fields), Ok(()));
    }

    #[test]
    fn required_fields() {
        let err = person().validate(&doc! { "age" => 3 }).unwrap_err();
        assert_eq!(err.path(), "name");
        assert_eq!(err.message(), "required field missing");

        let err = person().validate(&doc! { "name" => () }).unwrap_err();
        assert_eq!(err.message(), "required field is null");

        assert!(person().validate(&doc! { "name" => "abs", "age" => () }).is_ok());
    }

    #[test]
    fn type_mismatch() {
        let err = person()
            .validate(&doc! { "name" => "abs", "age" => "old" })
            .unwrap_err();
        assert_eq!(err, ValidationError::new("age", "expected integer, found text"));
    }

    #[test]
    fn nested_paths() {
        let err = person()
            .validate(&doc! { "name" => "abs", "address" => doc! { "zip" => "1" } })
            .unwrap_err();
        assert_eq!(err.path(), "address.city");

        let err = person()
            .validate(&doc! { "name" => "abs", "tags" => vec![Value::from("a"), Value::from(2)] })
            .unwrap_err();
        assert_eq!(err.path(), "tags.1");
        assert_eq!(err.to_string(), "tags.1: expected text, found integer");
    }

    #[test]
    fn declared_fields() {
        let schema = person();
        assert!(schema.declares("name"));
        assert!(schema.declares("address"));
        assert!(!schema.declares("address.city"));
        assert!(!schema.declares("nickname"));
    }

    #[test]
    fn undeclared_fields() {
        let fields = doc! { "name" => "abs", "nickname" => "a" };
        assert_eq!(person().validate(&fields).unwrap_err().path(), "nickname");
        assert!(person().allow_extra(true).validate(&fields).is_ok());
    }

    #[test]
    fn build_instance_uses_defaults_and_zero_values() {
        let instance = person().build_instance();
        assert_eq!(
            instance,
            doc! {
                "name" => "",
                "age" => 0,
                "score" => 0.0,
                "owner" => (),
                "tags" => Vec::<Value>::new(),
                "address" => doc! { "city" => "", "zip" => "" },
            }
        );
    }
}
