//! Property-based test generators using proptest.
//!
//! Provides strategies for generating identities, field mappings and
//! entity lifecycle operations.

use docmap_codec::{Document, ObjectId, Value};
use proptest::prelude::*;

/// Strategy for generating object identities.
pub fn object_id_strategy() -> impl Strategy<Value = ObjectId> {
    prop::array::uniform16(any::<u8>()).prop_map(ObjectId::from_bytes)
}

/// Strategy for generating field names that are neither `_id` nor operators.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating legal collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex")
}

/// Strategy for generating scalar values that survive a store round trip
/// and compare equal afterwards.
pub fn scalar_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[ -~]{0,16}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ]
}

/// Strategy for generating values nested at most two levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_value_strategy().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(field_name_strategy(), inner, 0..4)
                .prop_map(|fields| Value::Document(fields.into_iter().collect())),
        ]
    })
}

/// Strategy for generating free-form field mappings without an identity.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(field_name_strategy(), value_strategy(), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Strategy for generating field mappings accepted by the sample user schema.
pub fn user_fields_strategy() -> impl Strategy<Value = Document> {
    (
        "[a-z]{1,12}",
        prop::option::of(0i64..120),
        prop::option::of("[a-z]{1,8}@[a-z]{1,8}\\.org"),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(name, age, email, tags)| {
            let mut fields = Document::new();
            fields.insert("name", name);
            if let Some(age) = age {
                fields.insert("age", age);
            }
            if let Some(email) = email {
                fields.insert("email", email);
            }
            fields.insert(
                "tags",
                tags.into_iter().map(Value::from).collect::<Vec<_>>(),
            );
            fields
        })
}

/// One step of an entity's lifecycle.
#[derive(Debug, Clone)]
pub enum EntityOperation {
    /// Set a field
    Set {
        /// Field name
        field: String,
        /// New value
        value: Value,
    },
    /// Save the entity
    Save,
    /// Remove the entity
    Remove,
}

/// Strategy for generating entity operations.
pub fn entity_operation_strategy() -> impl Strategy<Value = EntityOperation> {
    prop_oneof![
        3 => (field_name_strategy(), scalar_value_strategy())
            .prop_map(|(field, value)| EntityOperation::Set { field, value }),
        2 => Just(EntityOperation::Save),
        1 => Just(EntityOperation::Remove),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<EntityOperation>> {
    prop::collection::vec(entity_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::User;
    use docmap_core::{Entity, Schema};
    use docmap_driver::validate_collection_name;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_ids_print_and_parse(id in object_id_strategy()) {
            let parsed = ObjectId::parse_str(&id.to_string()).unwrap();
            prop_assert_eq!(parsed, id);
        }

        #[test]
        fn generated_names_are_legal(name in collection_name_strategy()) {
            prop_assert!(validate_collection_name(&name).is_ok());
        }

        #[test]
        fn generated_documents_have_no_identity(doc in document_strategy()) {
            prop_assert!(doc.id().is_none());
            prop_assert!(doc.keys().all(|k| !k.starts_with('$')));
        }

        #[test]
        fn generated_users_validate(fields in user_fields_strategy()) {
            prop_assert!(User::schema().validate(&fields).is_ok());
        }

        #[test]
        fn operation_sequences_respect_bounds(ops in operation_sequence_strategy(1, 10)) {
            prop_assert!(!ops.is_empty());
            prop_assert!(ops.len() < 10);
        }
    }
}
