//! Sample entity types.

use docmap_codec::Value;
use docmap_core::{Entity, EntityState, OdmResult, Schema};
use docmap_schema::{FieldKind, StructuredSchema};

/// A user with a structured schema.
///
/// | field | kind | |
/// |---|---|---|
/// | `name` | text | required |
/// | `age` | integer | optional |
/// | `email` | text | optional |
/// | `tags` | array of text | defaults to `[]` |
#[derive(Debug, Clone)]
pub struct User {
    state: EntityState,
}

impl User {
    /// Returns the schema users are validated against.
    pub fn structured_schema() -> StructuredSchema {
        StructuredSchema::new()
            .required("name", FieldKind::Text)
            .optional("age", FieldKind::Integer)
            .optional("email", FieldKind::Text)
            .with_default("tags", FieldKind::array_of(FieldKind::Text), Vec::<Value>::new())
    }

    /// Returns the user's name.
    pub fn name(&self) -> OdmResult<String> {
        self.get_as("name")
    }

    /// Sets the user's name.
    pub fn set_name(&mut self, name: &str) -> OdmResult<()> {
        self.set("name", name).map(|_| ())
    }

    /// Returns the user's age, if recorded.
    pub fn age(&self) -> Option<i64> {
        self.get("age").and_then(Value::as_integer)
    }
}

impl Entity for User {
    const DATABASE: &'static str = "app";
    const COLLECTION: &'static str = "users";

    fn schema() -> Box<dyn Schema> {
        Box::new(Self::structured_schema())
    }

    fn from_state(state: EntityState) -> Self {
        Self { state }
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}

/// A free-form note; any fields are accepted.
#[derive(Debug, Clone)]
pub struct Note {
    state: EntityState,
}

impl Entity for Note {
    const DATABASE: &'static str = "app";
    const COLLECTION: &'static str = "notes";

    fn from_state(state: EntityState) -> Self {
        Self { state }
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestOdm;
    use docmap_codec::doc;

    #[test]
    fn user_accessors() {
        let odm = TestOdm::new();
        let mut user = odm
            .collection::<User>()
            .create(Some(doc! { "name" => "abs", "age" => 31 }))
            .unwrap();

        assert_eq!(user.name().unwrap(), "abs");
        assert_eq!(user.age(), Some(31));

        user.set_name("neema").unwrap();
        assert_eq!(user.name().unwrap(), "neema");
    }

    #[test]
    fn user_defaults() {
        let odm = TestOdm::new();
        let user = odm.collection::<User>().create(None).unwrap();
        assert_eq!(user.name().unwrap(), "");
        assert_eq!(user.age(), Some(0));
        assert_eq!(user.get("tags"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn note_accepts_anything() {
        let odm = TestOdm::new();
        let note = odm
            .collection::<Note>()
            .create(Some(doc! { "anything" => true }))
            .unwrap();
        assert!(note.fields().contains_key("anything"));
    }
}
