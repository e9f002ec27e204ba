//! Property tests for save, lookup and remove.

use docmap_core::{Entity, OdmError};
use docmap_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn validated_save_persists_with_identity(fields in user_fields_strategy()) {
        let odm = TestOdm::new();
        let mut user = odm.collection::<User>().create(Some(fields)).unwrap();
        prop_assert!(!user.is_persisted());

        let id = user.save().unwrap();
        prop_assert!(user.is_persisted());
        prop_assert_eq!(user.id(), Some(id));
    }

    #[test]
    fn by_id_returns_saved_fields(fields in document_strategy()) {
        let odm = TestOdm::new();
        let notes = odm.collection::<Note>();
        let mut note = notes.create(Some(fields.clone())).unwrap();
        let id = note.save().unwrap();

        let found = notes.by_id(&id.to_string()).unwrap().unwrap();
        prop_assert_eq!(found.fields().without_id(), fields);
        prop_assert!(found.is_persisted());
    }

    #[test]
    fn lifecycle_matches_model(ops in operation_sequence_strategy(1, 24)) {
        let odm = TestOdm::new();
        let mut note = odm.collection::<Note>().new_entity();
        let mut stored = false;
        let mut removed = false;

        for op in ops {
            match op {
                EntityOperation::Set { field, value } => {
                    let result = note.set(field, value);
                    if removed {
                        prop_assert!(
                            matches!(result, Err(OdmError::Removed { .. })),
                            "set after remove returned {:?}",
                            result
                        );
                    } else {
                        prop_assert!(result.is_ok());
                    }
                }
                EntityOperation::Save => {
                    let result = note.save();
                    if removed {
                        prop_assert!(
                            matches!(result, Err(OdmError::Removed { .. })),
                            "save after remove returned {:?}",
                            result
                        );
                    } else {
                        prop_assert!(result.is_ok());
                        stored = true;
                    }
                }
                EntityOperation::Remove => {
                    let result = note.remove();
                    if stored {
                        prop_assert!(result.is_ok());
                        stored = false;
                        removed = true;
                    } else {
                        prop_assert_eq!(result, Err(OdmError::NotPersisted));
                    }
                }
            }

            prop_assert_eq!(note.is_persisted(), stored);
            let expected = usize::from(stored);
            prop_assert_eq!(odm.connection.document_count("app", "notes"), expected);
        }
    }
}
