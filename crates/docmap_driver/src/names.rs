//! Database and collection name rules.

use crate::error::{DriverError, DriverResult};

const DATABASE_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0'];

/// Longest database name the store accepts, in bytes.
pub const MAX_DATABASE_NAME_LEN: usize = 64;

/// Checks that `name` is a legal database name.
pub fn validate_database_name(name: &str) -> DriverResult<()> {
    let invalid = |reason| DriverError::InvalidName {
        kind: "database",
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.len() >= MAX_DATABASE_NAME_LEN {
        return Err(invalid("name is too long"));
    }
    if name.contains(DATABASE_FORBIDDEN) {
        return Err(invalid("name contains a forbidden character"));
    }
    Ok(())
}

/// Checks that `name` is a legal collection name.
pub fn validate_collection_name(name: &str) -> DriverResult<()> {
    let invalid = |reason| DriverError::InvalidName {
        kind: "collection",
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains('$') || name.contains('\0') {
        return Err(invalid("name contains a forbidden character"));
    }
    if name.starts_with("system.") {
        return Err(invalid("system collections are reserved"));
    }
    if name.starts_with('.') || name.ends_with('.') {
        return Err(invalid("name starts or ends with a dot"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_database_name("dbtest").is_ok());
        assert!(validate_collection_name("coltest").is_ok());
        assert!(validate_collection_name("blog.posts").is_ok());
    }

    #[test]
    fn rejects_bad_database_names() {
        for name in ["", "a.b", "a b", "x$y", "with/slash"] {
            assert!(
                matches!(validate_database_name(name), Err(DriverError::InvalidName { kind: "database", .. })),
                "{name:?} should be rejected"
            );
        }
        assert!(validate_database_name(&"d".repeat(MAX_DATABASE_NAME_LEN)).is_err());
    }

    #[test]
    fn rejects_bad_collection_names() {
        for name in ["", "a$b", "system.users", ".hidden", "trailing."] {
            assert!(validate_collection_name(name).is_err(), "{name:?} should be rejected");
        }
    }
}
