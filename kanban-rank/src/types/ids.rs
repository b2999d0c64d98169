//! Identifier newtypes
//!
//! Ids are opaque strings. Fresh ids are ULIDs so they sort by creation time.
//! Ids end up in file names, so stores only accept ids made of
//! `[A-Za-z0-9_-]`.

use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether `value` is non-empty and uses only `[A-Za-z0-9_-]`
pub fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh ULID-based id
            pub fn new() -> Self {
                Self(ulid::Ulid::new().to_string())
            }

            /// Wrap an existing id string
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Reject ids that cannot be used as a file name, reporting `field`
            pub fn validate(&self, field: &str) -> Result<()> {
                if is_valid_id(&self.0) {
                    Ok(())
                } else {
                    Err(BoardError::invalid_value(
                        field,
                        format!(
                            "{:?} must be non-empty and use only A-Z, a-z, 0-9, '_' or '-'",
                            self.0
                        ),
                    ))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Tenant that owns a set of projects, columns and tasks
    OwnerId
);
define_id!(
    /// A project; each project has its own board of columns
    ProjectId
);
define_id!(
    /// A column on a project board
    ColumnId
);
define_id!(
    /// A task card
    TaskId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique_ulids() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 26);
    }

    #[test]
    fn test_from_string_roundtrips_display() {
        let id = ColumnId::from_string("todo");
        assert_eq!(id.to_string(), "todo");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"todo\"");
    }

    #[test]
    fn test_validate_accepts_slugs_and_ulids() {
        assert!(ColumnId::from_string("in-progress_2").validate("id").is_ok());
        assert!(TaskId::new().validate("id").is_ok());
    }

    #[test]
    fn test_validate_rejects_path_like_ids() {
        for bad in ["", "..", "../../escaped", "a/b", "a\\b", "todo.json", "with space"] {
            let result = ColumnId::from_string(bad).validate("id");
            assert!(
                matches!(result, Err(BoardError::InvalidValue { ref field, .. }) if field == "id"),
                "accepted {bad:?}"
            );
        }
    }
}
