//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Shortest UUID prefix accepted when looking a record up by prefix
pub const MIN_PREFIX_LEN: usize = 4;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Check whether a user-supplied identifier refers to this ID
            ///
            /// Accepts the full UUID, the short display form, or a UUID prefix
            /// of at least [`MIN_PREFIX_LEN`] characters (with or without the
            /// display prefix).
            pub fn matches(&self, query: &str) -> bool {
                let query = query.trim().to_lowercase();
                let stripped = query.strip_prefix($display_prefix).unwrap_or(&query);
                stripped.len() >= MIN_PREFIX_LEN && self.0.to_string().starts_with(stripped)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(LaborId, "lab-");
define_id!(MaterialId, "mat-");
define_id!(TaskId, "task-");
define_id!(InvoiceId, "inv-");
define_id!(CommentId, "cmt-");
define_id!(ChecklistItemId, "chk-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = LaborId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("lab-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_id_serialization() {
        let id = InvoiceId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: InvoiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_id_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: MaterialId = format!("mat-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_matches_short_forms() {
        let id = TaskId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();

        assert!(id.matches("task-550e8400"));
        assert!(id.matches("550e8400"));
        assert!(id.matches("550E"));
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches("550"));
        assert!(!id.matches("task-660e"));
    }
}
