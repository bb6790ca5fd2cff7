//! Branded ID newtypes for type safety.
//!
//! Classrooms and sections are both keyed by opaque strings issued by the
//! backend. Wrapping them keeps a section ID from being passed where a
//! classroom ID is expected.
//!
//! IDs serialize as plain strings. On deserialization, JSON numbers are also
//! accepted and stringified, since some backends use integer keys.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wire representation accepted for any ID.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Signed(n) => n.to_string(),
            Self::Unsigned(n) => n.to_string(),
        }
    }
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is empty or whitespace-only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                IdRepr::deserialize(deserializer).map(|repr| Self(repr.into_string()))
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Identifier of a classroom, the parent container of sections.
    ClassroomId
}

branded_id! {
    /// Identifier of a section, unique within its classroom.
    SectionId
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = SectionId::from("sec-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""sec-1""#);
    }

    #[test]
    fn deserializes_string() {
        let id: ClassroomId = serde_json::from_str(r#""65f0c2""#).unwrap();
        assert_eq!(id.as_str(), "65f0c2");
    }

    #[test]
    fn deserializes_integer_keys() {
        let id: SectionId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
        let id: SectionId = serde_json::from_str("-7").unwrap();
        assert_eq!(id.as_str(), "-7");
    }

    #[test]
    fn rejects_non_scalar() {
        assert!(serde_json::from_str::<SectionId>("{}").is_err());
        assert!(serde_json::from_str::<SectionId>("1.5").is_err());
    }

    #[test]
    fn blank_detection() {
        assert!(ClassroomId::from("").is_blank());
        assert!(ClassroomId::from("  \t").is_blank());
        assert!(!ClassroomId::from("c1").is_blank());
    }

    #[test]
    fn display_and_deref() {
        let id = SectionId::from_string("abc".to_string());
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.len(), 3);
        assert_eq!(String::from(id), "abc");
    }
}
