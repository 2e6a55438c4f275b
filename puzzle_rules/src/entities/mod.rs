//! Entity definitions for the puzzle world.

mod paradigm;
mod question;

pub use paradigm::*;
pub use question::*;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a descriptor, e.g. `Fs-31`.
    DescriptorId
);

string_id!(
    /// Identifier of a paradigm, e.g. `P1`.
    ParadigmId
);

string_id!(
    /// Identifier of a question, e.g. `Q12`.
    QuestionId
);

/// An atomic hidden fact of the story world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub id: DescriptorId,
    /// Human-readable label.
    pub label: String,
}

impl Descriptor {
    pub fn new(id: impl Into<DescriptorId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_id_display() {
        let id = DescriptorId::new("Fs-31");
        assert_eq!(id.to_string(), "Fs-31");
        assert_eq!(id.as_str(), "Fs-31");
    }

    #[test]
    fn test_id_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(DescriptorId::from("Ps-1"), 1.0);

        assert_eq!(map.get("Ps-1"), Some(&1.0));
        assert!(map.get("Ps-2").is_none());
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![ParadigmId::from("P3"), ParadigmId::from("P1"), ParadigmId::from("P2")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "P1");
        assert_eq!(ids[2].as_str(), "P3");
    }

    #[test]
    fn test_descriptor_creation() {
        let descriptor = Descriptor::new("Fs-1", "The man ordered soup");
        assert_eq!(descriptor.id, DescriptorId::from("Fs-1"));
        assert_eq!(descriptor.label, "The man ordered soup");
    }
}
