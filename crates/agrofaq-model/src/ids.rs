//! Opaque entity identifiers
//!
//! Every entity is referenced by a ULID newtype. Cross-entity references are
//! always ids, never embedded object graphs, so arenas can join on demand
//! without ownership cycles.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub Ulid);

        impl $name {
            /// Generate a fresh id
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique question identifier (ULID for sortability)
    QuestionId
);
entity_id!(
    /// Unique answer identifier
    AnswerId
);
entity_id!(
    /// Unique user identifier
    UserId
);
entity_id!(
    /// Unique peer/moderator validation record identifier
    ValidationId
);
entity_id!(
    /// Unique golden FAQ identifier
    FaqId
);
entity_id!(
    /// Unique notification identifier
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generation_is_unique() {
        let a = QuestionId::new();
        let b = QuestionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn id_display_round_trips_through_ulid() {
        let id = UserId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 26);
        assert_eq!(UserId(text.parse().unwrap()), id);
    }
}
