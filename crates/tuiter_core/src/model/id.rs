//! Typed identifiers for stored objects.
//!
//! Each id is a transparent UUID newtype so a `UserId` can never be passed
//! where a `TuitId` is expected. Parsing from caller-supplied text is the
//! only place `InvalidReference` originates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Caller supplied an identifier that is not a well-formed, non-nil UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidReference {
    /// Which kind of object the identifier was meant to reference.
    pub kind: &'static str,
    /// The rejected input, verbatim.
    pub value: String,
}

impl Display for InvalidReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} reference `{}`", self.kind, self.value)
    }
}

impl Error for InvalidReference {}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID without validation.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parses caller-supplied text, rejecting malformed and nil values.
            pub fn parse(value: &str) -> Result<Self, InvalidReference> {
                match Uuid::parse_str(value.trim()) {
                    Ok(uuid) if !uuid.is_nil() => Ok(Self(uuid)),
                    _ => Err(InvalidReference {
                        kind: $kind,
                        value: value.to_string(),
                    }),
                }
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidReference;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value)
            }
        }
    };
}

uuid_id!(
    /// Stable identifier of a user.
    UserId,
    "user"
);
uuid_id!(
    /// Stable identifier of a tuit.
    TuitId,
    "tuit"
);
uuid_id!(
    /// Store-assigned surrogate identifier of a like record.
    LikeId,
    "like"
);

#[cfg(test)]
mod tests {
    use super::{TuitId, UserId};

    #[test]
    fn parse_accepts_hyphenated_uuid_with_whitespace() {
        let id = UserId::parse(" 11111111-2222-4333-8444-555555555555 ").unwrap();
        assert_eq!(id.to_string(), "11111111-2222-4333-8444-555555555555");
    }

    #[test]
    fn parse_rejects_malformed_and_nil_values() {
        let err = TuitId::parse("not-an-id").unwrap_err();
        assert_eq!(err.kind, "tuit");
        assert_eq!(err.value, "not-an-id");

        assert!(UserId::parse("00000000-0000-0000-0000-000000000000").is_err());
        assert!(UserId::parse("").is_err());
    }
}
