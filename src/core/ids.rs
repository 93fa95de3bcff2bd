//! String identifiers for cards, map states and events.
//!
//! Content is authored as JSON with string ids, so every identifier wraps a
//! `String`. They are distinct types so a card id can never be passed where
//! a state id is expected.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
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

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a card definition (`"truth-leak-01"`).
    CardId
);

string_id!(
    /// Canonical identifier of a map state (`"CA"`, `"06"`, ...).
    ///
    /// Always the id the `StateDirectory` resolved to, never a display name.
    StateId
);

string_id!(
    /// Identifier of a catalog event (`"ufo_sighting"`).
    EventId
);
