//! Newtype wrappers for the two identities a restriction can be keyed by.
//!
//! Using distinct types prevents accidentally looking a session key up in
//! the network table. Both are opaque strings supplied by the request layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype identity wrapper around `String`.
macro_rules! define_identity {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }
    };
}

define_identity!(
    /// Network identity of a visitor, normally the client IP address.
    NetworkId
);

define_identity!(
    /// Browser session identity, carried in the session cookie.
    SessionKey
);

impl SessionKey {
    /// Prefix safe to write into logs.
    pub fn redacted(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

/// Which restriction table blocked a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionScope {
    /// Keyed by network identity.
    Network,
    /// Keyed by browser session.
    Session,
}

impl RestrictionScope {
    /// How the scope is named to the visitor.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Network => "this location",
            Self::Session => "this browser",
        }
    }
}

impl fmt::Display for RestrictionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Session => write!(f, "session"),
        }
    }
}
