//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where an OrderId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
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
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
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
    /// Opaque catalog identifier, supplied by the catalog.
    ProductId
);
define_id!(
    /// Order identifier. Random, so it leaks nothing about order volume.
    OrderId
);
define_id!(
    /// Client-generated token for one checkout attempt (idempotency key).
    CheckoutToken
);

impl OrderId {
    /// Generate a new unguessable order id.
    pub fn generate() -> Self {
        Self(random_token("ord"))
    }
}

impl CheckoutToken {
    /// Generate a token for a new checkout attempt.
    pub fn generate() -> Self {
        Self(random_token("chk"))
    }
}

/// `<prefix>_` followed by 16 random bytes, base64url without padding.
fn random_token(prefix: &str) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 16] = rand::thread_rng().gen();
    format!("{}_{}", prefix, URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("hijab-soie-01");
        assert_eq!(id.as_str(), "hijab-soie-01");
        assert_eq!(format!("{}", id), "hijab-soie-01");
    }

    #[test]
    fn test_order_id_shape() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ord_"));
        // 16 bytes -> 22 base64url chars
        assert_eq!(id.as_str().len(), 4 + 22);
    }

    #[test]
    fn test_order_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| OrderId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = OrderId::new("ord_x");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ord_x\"");
    }
}
