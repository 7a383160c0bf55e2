//! Who is asking.
//!
//! Authentication happens elsewhere; the lifecycle only needs to know
//! whether there is a signed-in customer and, if so, their email.

use serde::{Deserialize, Serialize};

/// The current visitor as seen by order lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Not signed in.
    #[default]
    Guest,
    /// Signed-in customer.
    Customer { email: String },
}

impl Identity {
    /// A signed-in customer.
    pub fn customer(email: impl Into<String>) -> Self {
        Identity::Customer {
            email: email.into(),
        }
    }

    /// Normalized email of a signed-in customer. Blank emails count as guest.
    pub fn email(&self) -> Option<String> {
        match self {
            Identity::Customer { email } => {
                let email = normalize_email(email);
                (!email.is_empty()).then_some(email)
            }
            Identity::Guest => None,
        }
    }
}

/// Trim and lowercase an email for storage and comparison.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        assert_eq!(
            Identity::customer("  Amina@Example.MA ").email().as_deref(),
            Some("amina@example.ma")
        );
        assert_eq!(Identity::customer("   ").email(), None);
        assert_eq!(Identity::Guest.email(), None);
    }
}
