//! Delivery and contact details collected at checkout.

use crate::error::ValidationError;
use crate::identity::normalize_email;
use serde::{Deserialize, Serialize};

/// What the shopper types into the checkout form. Payment is cash on
/// delivery, so this is all the order needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub address: String,
    pub city: String,
}

impl CheckoutDetails {
    /// Create details without an email.
    pub fn new(
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            customer_email: None,
            address: address.into(),
            city: city.into(),
        }
    }

    /// Attach an email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Trimmed copy with the email lowercased. A blank email becomes `None`.
    ///
    /// Fails on the first required field that is blank.
    pub fn normalize(&self) -> Result<CheckoutDetails, ValidationError> {
        let required = |value: &str, field: &'static str| {
            let value = value.trim();
            if value.is_empty() {
                Err(ValidationError::MissingField(field))
            } else {
                Ok(value.to_string())
            }
        };
        Ok(CheckoutDetails {
            customer_name: required(&self.customer_name, "customer_name")?,
            customer_phone: required(&self.customer_phone, "customer_phone")?,
            customer_email: self
                .customer_email
                .as_deref()
                .map(normalize_email)
                .filter(|e| !e.is_empty()),
            address: required(&self.address, "address")?,
            city: required(&self.city, "city")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let details = CheckoutDetails::new(" Amina ", " 06 12 34 56 78", "12 rue X ", "Rabat")
            .with_email(" Amina@Example.MA ");
        let clean = details.normalize().unwrap();
        assert_eq!(clean.customer_name, "Amina");
        assert_eq!(clean.customer_phone, "06 12 34 56 78");
        assert_eq!(clean.customer_email.as_deref(), Some("amina@example.ma"));
        assert_eq!(clean.address, "12 rue X");
    }

    #[test]
    fn test_blank_fields_rejected() {
        let details = CheckoutDetails::new("Amina", "   ", "12 rue X", "Rabat");
        assert_eq!(
            details.normalize(),
            Err(ValidationError::MissingField("customer_phone"))
        );
        let details = CheckoutDetails::new("Amina", "0612", "12 rue X", "");
        assert_eq!(details.normalize(), Err(ValidationError::MissingField("city")));
    }

    #[test]
    fn test_blank_email_is_dropped() {
        let details = CheckoutDetails::new("A", "1", "B", "C").with_email("  ");
        assert_eq!(details.normalize().unwrap().customer_email, None);
    }
}
