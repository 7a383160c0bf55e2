//! Finding orders again: by signed-in account or by phone number.

use crate::error::{CommerceError, ValidationError};
use crate::identity::Identity;
use crate::ids::OrderId;
use crate::order::{phone_digits, Order, OrderRepository};
use serde::Serialize;
use tracing::{debug, instrument};

/// Result of a phone lookup, shaped for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "orders", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Nothing matched.
    Empty,
    /// Exactly one match; go straight to its detail view.
    Single(Box<Order>),
    /// Several matches, newest first.
    Many(Vec<Order>),
}

impl LookupOutcome {
    fn from_orders(mut orders: Vec<Order>) -> Self {
        match orders.len() {
            0 => LookupOutcome::Empty,
            1 => match orders.pop() {
                Some(order) => LookupOutcome::Single(Box::new(order)),
                None => LookupOutcome::Empty,
            },
            _ => LookupOutcome::Many(orders),
        }
    }
}

/// Read side of the order lifecycle.
///
/// Account and phone lookups are separate queries; neither ever widens
/// into the other.
#[derive(Debug, Clone)]
pub struct OrderLookup {
    repo: OrderRepository,
    min_phone_digits: usize,
}

impl OrderLookup {
    pub fn new(repo: OrderRepository, min_phone_digits: usize) -> Self {
        Self {
            repo,
            min_phone_digits,
        }
    }

    /// Orders placed with the signed-in customer's email, newest first.
    /// Guests get nothing.
    #[instrument(skip(self, identity))]
    pub async fn by_account(&self, identity: &Identity) -> Result<Vec<Order>, CommerceError> {
        let Some(email) = identity.email() else {
            return Ok(Vec::new());
        };
        let orders = self.repo.find_by_email(&email).await?;
        debug!(count = orders.len(), "account lookup");
        Ok(orders)
    }

    /// Orders whose phone number contains `fragment`, newest first.
    /// Separators in either number are ignored.
    #[instrument(skip(self))]
    pub async fn by_phone(&self, fragment: &str) -> Result<Vec<Order>, CommerceError> {
        let digits = phone_digits(fragment);
        if digits.len() < self.min_phone_digits {
            return Err(ValidationError::PhoneFragmentTooShort {
                min_digits: self.min_phone_digits,
            }
            .into());
        }
        let orders = self.repo.find_by_phone_digits(&digits).await?;
        debug!(count = orders.len(), "phone lookup");
        Ok(orders)
    }

    /// Phone lookup with the single-match fast path.
    pub async fn resolve_phone_lookup(&self, fragment: &str) -> Result<LookupOutcome, CommerceError> {
        self.by_phone(fragment).await.map(LookupOutcome::from_orders)
    }

    /// Full order for the detail view.
    pub async fn order_detail(&self, order_id: &OrderId) -> Result<Order, CommerceError> {
        self.repo
            .get(order_id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.clone()))
    }
}
