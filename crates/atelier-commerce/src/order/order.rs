//! The placed order.

use crate::ids::{CheckoutToken, OrderId};
use crate::money::Money;
use crate::order::{OrderItems, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A placed order.
///
/// `items` and `total` are frozen at creation. Only `status` (and with it
/// `updated_at`) changes afterwards, and only through the status service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub address: String,
    pub city: String,
    pub items: OrderItems,
    pub total: Money,
    pub status: OrderStatus,
    /// Checkout attempt that created this order, if the client sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<CheckoutToken>,
}

impl Order {
    /// Σ quantity across lines.
    pub fn item_count(&self) -> u64 {
        self.items.item_count()
    }
}

/// Keep only ASCII digits, so `06 12-34.56` and `0612 3456` compare equal.
pub(crate) fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
