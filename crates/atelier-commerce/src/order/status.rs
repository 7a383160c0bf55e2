//! Order fulfillment state machine.
//!
//! ```text
//! Pending ──► Processing ──► Shipped ──► Delivered
//!    │             │
//!    └─────────────┴──► Cancelled
//! ```
//!
//! `Delivered` and `Cancelled` are terminal. [`OrderStatus::apply`] is the
//! only transition table: every guarded write derives its allowed starting
//! states from it through [`Transition::sources`]. Storage and presentation
//! only ever see the machine code or the label derived from the enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order confirmed and being prepared.
    Processing,
    /// Order handed to the carrier.
    Shipped,
    /// Order delivered and paid on delivery.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Every state, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Machine code used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Storefront label. Presentation only, never parsed back.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "En attente",
            OrderStatus::Processing => "En cours",
            OrderStatus::Shipped => "Expédiée",
            OrderStatus::Delivered => "Livrée",
            OrderStatus::Cancelled => "Annulée",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The next step of the forward fulfillment path.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// The state `transition` leads to from here, or `None` if it is not
    /// allowed. Terminal states accept nothing.
    pub fn apply(&self, transition: Transition) -> Option<OrderStatus> {
        if self.is_terminal() {
            return None;
        }
        match transition {
            Transition::Advance => self.next(),
            Transition::Cancel(policy) => match (self, policy) {
                (OrderStatus::Pending, _)
                | (OrderStatus::Processing, CancellationPolicy::Lenient) => {
                    Some(OrderStatus::Cancelled)
                }
                _ => None,
            },
            Transition::Override(to) => Some(to),
        }
    }
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Customer cancellation under a policy.
    Cancel(CancellationPolicy),
    /// Staff step along pending, processing, shipped, delivered.
    Advance,
    /// Staff sets an explicit status.
    Override(OrderStatus),
}

impl Transition {
    /// Every state this transition may start from, for the guarded write.
    pub fn sources(&self) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|status| status.apply(*self).is_some())
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// Which states a customer may cancel from.
///
/// The storefront has shown both rules in different places; `Strict` is
/// the guaranteed minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Only `Pending` orders.
    #[default]
    Strict,
    /// `Pending` and `Processing` orders.
    Lenient,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_path() {
        let mut status = OrderStatus::Pending;
        let mut path = vec![status];
        while let Some(next) = status.apply(Transition::Advance) {
            status = next;
            path.push(status);
        }
        assert_eq!(
            path,
            [
                OrderStatus::Pending,
                OrderStatus::Processing,
                OrderStatus::Shipped,
                OrderStatus::Delivered
            ]
        );
    }

    #[test]
    fn test_terminal_states_have_no_moves() {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            assert!(from.next().is_none());
            for to in OrderStatus::ALL {
                assert_eq!(from.apply(Transition::Override(to)), None);
            }
            assert_eq!(from.apply(Transition::Cancel(CancellationPolicy::Lenient)), None);
        }
    }

    #[test]
    fn test_cancel_sources_follow_policy() {
        assert_eq!(
            Transition::Cancel(CancellationPolicy::Strict).sources(),
            [OrderStatus::Pending]
        );
        assert_eq!(
            Transition::Cancel(CancellationPolicy::Lenient).sources(),
            [OrderStatus::Pending, OrderStatus::Processing]
        );
        for policy in [CancellationPolicy::Strict, CancellationPolicy::Lenient] {
            for status in [OrderStatus::Shipped, OrderStatus::Delivered] {
                assert_eq!(status.apply(Transition::Cancel(policy)), None);
            }
        }
    }

    #[test]
    fn test_override_sources_are_open_states() {
        assert_eq!(
            Transition::Override(OrderStatus::Pending).sources(),
            [
                OrderStatus::Pending,
                OrderStatus::Processing,
                OrderStatus::Shipped
            ]
        );
        assert_eq!(
            OrderStatus::Shipped.apply(Transition::Override(OrderStatus::Processing)),
            Some(OrderStatus::Processing)
        );
    }

    #[test]
    fn test_advance_never_skips() {
        assert_eq!(
            OrderStatus::Pending.apply(Transition::Advance),
            Some(OrderStatus::Processing)
        );
        assert_eq!(
            OrderStatus::Shipped.apply(Transition::Advance),
            Some(OrderStatus::Delivered)
        );
        assert_eq!(Transition::Advance.sources().len(), 3);
    }

    #[test]
    fn test_parse_codes_not_labels() {
        assert_eq!("delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert!("Livrée".parse::<OrderStatus>().is_err());
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Processing).unwrap(),
            "\"processing\""
        );
    }
}
