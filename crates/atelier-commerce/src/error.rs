//! Commerce error types.
//!
//! Three families matter to callers: bad input ([`ValidationError`]), an
//! illegal lifecycle move ([`StateError`]) and storage trouble
//! ([`PersistenceError`]). Only the last one is worth retrying.

use crate::ids::{CheckoutToken, OrderId, ProductId};
use crate::money::Money;
use crate::order::OrderStatus;
use std::time::Duration;
use thiserror::Error;

/// Input the caller should fix and resubmit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Order submitted with no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A required delivery or contact field was blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The submitted total does not match the snapshot lines.
    #[error("total mismatch: cart lines add up to {expected}, submitted {submitted}")]
    TotalMismatch { expected: Money, submitted: Money },

    /// The selected variant is not offered for the product.
    #[error("variant {variant:?} is not available for product {product_id}")]
    UnknownVariant {
        product_id: ProductId,
        variant: String,
    },

    /// The product has variant axes but none was selected.
    #[error("a variant must be selected for product {0}")]
    VariantRequired(ProductId),

    /// Phone lookup fragment is too short to search by.
    #[error("phone search needs at least {min_digits} digits")]
    PhoneFragmentTooShort { min_digits: usize },
}

/// A transition that the order's current state does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Customer cancellation outside the cancellable set.
    #[error("order {order_id} can no longer be cancelled (status: {status})")]
    NotCancellable {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// The order is delivered or cancelled; nothing may change it.
    #[error("order {order_id} is {status} and can no longer change")]
    TerminalState {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// The status moved underneath a staff operation, or there is no next step.
    #[error("order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

/// The durable store could not complete a read or write.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Backend failure.
    #[error("store error: {0}")]
    Store(#[from] atelier_db::DbError),

    /// The store did not answer in time.
    #[error("store timed out after {0:?}")]
    Timeout(Duration),

    /// A stored record could not be decoded.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Another submission holds the checkout token but its order is not
    /// stored yet.
    #[error("checkout {0} is still in progress")]
    CheckoutInProgress(CheckoutToken),
}

/// Errors that can occur in order operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Invalid input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Illegal state transition.
    #[error(transparent)]
    State(#[from] StateError),

    /// Storage failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// No order with that id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),
}

/// Coarse classification for callers that translate errors into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    State,
    Persistence,
    NotFound,
}

impl CommerceError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::Validation(_) => ErrorKind::Validation,
            CommerceError::State(_) => ErrorKind::State,
            CommerceError::Persistence(_) => ErrorKind::Persistence,
            CommerceError::OrderNotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Whether re-running the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Persistence
    }

    /// Message suitable for showing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            CommerceError::Validation(e) => format!("Please check your details: {}.", e),
            CommerceError::State(StateError::NotCancellable { .. }) => {
                "This order can no longer be cancelled.".to_string()
            }
            CommerceError::State(_) => "This order can no longer be changed.".to_string(),
            CommerceError::Persistence(_) => {
                "Something went wrong on our side, please try again.".to_string()
            }
            CommerceError::OrderNotFound(_) => "We could not find that order.".to_string(),
        }
    }
}

impl From<atelier_db::DbError> for CommerceError {
    fn from(e: atelier_db::DbError) -> Self {
        CommerceError::Persistence(PersistenceError::Store(e))
    }
}
