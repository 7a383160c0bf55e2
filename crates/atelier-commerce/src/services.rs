//! Wiring the order services onto one store.

use crate::checkout::OrderSubmission;
use crate::config::CommerceConfig;
use crate::order::{OrderLookup, OrderRepository, OrderStatusService};
use atelier_db::DocumentStore;
use std::sync::Arc;

/// Submission, status and lookup services sharing one repository.
#[derive(Debug, Clone)]
pub struct OrderServices {
    pub submission: OrderSubmission,
    pub status: OrderStatusService,
    pub lookup: OrderLookup,
}

impl OrderServices {
    /// Build all services from configuration.
    pub fn new(store: Arc<dyn DocumentStore>, config: &CommerceConfig) -> Self {
        let repo = OrderRepository::new(store, config.store_timeout());
        Self {
            submission: OrderSubmission::new(repo.clone()),
            status: OrderStatusService::new(repo.clone(), config.cancellation_policy),
            lookup: OrderLookup::new(repo, config.min_phone_digits),
        }
    }
}
