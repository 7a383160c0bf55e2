//! Status changes after checkout.

use crate::error::{CommerceError, StateError};
use crate::ids::OrderId;
use crate::order::{
    CancellationPolicy, Order, OrderRepository, OrderStatus, StatusChange, Transition,
};
use tracing::{info, instrument, warn};

/// Customer cancellation and staff status updates.
///
/// Every change is a single conditional write in the store, guarded by the
/// starting states [`Transition::sources`] allows, so two racing requests
/// can never both act on the same starting state.
#[derive(Debug, Clone)]
pub struct OrderStatusService {
    repo: OrderRepository,
    policy: CancellationPolicy,
}

impl OrderStatusService {
    pub fn new(repo: OrderRepository, policy: CancellationPolicy) -> Self {
        Self { repo, policy }
    }

    /// Cancel on the customer's behalf.
    ///
    /// Succeeds only while the order is in the policy's cancellable set;
    /// otherwise [`StateError::NotCancellable`], including for an order that
    /// is already cancelled.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: &OrderId) -> Result<Order, CommerceError> {
        let sources = Transition::Cancel(self.policy).sources();
        let change = self
            .repo
            .change_status(order_id, &sources, OrderStatus::Cancelled)
            .await?;
        match change {
            StatusChange::Applied(order) => {
                info!("order cancelled by customer");
                Ok(order)
            }
            StatusChange::Rejected(order) => {
                warn!(status = %order.status, "cancellation rejected");
                Err(StateError::NotCancellable {
                    order_id: order.id,
                    status: order.status,
                }
                .into())
            }
            StatusChange::Missing => Err(CommerceError::OrderNotFound(order_id.clone())),
        }
    }

    /// Staff override: set any status, unless the order is already
    /// delivered or cancelled.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status))]
    pub async fn set_status(
        &self,
        order_id: &OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let sources = Transition::Override(new_status).sources();
        let change = self
            .repo
            .change_status(order_id, &sources, new_status)
            .await?;
        match change {
            StatusChange::Applied(order) => {
                info!("order status set by staff");
                Ok(order)
            }
            StatusChange::Rejected(order) => Err(StateError::TerminalState {
                order_id: order.id,
                status: order.status,
            }
            .into()),
            StatusChange::Missing => Err(CommerceError::OrderNotFound(order_id.clone())),
        }
    }

    /// Staff: move one step along pending → processing → shipped → delivered.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn advance(&self, order_id: &OrderId) -> Result<Order, CommerceError> {
        let current = self
            .repo
            .get(order_id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.clone()))?;
        let next = current
            .status
            .apply(Transition::Advance)
            .ok_or_else(|| StateError::TerminalState {
                order_id: order_id.clone(),
                status: current.status,
            })?;

        match self
            .repo
            .change_status(order_id, &[current.status], next)
            .await?
        {
            StatusChange::Applied(order) => {
                info!(from = %current.status, to = %next, "order advanced");
                Ok(order)
            }
            StatusChange::Rejected(order) => {
                warn!(expected = %current.status, found = %order.status, "status moved concurrently");
                Err(StateError::InvalidTransition {
                    order_id: order.id,
                    from: order.status,
                    to: next,
                }
                .into())
            }
            StatusChange::Missing => Err(CommerceError::OrderNotFound(order_id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::ids::ProductId;
    use crate::money::Money;
    use crate::order::OrderItems;
    use atelier_db::MemoryDb;
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    async fn setup(policy: CancellationPolicy) -> (OrderStatusService, OrderId) {
        let repo = OrderRepository::new(Arc::new(MemoryDb::new()), Duration::from_secs(1));
        let items = OrderItems::from_cart(&[CartLine::new(
            ProductId::new("p"),
            "Scarf",
            Money::from_major(50),
            "",
            1,
            None,
        )]);
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            created_at: now,
            updated_at: now,
            customer_name: "Amina".into(),
            customer_phone: "0612345678".into(),
            customer_email: None,
            address: "12 rue X".into(),
            city: "Rabat".into(),
            total: items.total(),
            items,
            status: OrderStatus::Pending,
            idempotency_key: None,
        };
        repo.insert(&order).await.unwrap();
        (OrderStatusService::new(repo, policy), order.id)
    }

    async fn stored_status(service: &OrderStatusService, id: &OrderId) -> OrderStatus {
        service.repo.get(id).await.unwrap().unwrap().status
    }

    fn state_err(result: Result<Order, CommerceError>) -> StateError {
        match result {
            Err(CommerceError::State(e)) => e,
            other => panic!("expected state error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancel_pending_then_again() {
        let (service, id) = setup(CancellationPolicy::Strict).await;
        let order = service.cancel_order(&id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.updated_at >= order.created_at);

        let err = state_err(service.cancel_order(&id).await);
        assert!(matches!(
            err,
            StateError::NotCancellable { status: OrderStatus::Cancelled, .. }
        ));
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_processing() {
        let (service, id) = setup(CancellationPolicy::Strict).await;
        service.advance(&id).await.unwrap();
        let err = state_err(service.cancel_order(&id).await);
        assert!(matches!(
            err,
            StateError::NotCancellable { status: OrderStatus::Processing, .. }
        ));
        assert_eq!(stored_status(&service, &id).await, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn test_shipped_and_delivered_are_never_cancellable() {
        for policy in [CancellationPolicy::Strict, CancellationPolicy::Lenient] {
            let (service, id) = setup(policy).await;
            service.set_status(&id, OrderStatus::Shipped).await.unwrap();
            let err = state_err(service.cancel_order(&id).await);
            assert!(matches!(
                err,
                StateError::NotCancellable { status: OrderStatus::Shipped, .. }
            ));
            assert_eq!(stored_status(&service, &id).await, OrderStatus::Shipped);

            service.advance(&id).await.unwrap();
            let err = state_err(service.cancel_order(&id).await);
            assert!(matches!(
                err,
                StateError::NotCancellable { status: OrderStatus::Delivered, .. }
            ));
            assert_eq!(stored_status(&service, &id).await, OrderStatus::Delivered);
        }
    }

    #[tokio::test]
    async fn test_lenient_policy_allows_processing() {
        let (service, id) = setup(CancellationPolicy::Lenient).await;
        service.advance(&id).await.unwrap();
        assert_eq!(
            service.cancel_order(&id).await.unwrap().status,
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_advance_to_delivered_then_closed() {
        let (service, id) = setup(CancellationPolicy::Strict).await;
        for expected in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert_eq!(service.advance(&id).await.unwrap().status, expected);
        }
        assert!(matches!(
            state_err(service.advance(&id).await),
            StateError::TerminalState { .. }
        ));
        assert!(matches!(
            state_err(service.set_status(&id, OrderStatus::Pending).await),
            StateError::TerminalState { status: OrderStatus::Delivered, .. }
        ));
    }

    #[tokio::test]
    async fn test_set_status_is_permissive_until_terminal() {
        let (service, id) = setup(CancellationPolicy::Strict).await;
        service.set_status(&id, OrderStatus::Shipped).await.unwrap();
        let back = service.set_status(&id, OrderStatus::Pending).await.unwrap();
        assert_eq!(back.status, OrderStatus::Pending);
        service.set_status(&id, OrderStatus::Cancelled).await.unwrap();
        assert!(service.set_status(&id, OrderStatus::Processing).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let (service, _) = setup(CancellationPolicy::Strict).await;
        let missing = OrderId::new("ord_missing");
        assert!(matches!(
            service.cancel_order(&missing).await,
            Err(CommerceError::OrderNotFound(_))
        ));
        assert!(matches!(
            service.advance(&missing).await,
            Err(CommerceError::OrderNotFound(_))
        ));
    }
}
