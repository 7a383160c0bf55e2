//! Turning a cart snapshot into a stored order.

use crate::cart::{CartLine, CartStore};
use crate::checkout::CheckoutDetails;
use crate::error::{CommerceError, PersistenceError, ValidationError};
use crate::ids::{CheckoutToken, OrderId};
use crate::money::Money;
use crate::order::{Order, OrderItems, OrderRepository, OrderStatus};
use atelier_cache::KvStore;
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Creates orders. Never touches the cart unless asked to via
/// [`OrderSubmission::submit`].
#[derive(Debug, Clone)]
pub struct OrderSubmission {
    repo: OrderRepository,
}

impl OrderSubmission {
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }

    /// Validate and persist a new `Pending` order.
    ///
    /// `total` is what the shopper was shown; it must match the lines.
    /// With a `token`, a repeated call returns the first order's id instead
    /// of creating another one. The id is only returned once that order is
    /// stored; while the first submission is still writing, or has failed
    /// but not yet released the token, the call fails with the retryable
    /// [`PersistenceError::CheckoutInProgress`].
    #[instrument(skip_all, fields(lines = lines.len(), total = %total))]
    pub async fn place_order(
        &self,
        details: &CheckoutDetails,
        lines: &[CartLine],
        total: Money,
        token: Option<&CheckoutToken>,
    ) -> Result<OrderId, CommerceError> {
        let details = details.normalize()?;
        if lines.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let items = OrderItems::from_cart(lines);
        let expected = items.total();
        if expected != total {
            return Err(ValidationError::TotalMismatch {
                expected,
                submitted: total,
            }
            .into());
        }

        let id = OrderId::generate();
        if let Some(token) = token {
            if let Some(existing) = self.repo.claim_token(token, &id).await? {
                if self.repo.get(&existing).await?.is_none() {
                    warn!(order_id = %existing, "checkout token claimed but order not stored yet");
                    return Err(PersistenceError::CheckoutInProgress(token.clone()).into());
                }
                info!(order_id = %existing, "checkout token already used; returning existing order");
                return Ok(existing);
            }
        }

        let now = Utc::now();
        let order = Order {
            id: id.clone(),
            created_at: now,
            updated_at: now,
            customer_name: details.customer_name,
            customer_phone: details.customer_phone,
            customer_email: details.customer_email,
            address: details.address,
            city: details.city,
            items,
            total: expected,
            status: OrderStatus::Pending,
            idempotency_key: token.cloned(),
        };

        if let Err(e) = self.repo.insert(&order).await {
            if let Some(token) = token {
                if let Err(release) = self.repo.release_token(token).await {
                    warn!(error = %release, "could not release checkout token");
                }
            }
            return Err(e.into());
        }

        info!(order_id = %id, "order placed");
        Ok(id)
    }

    /// Place an order from the cart and clear it on success. On failure the
    /// cart is left as it was.
    pub async fn submit<S: KvStore>(
        &self,
        cart: &mut CartStore<S>,
        details: &CheckoutDetails,
        token: Option<&CheckoutToken>,
    ) -> Result<OrderId, CommerceError> {
        let lines = cart.snapshot();
        let id = self
            .place_order(details, &lines, cart.total(), token)
            .await?;
        cart.clear_cart();
        Ok(id)
    }
}
