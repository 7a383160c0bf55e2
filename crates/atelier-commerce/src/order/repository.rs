//! Order persistence on top of the document store.
//!
//! Orders live in the `orders` collection. Items are stored as an encoded
//! blob, status as its machine code, and a digits-only copy of the phone
//! number is kept for lookup. Checkout tokens are claimed in
//! `checkout_attempts`.

use crate::error::PersistenceError;
use crate::ids::{CheckoutToken, OrderId};
use crate::money::Money;
use crate::order::{phone_digits, Order, OrderItems, OrderStatus};
use atelier_db::{
    from_document, to_document, Condition, ConditionalUpdate, DbError, Document, DocumentStore,
    Filter,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

const ORDERS: &str = "orders";
const CHECKOUT_ATTEMPTS: &str = "checkout_attempts";

/// Outcome of a guarded status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// The guard held; carries the updated order.
    Applied(Order),
    /// The guard failed; carries the order as it is now.
    Rejected(Order),
    /// No such order.
    Missing,
}

#[derive(Serialize, Deserialize)]
struct StoredOrder {
    id: OrderId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    customer_name: String,
    customer_phone: String,
    phone_digits: String,
    #[serde(default)]
    customer_email: Option<String>,
    address: String,
    city: String,
    items: String,
    total: Money,
    status: OrderStatus,
    #[serde(default)]
    idempotency_key: Option<CheckoutToken>,
}

impl StoredOrder {
    fn encode(order: &Order) -> Result<Document, PersistenceError> {
        let items = order.items.encode().map_err(|e| PersistenceError::Corrupt {
            id: order.id.to_string(),
            reason: e.to_string(),
        })?;
        let stored = StoredOrder {
            id: order.id.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            phone_digits: phone_digits(&order.customer_phone),
            customer_email: order.customer_email.clone(),
            address: order.address.clone(),
            city: order.city.clone(),
            items,
            total: order.total,
            status: order.status,
            idempotency_key: order.idempotency_key.clone(),
        };
        Ok(to_document(&stored)?)
    }

    fn decode(doc: Document) -> Result<Order, PersistenceError> {
        let id = doc
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string();
        let corrupt = |reason: String| PersistenceError::Corrupt {
            id: id.clone(),
            reason,
        };
        let stored: StoredOrder = from_document(doc).map_err(|e| corrupt(e.to_string()))?;
        let items = OrderItems::decode(&stored.items).map_err(|e| corrupt(e.to_string()))?;
        Ok(Order {
            id: stored.id,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            customer_name: stored.customer_name,
            customer_phone: stored.customer_phone,
            customer_email: stored.customer_email,
            address: stored.address,
            city: stored.city,
            items,
            total: stored.total,
            status: stored.status,
            idempotency_key: stored.idempotency_key,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct CheckoutAttempt {
    order_id: OrderId,
    claimed_at: DateTime<Utc>,
}

/// Typed access to stored orders. Every store call is bounded by a timeout.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn DocumentStore>,
    timeout: Duration,
}

impl std::fmt::Debug for OrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRepository")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OrderRepository {
    /// Create a repository over `store`.
    pub fn new(store: Arc<dyn DocumentStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Persist a new order.
    pub async fn insert(&self, order: &Order) -> Result<(), PersistenceError> {
        let doc = StoredOrder::encode(order)?;
        self.bounded("insert order", self.store.insert(ORDERS, order.id.as_str(), doc))
            .await
    }

    /// Fetch one order.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, PersistenceError> {
        self.bounded("get order", self.store.get(ORDERS, id.as_str()))
            .await?
            .map(StoredOrder::decode)
            .transpose()
    }

    /// Claim a checkout token for `order_id`.
    ///
    /// Returns `None` when the claim is new, or the id recorded by an
    /// earlier claim of the same token.
    pub async fn claim_token(
        &self,
        token: &CheckoutToken,
        order_id: &OrderId,
    ) -> Result<Option<OrderId>, PersistenceError> {
        let attempt = to_document(&CheckoutAttempt {
            order_id: order_id.clone(),
            claimed_at: Utc::now(),
        })?;
        let claim = self
            .bounded(
                "claim checkout token",
                self.store.insert(CHECKOUT_ATTEMPTS, token.as_str(), attempt),
            )
            .await;
        match claim {
            Ok(()) => Ok(None),
            Err(PersistenceError::Store(e)) if e.is_conflict() => {
                let existing = self
                    .bounded(
                        "read checkout token",
                        self.store.get(CHECKOUT_ATTEMPTS, token.as_str()),
                    )
                    .await?;
                match existing {
                    Some(doc) => {
                        let attempt: CheckoutAttempt = from_document(doc)?;
                        Ok(Some(attempt.order_id))
                    }
                    // released between our insert and read; the caller may retry
                    None => Err(PersistenceError::Store(e)),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Drop a token claim so the attempt can be retried.
    pub async fn release_token(&self, token: &CheckoutToken) -> Result<(), PersistenceError> {
        self.bounded(
            "release checkout token",
            self.store.delete(CHECKOUT_ATTEMPTS, token.as_str()),
        )
        .await
        .map(|_| ())
    }

    /// Set `to` only while the stored status is one of `from`. The check and
    /// the write are one atomic store operation.
    pub async fn change_status(
        &self,
        id: &OrderId,
        from: &[OrderStatus],
        to: OrderStatus,
    ) -> Result<StatusChange, PersistenceError> {
        let condition = Condition::field_in("status", from.iter().map(|s| s.as_str()));
        let mut changes = Document::new();
        changes.insert("status".into(), Value::from(to.as_str()));
        changes.insert(
            "updated_at".into(),
            serde_json::to_value(Utc::now()).map_err(DbError::from)?,
        );

        let outcome = self
            .bounded(
                "update order status",
                self.store.update_if(ORDERS, id.as_str(), &condition, changes),
            )
            .await?;
        Ok(match outcome {
            ConditionalUpdate::Applied(doc) => StatusChange::Applied(StoredOrder::decode(doc)?),
            ConditionalUpdate::Rejected(doc) => StatusChange::Rejected(StoredOrder::decode(doc)?),
            ConditionalUpdate::Missing => StatusChange::Missing,
        })
    }

    /// Orders placed with this (already normalized) email, newest first.
    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Order>, PersistenceError> {
        self.find(Filter::field_eq("customer_email", email)).await
    }

    /// Orders whose phone digits contain `digits`, newest first.
    pub async fn find_by_phone_digits(&self, digits: &str) -> Result<Vec<Order>, PersistenceError> {
        self.find(Filter::field_contains("phone_digits", digits))
            .await
    }

    async fn find(&self, filter: Filter) -> Result<Vec<Order>, PersistenceError> {
        let docs = self
            .bounded("find orders", self.store.find(ORDERS, &filter))
            .await?;
        let mut orders = docs
            .into_iter()
            .map(StoredOrder::decode)
            .collect::<Result<Vec<_>, _>>()?;
        // stable sort keeps insertion order for equal timestamps, so reverse first
        orders.reverse();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Run a store call under the timeout. A timeout only stops the wait:
    /// the store may still commit the call, so the outcome is unknown and
    /// the caller should read back before assuming it failed.
    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, PersistenceError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.is_conflict() => Err(e.into()),
            Ok(Err(e)) => {
                error!(op, error = %e, "order store failure");
                Err(e.into())
            }
            Err(_) => {
                error!(op, timeout = ?self.timeout, "order store timed out");
                Err(PersistenceError::Timeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::ids::ProductId;
    use atelier_db::MemoryDb;

    fn order(id: &str, phone: &str, email: Option<&str>, minutes: i64) -> Order {
        let created_at = DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::minutes(minutes);
        let items = OrderItems::from_cart(&[CartLine::new(
            ProductId::new("p"),
            "Scarf",
            Money::from_major(50),
            "",
            2,
            None,
        )]);
        Order {
            id: OrderId::new(id),
            created_at,
            updated_at: created_at,
            customer_name: "Amina".into(),
            customer_phone: phone.into(),
            customer_email: email.map(str::to_string),
            address: "12 rue X".into(),
            city: "Rabat".into(),
            total: items.total(),
            items,
            status: OrderStatus::Pending,
            idempotency_key: None,
        }
    }

    fn repo() -> (Arc<MemoryDb>, OrderRepository) {
        let db = Arc::new(MemoryDb::new());
        let repo = OrderRepository::new(db.clone(), Duration::from_secs(1));
        (db, repo)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let (db, repo) = repo();
        let o = order("ord_a", "06 12 34 56 78", Some("a@x.ma"), 1);
        repo.insert(&o).await.unwrap();
        assert_eq!(repo.get(&o.id).await.unwrap(), Some(o));

        let raw = db.get(ORDERS, "ord_a").await.unwrap().unwrap();
        assert_eq!(raw["status"], "pending");
        assert_eq!(raw["phone_digits"], "0612345678");
        assert!(raw["items"].is_string());
    }

    #[tokio::test]
    async fn test_lookups_newest_first() {
        let (_, repo) = repo();
        repo.insert(&order("ord_1", "0612345678", Some("a@x.ma"), 1)).await.unwrap();
        repo.insert(&order("ord_2", "0699999999", Some("b@x.ma"), 2)).await.unwrap();
        repo.insert(&order("ord_3", "06-12-34-00-00", Some("a@x.ma"), 3)).await.unwrap();

        let mine: Vec<_> = repo.find_by_email("a@x.ma").await.unwrap();
        let ids: Vec<_> = mine.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["ord_3", "ord_1"]);

        let by_phone = repo.find_by_phone_digits("061234").await.unwrap();
        assert_eq!(by_phone.len(), 2);
        assert_eq!(by_phone[0].id.as_str(), "ord_3");
    }

    #[tokio::test]
    async fn test_change_status_guard() {
        let (_, repo) = repo();
        let o = order("ord_a", "0612345678", None, 1);
        repo.insert(&o).await.unwrap();

        let applied = repo
            .change_status(&o.id, &[OrderStatus::Pending], OrderStatus::Processing)
            .await
            .unwrap();
        assert!(matches!(applied, StatusChange::Applied(ref o) if o.status == OrderStatus::Processing));

        let rejected = repo
            .change_status(&o.id, &[OrderStatus::Pending], OrderStatus::Cancelled)
            .await
            .unwrap();
        assert!(matches!(rejected, StatusChange::Rejected(ref o) if o.status == OrderStatus::Processing));

        let missing = repo
            .change_status(&OrderId::new("ord_x"), &[OrderStatus::Pending], OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(missing, StatusChange::Missing);
    }

    #[tokio::test]
    async fn test_token_claim_and_release() {
        let (_, repo) = repo();
        let token = CheckoutToken::new("chk_1");
        assert_eq!(repo.claim_token(&token, &OrderId::new("ord_a")).await.unwrap(), None);
        assert_eq!(
            repo.claim_token(&token, &OrderId::new("ord_b")).await.unwrap(),
            Some(OrderId::new("ord_a"))
        );
        repo.release_token(&token).await.unwrap();
        assert_eq!(repo.claim_token(&token, &OrderId::new("ord_c")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_items_surface_as_persistence_error() {
        let (db, repo) = repo();
        let mut doc = StoredOrder::encode(&order("ord_a", "0612345678", None, 1)).unwrap();
        doc.insert("items".into(), Value::from("not json"));
        db.insert(ORDERS, "ord_a", doc).await.unwrap();
        assert!(matches!(
            repo.get(&OrderId::new("ord_a")).await,
            Err(PersistenceError::Corrupt { .. })
        ));
    }
}
