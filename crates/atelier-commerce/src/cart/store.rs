//! Persisted cart store.

use crate::cart::{Cart, CartLine};
use crate::catalog::ProductSnapshot;
use crate::error::ValidationError;
use crate::ids::ProductId;
use crate::money::Money;
use atelier_cache::{Cache, KvStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default storage key for the cart.
pub const DEFAULT_CART_KEY: &str = "atelier:cart";

/// Version of the persisted envelope.
const CART_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    version: u32,
    lines: Vec<CartLine>,
}

/// Normalize a raw quantity from the UI: anything below 1 becomes 1.
pub fn normalize_quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(1)).unwrap_or(u32::MAX)
}

/// The visitor's cart, mirrored to key-value storage on every mutation.
///
/// Construction rehydrates from storage. Missing, unreadable or corrupt
/// data yields an empty cart; nothing here ever fails for a shopper.
#[derive(Debug)]
pub struct CartStore<S> {
    cache: Cache<S>,
    key: String,
    cart: Cart,
    open: bool,
}

impl<S: KvStore> CartStore<S> {
    /// Open the cart stored under [`DEFAULT_CART_KEY`].
    pub fn open(store: S) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    /// Open the cart stored under `key`.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        let cache = Cache::new(store);
        let key = key.into();
        let cart = load(&cache, &key);
        Self {
            cache,
            key,
            cart,
            open: false,
        }
    }

    /// Add an item, merging into an existing line with the same
    /// `(product_id, variant)`. A zero quantity counts as 1.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Money,
        image: impl Into<String>,
        quantity: u32,
        variant: Option<String>,
    ) {
        debug!(product_id = %product_id, ?variant, quantity, "cart add");
        self.cart
            .add_item(product_id, title, unit_price, image, quantity, variant);
        self.open = true;
        self.persist();
    }

    /// Add a catalog product after checking the variant selection.
    pub fn add_product(
        &mut self,
        product: &ProductSnapshot,
        variant: Option<&str>,
        raw_quantity: i64,
    ) -> Result<(), ValidationError> {
        product.check_variant(variant)?;
        self.add_item(
            product.id.clone(),
            product.title.clone(),
            product.unit_price,
            product.image.clone(),
            normalize_quantity(raw_quantity),
            variant.map(str::to_string),
        );
        Ok(())
    }

    /// Remove a line. Missing lines are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId, variant: Option<&str>) {
        if self.cart.remove_item(product_id, variant) {
            debug!(product_id = %product_id, ?variant, "cart remove");
            self.persist();
        }
    }

    /// Shift a line's quantity by `delta`, never below 1. Missing lines are
    /// ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, variant: Option<&str>, delta: i64) {
        if self.cart.update_quantity(product_id, variant, delta) {
            debug!(product_id = %product_id, ?variant, delta, "cart update");
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        debug!("cart cleared");
        if let Err(e) = self.cache.delete(&self.key) {
            warn!(key = %self.key, error = %e, "failed to clear stored cart; keeping in-memory state");
        }
    }

    /// Re-read persisted state, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.cart = load(&self.cache, &self.key);
    }

    /// Current lines.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Owned copy of the lines for order submission.
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.cart.lines().to_vec()
    }

    /// Σ unit_price × quantity.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Whether the cart panel should be shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the cart panel.
    pub fn open_panel(&mut self) {
        self.open = true;
    }

    /// Hide the cart panel.
    pub fn close_panel(&mut self) {
        self.open = false;
    }

    fn persist(&self) {
        let payload = PersistedCart {
            version: CART_FORMAT_VERSION,
            lines: self.cart.lines().to_vec(),
        };
        if let Err(e) = self.cache.set(&self.key, &payload) {
            warn!(key = %self.key, error = %e, "failed to persist cart; keeping in-memory state");
        }
    }
}

fn load<S: KvStore>(cache: &Cache<S>, key: &str) -> Cart {
    match cache.get::<PersistedCart>(key) {
        Ok(Some(saved)) if saved.version == CART_FORMAT_VERSION => Cart::from_lines(saved.lines),
        Ok(Some(saved)) => {
            warn!(key, version = saved.version, "unsupported cart format; starting empty");
            Cart::new()
        }
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "unreadable cart data; starting empty");
            Cart::new()
        }
    }
}
