//! Cart-to-order lifecycle for the Atelier storefront.
//!
//! - **Cart**: persistent per-visitor cart with merge-by-variant lines
//! - **Checkout**: delivery details and order submission
//! - **Order**: immutable order records, the fulfillment state machine,
//!   cancellation and staff status updates, and lookup
//! - **Catalog**: the read-only product snapshot the cart is fed from
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_commerce::prelude::*;
//! use atelier_cache::MemoryKv;
//! use atelier_db::MemoryDb;
//!
//! let mut cart = CartStore::open(MemoryKv::new());
//! cart.add_product(&hijab, Some("Noir"), 2)?;
//!
//! let services = OrderServices::new(Arc::new(MemoryDb::new()), &CommerceConfig::default());
//! let details = CheckoutDetails::new("Amina", "0612345678", "12 rue X", "Rabat");
//! let order_id = services.submission.submit(&mut cart, &details, None).await?;
//!
//! services.status.cancel_order(&order_id).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod identity;
pub mod order;
pub mod services;

pub use config::CommerceConfig;
pub use error::{CommerceError, ErrorKind, PersistenceError, StateError, ValidationError};
pub use ids::*;
pub use money::{Money, ParseMoneyError};
pub use services::OrderServices;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::CommerceConfig;
    pub use crate::error::{CommerceError, ErrorKind, PersistenceError, StateError, ValidationError};
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::services::OrderServices;

    // Cart
    pub use crate::cart::{Cart, CartLine, CartStore};

    // Catalog
    pub use crate::catalog::{Catalog, MemoryCatalog, ProductSnapshot};

    // Checkout
    pub use crate::checkout::{CheckoutDetails, OrderSubmission};

    // Orders
    pub use crate::identity::Identity;
    pub use crate::order::{
        CancellationPolicy, LookupOutcome, Order, OrderItems, OrderLine, OrderLookup,
        OrderStatus, OrderStatusService,
    };
}
