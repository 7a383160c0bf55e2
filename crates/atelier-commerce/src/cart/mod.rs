//! Shopping cart module.
//!
//! [`Cart`] is the pure collection with merge and clamp rules;
//! [`CartStore`] wraps it with per-browser persistence.

mod cart;
mod line;
mod store;

pub use cart::Cart;
pub use line::CartLine;
pub use store::{normalize_quantity, CartStore, DEFAULT_CART_KEY};
