//! Catalog boundary.
//!
//! The catalog itself (products, categories, admin forms) lives elsewhere.
//! The cart only needs a point-in-time description of a product when it is
//! added, which is what [`ProductSnapshot`] carries.

mod snapshot;

pub use snapshot::{Catalog, MemoryCatalog, ProductSnapshot};
