//! Typed key-value persistence for the Atelier storefront.
//!
//! Models the per-browser storage a visitor's cart lives in: a flat
//! namespace of string keys holding JSON documents. Two backends are
//! provided, an in-process [`MemoryKv`] and a directory-backed [`FileKv`]
//! that survives restarts.
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_cache::{Cache, MemoryKv};
//!
//! let cache = Cache::new(MemoryKv::new());
//! cache.set("atelier:cart", &lines)?;
//! let lines: Option<Vec<Line>> = cache.get("atelier:cart")?;
//! ```

mod error;
mod file;
mod kv;

pub use error::CacheError;
pub use file::FileKv;
pub use kv::{Cache, KvStore, MemoryKv};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, Cache, CacheError, FileKv, KvStore, MemoryKv};
}

/// Build a namespaced cache key.
///
/// # Example
///
/// ```
/// let key = atelier_cache::cache_key!("atelier", "cart");
/// assert_eq!(key, "atelier:cart");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
