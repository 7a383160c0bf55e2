//! Key-value store abstraction with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Raw byte-oriented key-value storage.
///
/// Implementations are synchronous: browser-style storage is written inline
/// with every mutation.
pub trait KvStore: Send + Sync {
    /// Read the bytes stored under `key`.
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_bytes(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).get_bytes(key)
    }

    fn set_bytes(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).set_bytes(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        (**self).delete(key)
    }
}

/// In-process store.
///
/// Clones share the same underlying map, which is how two "tabs" of the
/// same browser profile are modelled in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryKv {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::StoreError("memory store lock poisoned".to_string()))
    }
}

impl KvStore for MemoryKv {
    fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_bytes(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Type-safe cache over any [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KvStore> Cache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and
    /// [`CacheError::SerializeError`] if it exists but does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get_bytes(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set_bytes(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Basket {
        items: Vec<String>,
    }

    #[test]
    fn test_roundtrip_typed_value() {
        let cache = Cache::new(MemoryKv::new());
        let basket = Basket {
            items: vec!["scarf".to_string()],
        };
        cache.set("basket", &basket).unwrap();
        assert_eq!(cache.get::<Basket>("basket").unwrap(), Some(basket));
    }

    #[test]
    fn test_missing_key_is_none() {
        let cache = Cache::new(MemoryKv::new());
        assert!(cache.get::<Basket>("nope").unwrap().is_none());
        cache.delete("nope").unwrap();
    }

    #[test]
    fn test_corrupt_payload_is_reported() {
        let kv = MemoryKv::new();
        kv.set_bytes("basket", b"{not json").unwrap();
        let err = Cache::new(kv).get::<Basket>("basket").unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_clones_share_entries() {
        let first = MemoryKv::new();
        let second = first.clone();
        first.set_bytes("k", b"1").unwrap();
        assert_eq!(second.get_bytes("k").unwrap(), Some(b"1".to_vec()));
        second.delete("k").unwrap();
        assert_eq!(first.get_bytes("k").unwrap(), None);
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(crate::cache_key!("atelier", "cart", 2), "atelier:cart:2");
    }
}
