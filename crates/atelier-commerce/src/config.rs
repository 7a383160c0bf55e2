//! Lifecycle configuration.

use crate::cart::DEFAULT_CART_KEY;
use crate::order::CancellationPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for the cart and order services. Every field has a default, so
/// an empty `[commerce]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommerceConfig {
    /// Storage key for the persisted cart.
    pub cart_namespace: String,
    /// States from which customers may cancel.
    pub cancellation_policy: CancellationPolicy,
    /// Upper bound on any single durable-store call, in milliseconds.
    pub store_timeout_ms: u64,
    /// Minimum digits in a phone lookup fragment.
    pub min_phone_digits: usize,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            cart_namespace: DEFAULT_CART_KEY.to_string(),
            cancellation_policy: CancellationPolicy::Strict,
            store_timeout_ms: 5000,
            min_phone_digits: 4,
        }
    }
}

impl CommerceConfig {
    /// Store timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CommerceConfig =
            serde_json::from_str(r#"{"cancellation_policy":"lenient"}"#).unwrap();
        assert_eq!(config.cancellation_policy, CancellationPolicy::Lenient);
        assert_eq!(config.cart_namespace, "atelier:cart");
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert_eq!(config.min_phone_digits, 4);
    }
}
