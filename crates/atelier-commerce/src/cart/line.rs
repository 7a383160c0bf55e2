//! Cart line value type.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One purchasable configuration in the cart.
///
/// Title, price and image are copied from the catalog when the line is
/// created and never re-fetched. `(product_id, variant)` is the line's
/// identity; `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product.
    pub product_id: ProductId,
    /// Display title at add time.
    pub title: String,
    /// Unit price at add time.
    pub unit_price: Money,
    /// Primary image URL at add time.
    pub image: String,
    /// Units of this configuration.
    pub quantity: u32,
    /// Selected variant label (e.g. a color); `None` when the product has
    /// no variant axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CartLine {
    /// Create a line, raising a zero quantity to 1.
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Money,
        image: impl Into<String>,
        quantity: u32,
        variant: Option<String>,
    ) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            image: image.into(),
            quantity: quantity.max(1),
            variant,
        }
    }

    /// Whether this line has the identity `(product_id, variant)`.
    pub fn matches(&self, product_id: &ProductId, variant: Option<&str>) -> bool {
        &self.product_id == product_id && self.variant.as_deref() == variant
    }

    /// Whether two lines share an identity.
    pub fn same_key(&self, other: &CartLine) -> bool {
        self.matches(&other.product_id, other.variant.as_deref())
    }

    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }

    /// Apply a signed quantity change, never going below 1.
    pub(crate) fn adjust(&mut self, delta: i64) {
        let next = i64::from(self.quantity).saturating_add(delta);
        self.quantity = u32::try_from(next.max(1)).unwrap_or(u32::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(variant: Option<&str>) -> CartLine {
        CartLine::new(
            ProductId::new("p1"),
            "Scarf",
            Money::from_major(10),
            "/img.jpg",
            1,
            variant.map(str::to_string),
        )
    }

    #[test]
    fn test_identity_includes_variant() {
        let red = line(Some("Red"));
        assert!(red.matches(&ProductId::new("p1"), Some("Red")));
        assert!(!red.matches(&ProductId::new("p1"), Some("Blue")));
        assert!(!red.matches(&ProductId::new("p1"), None));
        assert!(!red.same_key(&line(None)));
    }

    #[test]
    fn test_adjust_clamps() {
        let mut l = line(None);
        l.adjust(4);
        assert_eq!(l.quantity, 5);
        l.adjust(-100);
        assert_eq!(l.quantity, 1);
        l.adjust(i64::MAX);
        assert_eq!(l.quantity, u32::MAX);
    }

    #[test]
    fn test_zero_quantity_becomes_one() {
        let l = CartLine::new(ProductId::new("p"), "t", Money::ZERO, "", 0, None);
        assert_eq!(l.quantity, 1);
    }
}
