//! The in-memory cart collection.

use crate::cart::CartLine;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Ordered cart lines for one visitor.
///
/// Insertion order is display order. Totals are derived on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from arbitrary lines, merging duplicate identities and
    /// raising zero quantities to 1. The first occurrence keeps its place.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            let quantity = line.quantity.max(1);
            cart.add_line(CartLine { quantity, ..line });
        }
        cart
    }

    /// Add a line, merging into an existing line with the same identity.
    pub fn add_line(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.same_key(&line)) {
            Some(existing) => existing.adjust(i64::from(line.quantity)),
            None => self.lines.push(line),
        }
    }

    /// Add an item (merge semantics).
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Money,
        image: impl Into<String>,
        quantity: u32,
        variant: Option<String>,
    ) {
        self.add_line(CartLine::new(
            product_id, title, unit_price, image, quantity, variant,
        ));
    }

    /// Remove the line with the given identity. Returns whether one existed.
    pub fn remove_item(&mut self, product_id: &ProductId, variant: Option<&str>) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_id, variant));
        self.lines.len() < len_before
    }

    /// Shift a line's quantity by `delta`, clamped at 1. Returns whether the
    /// line exists.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        variant: Option<&str>,
        delta: i64,
    ) -> bool {
        match self.lines.iter_mut().find(|l| l.matches(product_id, variant)) {
            Some(line) => {
                line.adjust(delta);
                true
            }
            None => false,
        }
    }

    /// Clear all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in display order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Σ unit_price × quantity.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn add(cart: &mut Cart, id: &str, price: i64, qty: u32, variant: Option<&str>) {
        cart.add_item(
            ProductId::new(id),
            format!("Product {}", id),
            Money::from_major(price),
            "/img.jpg",
            qty,
            variant.map(str::to_string),
        );
    }

    #[test]
    fn test_add_same_item_merges() {
        let mut cart = Cart::new();
        add(&mut cart, "p1", 150, 1, Some("Noir"));
        add(&mut cart, "p1", 150, 2, Some("Noir"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total(), Money::from_major(450));
    }

    #[test]
    fn test_variants_are_distinct_lines() {
        let mut cart = Cart::new();
        add(&mut cart, "P1", 10, 1, Some("Red"));
        add(&mut cart, "P1", 10, 1, Some("Blue"));
        add(&mut cart, "P1", 10, 1, None);
        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_new_items_append_last() {
        let mut cart = Cart::new();
        add(&mut cart, "a", 1, 1, None);
        add(&mut cart, "b", 1, 1, None);
        add(&mut cart, "a", 1, 1, None);
        add(&mut cart, "c", 1, 1, None);
        let order: Vec<_> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn test_remove_and_update_missing_are_noops() {
        let mut cart = Cart::new();
        add(&mut cart, "a", 1, 1, Some("Red"));
        assert!(!cart.remove_item(&ProductId::new("a"), Some("Blue")));
        assert!(!cart.update_quantity(&ProductId::new("zzz"), None, 3));
        assert_eq!(cart.item_count(), 1);
        assert!(cart.remove_item(&ProductId::new("a"), Some("Red")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_normalizes() {
        let line = |qty| CartLine {
            product_id: ProductId::new("p"),
            title: "t".into(),
            unit_price: Money::from_major(5),
            image: String::new(),
            quantity: qty,
            variant: None,
        };
        let cart = Cart::from_lines([line(0), line(2)]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    proptest! {
        #[test]
        fn prop_merge_sums_quantities(quantities in prop::collection::vec(1u32..50, 1..20)) {
            let mut cart = Cart::new();
            for q in &quantities {
                add(&mut cart, "p", 3, *q, Some("Noir"));
            }
            prop_assert_eq!(cart.lines().len(), 1);
            prop_assert_eq!(cart.item_count(), quantities.iter().map(|q| u64::from(*q)).sum::<u64>());
        }

        #[test]
        fn prop_quantity_never_below_one(start in 1u32..20, steps in 0usize..40) {
            let mut cart = Cart::new();
            add(&mut cart, "p", 3, start, None);
            for _ in 0..steps {
                cart.update_quantity(&ProductId::new("p"), None, -1);
                prop_assert!(cart.lines()[0].quantity >= 1);
            }
        }

        #[test]
        fn prop_total_is_sum_of_lines(
            ops in prop::collection::vec((0u8..4, 0i64..500, 1u32..5, -3i64..3), 0..30)
        ) {
            let mut cart = Cart::new();
            for (id, price, qty, delta) in ops {
                let id = format!("p{}", id);
                add(&mut cart, &id, price, qty, None);
                cart.update_quantity(&ProductId::new(id), None, delta);
                let expected: i64 = cart
                    .lines()
                    .iter()
                    .map(|l| l.unit_price.minor() * i64::from(l.quantity))
                    .sum();
                prop_assert_eq!(cart.total().minor(), expected);
            }
        }
    }
}
