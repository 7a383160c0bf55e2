//! Product snapshots and the catalog lookup contract.

use crate::error::ValidationError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// What the cart needs to know about a product at add-to-cart time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Current unit price.
    pub unit_price: Money,
    /// Primary image URL.
    pub image: String,
    /// Selectable variant labels (e.g. color names). Empty when the product
    /// has no variant axis.
    #[serde(default)]
    pub variants: Vec<String>,
}

impl ProductSnapshot {
    /// Create a snapshot without variants.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        unit_price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            unit_price,
            image: image.into(),
            variants: Vec::new(),
        }
    }

    /// Set the selectable variants.
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    /// Check a variant selection against this product.
    ///
    /// Products without variants accept only `None`; products with variants
    /// require one of their labels.
    pub fn check_variant(&self, variant: Option<&str>) -> Result<(), ValidationError> {
        match (variant, self.variants.is_empty()) {
            (None, true) => Ok(()),
            (None, false) => Err(ValidationError::VariantRequired(self.id.clone())),
            (Some(v), _) if self.variants.iter().any(|known| known == v) => Ok(()),
            (Some(v), _) => Err(ValidationError::UnknownVariant {
                product_id: self.id.clone(),
                variant: v.to_string(),
            }),
        }
    }
}

/// Read-only catalog lookup.
pub trait Catalog: Send + Sync {
    /// Describe a product as it is right now.
    fn snapshot(&self, id: &ProductId) -> Option<ProductSnapshot>;
}

/// In-process catalog, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, ProductSnapshot>>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from snapshots.
    pub fn from_products(products: impl IntoIterator<Item = ProductSnapshot>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.upsert(product);
        }
        catalog
    }

    /// Insert or replace a product.
    pub fn upsert(&self, product: ProductSnapshot) {
        if let Ok(mut products) = self.products.write() {
            products.insert(product.id.clone(), product);
        }
    }

    /// Change a product's price. Returns whether the product exists.
    pub fn set_price(&self, id: &ProductId, unit_price: Money) -> bool {
        match self.products.write() {
            Ok(mut products) => match products.get_mut(id) {
                Some(product) => {
                    product.unit_price = unit_price;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Remove a product. Returns whether it existed.
    pub fn remove(&self, id: &ProductId) -> bool {
        self.products
            .write()
            .map(|mut products| products.remove(id).is_some())
            .unwrap_or(false)
    }

    /// All products, sorted by id.
    pub fn list(&self) -> Vec<ProductSnapshot> {
        let mut products: Vec<_> = self
            .products
            .read()
            .map(|p| p.values().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        products.sort_by(|a, b| a.id.cmp(&b.id));
        products
    }
}

impl Catalog for MemoryCatalog {
    fn snapshot(&self, id: &ProductId) -> Option<ProductSnapshot> {
        self.products.read().ok()?.get(id).cloned()
    }
}
