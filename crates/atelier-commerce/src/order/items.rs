//! Frozen order lines and their storage encoding.

use crate::cart::CartLine;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current version tag of the encoded items blob.
const ITEMS_FORMAT_VERSION: u32 = 1;

/// One line of a placed order. A value copy of the cart line at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl OrderLine {
    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            title: line.title.clone(),
            unit_price: line.unit_price,
            image: line.image.clone(),
            quantity: line.quantity,
            variant: line.variant.clone(),
        }
    }
}

/// The items blob could not be read back.
#[derive(Error, Debug)]
pub enum ItemsDecodeError {
    #[error("malformed items: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported items version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Serialize, Deserialize)]
struct EncodedItems {
    v: u32,
    lines: Vec<OrderLine>,
}

/// The priced lines of an order.
///
/// Serializes as a plain array for presentation; storage goes through
/// [`OrderItems::encode`] which adds a version tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItems(Vec<OrderLine>);

impl OrderItems {
    /// Snapshot cart lines.
    pub fn from_cart(lines: &[CartLine]) -> Self {
        Self(lines.iter().map(OrderLine::from).collect())
    }

    /// Lines in cart order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.0
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Σ unit_price × quantity.
    pub fn total(&self) -> Money {
        self.0.iter().map(OrderLine::subtotal).sum()
    }

    /// Σ quantity.
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Encode for storage.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&EncodedItems {
            v: ITEMS_FORMAT_VERSION,
            lines: self.0.clone(),
        })
    }

    /// Decode a stored blob.
    pub fn decode(raw: &str) -> Result<Self, ItemsDecodeError> {
        let encoded: EncodedItems = serde_json::from_str(raw)?;
        if encoded.v != ITEMS_FORMAT_VERSION {
            return Err(ItemsDecodeError::UnsupportedVersion(encoded.v));
        }
        Ok(Self(encoded.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_lines() -> Vec<CartLine> {
        vec![
            CartLine::new(
                ProductId::new("hijab-soie-01"),
                "Hijab Soie de Médine",
                Money::from_major(150),
                "/h.jpg",
                2,
                Some("Noir".into()),
            ),
            CartLine::new(
                ProductId::new("abaya-02"),
                "Abaya",
                Money::from_minor(39_950),
                "/a.jpg",
                1,
                None,
            ),
        ]
    }

    #[test]
    fn test_snapshot_total() {
        let items = OrderItems::from_cart(&cart_lines());
        assert_eq!(items.len(), 2);
        assert_eq!(items.item_count(), 3);
        assert_eq!(items.total(), Money::from_minor(69_950));
    }

    #[test]
    fn test_encoded_blob_is_tagged() {
        let items = OrderItems::from_cart(&cart_lines());
        let raw = items.encode().unwrap();
        assert!(raw.starts_with(r#"{"v":1,"#));
        assert_eq!(OrderItems::decode(&raw).unwrap(), items);
    }

    #[test]
    fn test_decode_rejects_unknown_version_and_garbage() {
        assert!(matches!(
            OrderItems::decode(r#"{"v":7,"lines":[]}"#),
            Err(ItemsDecodeError::UnsupportedVersion(7))
        ));
        assert!(matches!(
            OrderItems::decode("[1,2"),
            Err(ItemsDecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_presentation_is_plain_array() {
        let items = OrderItems::from_cart(&cart_lines()[..1]);
        let value = serde_json::to_value(&items).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["variant"], "Noir");
    }
}
