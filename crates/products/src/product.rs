use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{Money, ProductId};

/// A stored catalog product.
///
/// `quantity` is the stock currently available for sale. It is non-negative by
/// construction and only ever mutated through the store's stock-update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Invariant helper: whether `requested` units can be taken from stock.
    ///
    /// The total is `u64` so duplicate request lines can be summed without
    /// overflow before the check.
    pub fn can_fulfill(&self, requested: u64) -> bool {
        requested <= u64::from(self.quantity)
    }
}

/// Data for a product that has not been persisted yet.
///
/// The store assigns the identifier and timestamps during `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// One stock decrement to apply after an order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDecrement {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_product(quantity: u32) -> Product {
        Product {
            id: ProductId::new(),
            name: "Keyboard".to_string(),
            price: Money::new(dec!(10.00)).unwrap(),
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn can_fulfill_allows_up_to_available_quantity() {
        let product = test_product(5);
        assert!(product.can_fulfill(0));
        assert!(product.can_fulfill(3));
        assert!(product.can_fulfill(5));
    }

    #[test]
    fn can_fulfill_rejects_more_than_available() {
        let product = test_product(2);
        assert!(!product.can_fulfill(3));
        assert!(!product.can_fulfill(u64::from(u32::MAX) + 1));
    }
}
