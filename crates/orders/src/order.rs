use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, Money, OrderId, OrderLineId, ProductId};

/// A priced line ready to be persisted.
///
/// The unit price is the catalog price **at order time**; the workflow
/// snapshots it here so later catalog changes never alter a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// A stored order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price captured when the order was placed.
    pub unit_price: Money,
}

impl OrderLine {
    /// `unit_price × quantity`. `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A stored order: header plus its line items, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub lines: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of all line totals. Derived, never stored. `None` on overflow.
    pub fn total(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::ZERO, |acc, line| {
            line.line_total().and_then(|t| acc.checked_add(t))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount).unwrap()
    }

    fn test_line(quantity: u32, unit_price: Money) -> OrderLine {
        OrderLine {
            id: OrderLineId::new(),
            product_id: ProductId::new(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn line_total_scales_unit_price() {
        let line = test_line(3, money(dec!(10.00)));
        assert_eq!(line.line_total().unwrap(), money(dec!(30.00)));
    }

    #[test]
    fn order_total_sums_line_totals() {
        let order = Order {
            id: OrderId::new(),
            customer_id: CustomerId::new(),
            lines: vec![
                test_line(3, money(dec!(10.00))),
                test_line(2, money(dec!(0.99))),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(order.total().unwrap(), money(dec!(31.98)));
    }
}
