use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use storefront_core::{OrderId, OrderLineId, RepositoryError};
use storefront_customers::Customer;
use storefront_orders::{NewOrderLine, Order, OrderLine, OrderRepository};

/// In-memory order store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored order, in no particular order (test assertions).
    pub fn all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(orders.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(
        &self,
        customer: &Customer,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            customer_id: customer.id,
            lines: lines
                .into_iter()
                .map(|line| OrderLine {
                    id: OrderLineId::new(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };

        let mut orders = self
            .orders
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(orders.get(&id).cloned())
    }
}
