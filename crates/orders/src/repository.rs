//! Order store contract.

use std::sync::Arc;

use storefront_core::{OrderId, RepositoryError};
use storefront_customers::Customer;

use crate::order::{NewOrderLine, Order};

/// Async store for order aggregates.
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order for `customer` with its priced lines.
    ///
    /// The store assigns the order identifier, per-line identifiers, and
    /// creation timestamps. Header and lines persist together — all or
    /// nothing. Each stored line is tied to the new order and to the product
    /// it references.
    async fn create(
        &self,
        customer: &Customer,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError>;

    /// Resolve an order identifier to the stored order (header + lines).
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
}

#[async_trait::async_trait]
impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    async fn create(
        &self,
        customer: &Customer,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError> {
        (**self).create(customer, lines).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).find_by_id(id).await
    }
}
