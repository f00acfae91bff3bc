//! Product store contract: catalog lookup and stock updates.

use std::sync::Arc;

use storefront_core::{ProductId, RepositoryError};

use crate::product::{NewProduct, Product, StockDecrement};

/// Async store for catalog products.
///
/// The product store carries the stock concern as well as the catalog: the
/// order workflow reads price/quantity records here and pushes the
/// post-purchase decrements back through [`update_quantity`].
///
/// ## Batched Lookup Semantics
///
/// `find_by_ids` resolves many identifiers in one call and returns only the
/// subset that exists. Missing identifiers are **omitted, not reported**;
/// callers that care about gaps must diff the result against the request.
/// Result order is unspecified — index by id, never by position.
///
/// [`update_quantity`]: ProductRepository::update_quantity
#[async_trait::async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product, assigning its identifier and timestamps.
    async fn create(&self, new_product: NewProduct) -> Result<Product, RepositoryError>;

    /// Resolve a product name to the stored record (uniqueness guard).
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError>;

    /// Resolve a batch of identifiers to the existing subset of records.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// Apply stock decrements for purchased products.
    ///
    /// The whole batch applies or none of it does. A decrement that would
    /// take a quantity below zero fails with
    /// [`RepositoryError::ConstraintViolation`] and leaves every quantity
    /// unchanged.
    async fn update_quantity(&self, decrements: &[StockDecrement]) -> Result<(), RepositoryError>;
}

#[async_trait::async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn create(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        (**self).create(new_product).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        (**self).find_by_name(name).await
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        (**self).find_by_ids(ids).await
    }

    async fn update_quantity(&self, decrements: &[StockDecrement]) -> Result<(), RepositoryError> {
        (**self).update_quantity(decrements).await
    }
}
