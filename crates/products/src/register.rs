//! Product registration workflow.

use thiserror::Error;
use tracing::instrument;

use storefront_core::{DomainError, RepositoryError};

use crate::product::{NewProduct, Product};
use crate::repository::ProductRepository;

/// Product registration failure.
#[derive(Debug, Error)]
pub enum RegisterProductError {
    /// A product with this name is already registered.
    #[error("product name already in use: {0}")]
    NameTaken(String),

    /// The input failed validation (blank name).
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The store failed; propagated unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Registers catalog products, guarding name uniqueness.
#[derive(Debug)]
pub struct RegisterProductService<P> {
    products: P,
}

impl<P> RegisterProductService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }
}

impl<P> RegisterProductService<P>
where
    P: ProductRepository,
{
    /// Register a new product with its unit price and initial stock.
    #[instrument(skip(self, new_product), fields(name = %new_product.name), err)]
    pub async fn execute(&self, new_product: NewProduct) -> Result<Product, RegisterProductError> {
        if new_product.name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty").into());
        }

        if let Some(existing) = self.products.find_by_name(&new_product.name).await? {
            return Err(RegisterProductError::NameTaken(existing.name));
        }

        let product = self.products.create(new_product).await?;
        Ok(product)
    }
}
