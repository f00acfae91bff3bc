//! Customer store contract.

use std::sync::Arc;

use storefront_core::{CustomerId, RepositoryError};

use crate::customer::{Customer, NewCustomer};

/// Async store for customer records.
///
/// ## Design Principles
///
/// - **No storage assumptions**: works with in-memory implementations
///   (tests/dev) and SQL backends (production)
/// - **Absence is not an error**: lookups return `Ok(None)` for unknown
///   identifiers; `Err` is reserved for infrastructure failures
/// - **Untranslated errors**: implementations report [`RepositoryError`] and
///   never map failures into business kinds
#[async_trait::async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer, assigning its identifier and timestamps.
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Resolve a customer identifier to the stored record.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Resolve an e-mail address to the stored record (uniqueness guard).
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;
}

#[async_trait::async_trait]
impl<R> CustomerRepository for Arc<R>
where
    R: CustomerRepository + ?Sized,
{
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, RepositoryError> {
        (**self).create(new_customer).await
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        (**self).find_by_email(email).await
    }
}
