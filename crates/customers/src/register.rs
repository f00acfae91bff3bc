//! Customer registration workflow.

use thiserror::Error;
use tracing::instrument;

use storefront_core::{DomainError, RepositoryError};

use crate::customer::{Customer, NewCustomer};
use crate::repository::CustomerRepository;

/// Customer registration failure.
#[derive(Debug, Error)]
pub enum RegisterCustomerError {
    /// The e-mail address is already registered.
    #[error("email address already in use: {0}")]
    EmailTaken(String),

    /// The input failed validation (blank name or e-mail address).
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// The store failed; propagated unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Registers customers, guarding e-mail uniqueness.
///
/// The store is an explicit constructor parameter; any [`CustomerRepository`]
/// implementation works (in-memory for tests/dev, Postgres in production).
#[derive(Debug)]
pub struct RegisterCustomerService<C> {
    customers: C,
}

impl<C> RegisterCustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }
}

impl<C> RegisterCustomerService<C>
where
    C: CustomerRepository,
{
    /// Register a new customer.
    ///
    /// Blank names or e-mail addresses fail validation before any store call;
    /// an already-registered e-mail address fails with
    /// [`RegisterCustomerError::EmailTaken`].
    #[instrument(skip(self, new_customer), fields(email = %new_customer.email), err)]
    pub async fn execute(
        &self,
        new_customer: NewCustomer,
    ) -> Result<Customer, RegisterCustomerError> {
        if new_customer.name.trim().is_empty() {
            return Err(DomainError::validation("customer name cannot be empty").into());
        }
        if new_customer.email.trim().is_empty() {
            return Err(DomainError::validation("customer email cannot be empty").into());
        }

        if let Some(existing) = self.customers.find_by_email(&new_customer.email).await? {
            return Err(RegisterCustomerError::EmailTaken(existing.email));
        }

        let customer = self.customers.create(new_customer).await?;
        Ok(customer)
    }
}
