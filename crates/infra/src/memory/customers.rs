use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use storefront_core::{CustomerId, RepositoryError};
use storefront_customers::{Customer, CustomerRepository, NewCustomer};

/// In-memory customer store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an existing record directly (test arrangement).
    pub fn seed(&self, customer: Customer) -> Result<(), RepositoryError> {
        let mut customers = self
            .customers
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        customers.insert(customer.id, customer);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(),
            name: new_customer.name,
            email: new_customer.email,
            created_at: now,
            updated_at: now,
        };

        let mut customers = self
            .customers
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customers = self
            .customers
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(customers.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let customers = self
            .customers
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(customers.values().find(|c| c.email == email).cloned())
    }
}
