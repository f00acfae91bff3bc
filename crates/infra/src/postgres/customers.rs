//! Postgres-backed customer repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use storefront_core::{CustomerId, RepositoryError};
use storefront_customers::{Customer, CustomerRepository, NewCustomer};

use super::map_sqlx_error;

/// Postgres-backed customer store.
///
/// Identifiers and timestamps are generated application-side so the stored
/// record can be returned without a follow-up read.
#[derive(Debug, Clone)]
pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

impl PgCustomerRepository {
    /// Create a new PgCustomerRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(
        skip(self, new_customer),
        fields(email = %new_customer.email),
        err
    )]
    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, RepositoryError> {
        let id = CustomerId::new();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new_customer.name)
        .bind(&new_customer.email)
        .bind(now)
        .bind(now)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_customer", e))?;

        Ok(Customer {
            id,
            name: new_customer.name,
            email: new_customer.email,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self, id), fields(customer_id = %id), err)]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_id", e))?;

        if let Some(row) = row {
            let customer_row = CustomerRow::from_row(&row).map_err(|e| {
                RepositoryError::Backend(format!("failed to decode customer row: {}", e))
            })?;
            Ok(Some(customer_row.into()))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip(self, email), fields(email = %email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_email", e))?;

        if let Some(row) = row {
            let customer_row = CustomerRow::from_row(&row).map_err(|e| {
                RepositoryError::Backend(format!("failed to decode customer row: {}", e))
            })?;
            Ok(Some(customer_row.into()))
        } else {
            Ok(None)
        }
    }
}

// SQLx row types

#[derive(Debug)]
struct CustomerRow {
    id: uuid::Uuid,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CustomerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
