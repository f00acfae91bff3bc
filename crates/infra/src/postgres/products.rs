//! Postgres-backed product repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use storefront_core::{Money, ProductId, RepositoryError};
use storefront_products::{NewProduct, Product, ProductRepository, StockDecrement};

use super::map_sqlx_error;

/// Postgres-backed product store.
///
/// `update_quantity` relies on conditional decrements
/// (`WHERE quantity >= $n`) inside one transaction, so a batch either applies
/// fully or rolls back. Combined with the `quantity >= 0` check constraint,
/// stock can never go negative even under concurrent writers.
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    pool: Arc<PgPool>,
}

impl PgProductRepository {
    /// Create a new PgProductRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(
        skip(self, new_product),
        fields(name = %new_product.name),
        err
    )]
    async fn create(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        let id = ProductId::new();
        let now = Utc::now();

        // The column is int4; a quantity past it can never be stored.
        let quantity = i32::try_from(new_product.quantity).map_err(|_| {
            RepositoryError::ConstraintViolation(format!(
                "quantity {} exceeds the integer column range",
                new_product.quantity
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new_product.name)
        .bind(new_product.price.amount())
        .bind(quantity)
        .bind(now)
        .bind(now)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        Ok(Product {
            id,
            name: new_product.name,
            price: new_product.price,
            quantity: new_product.quantity,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self, name), fields(name = %name), err)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e))?;

        if let Some(row) = row {
            let product_row = ProductRow::from_row(&row).map_err(|e| {
                RepositoryError::Backend(format!("failed to decode product row: {}", e))
            })?;
            Ok(Some(product_row.into_product()?))
        } else {
            Ok(None)
        }
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()), err)]
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let id_params: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&id_params)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products_by_ids", e))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let product_row = ProductRow::from_row(&row).map_err(|e| {
                RepositoryError::Backend(format!("failed to decode product row: {}", e))
            })?;
            products.push(product_row.into_product()?);
        }
        Ok(products)
    }

    #[instrument(skip(self, decrements), fields(decrement_count = decrements.len()), err)]
    async fn update_quantity(
        &self,
        decrements: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        if decrements.is_empty() {
            return Ok(());
        }

        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for decrement in decrements {
            // The quantity guard rejects underflow without reading first.
            // Repeated decrements for one product stack up within the
            // transaction, so the batch total is what gets checked. The
            // decrement binds as bigint; a value past the int4 range fails
            // the guard as a plain underflow instead of wrapping.
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - $2, updated_at = $3
                WHERE id = $1 AND quantity >= $2
                "#,
            )
            .bind(decrement.product_id.as_uuid())
            .bind(i64::from(decrement.quantity))
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("decrement_stock", e))?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(RepositoryError::ConstraintViolation(format!(
                    "stock underflow or unknown product: {}",
                    decrement.product_id
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(())
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: uuid::Uuid,
    name: String,
    price: Decimal,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProductRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl ProductRow {
    /// Rebuild the domain record, rejecting values the schema should have
    /// made impossible (negative price or quantity).
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = Money::new(self.price).map_err(|e| {
            RepositoryError::Backend(format!("stored price is invalid: {}", e))
        })?;
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::Backend(format!("stored quantity is negative: {}", self.quantity))
        })?;

        Ok(Product {
            id: ProductId::from_uuid(self.id),
            name: self.name,
            price,
            quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
