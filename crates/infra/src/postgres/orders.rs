//! Postgres-backed order repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use storefront_core::{CustomerId, Money, OrderId, OrderLineId, ProductId, RepositoryError};
use storefront_customers::Customer;
use storefront_orders::{NewOrderLine, Order, OrderLine, OrderRepository};

use super::map_sqlx_error;

/// Postgres-backed order store.
///
/// `create` writes the order header and every line in a single transaction:
/// either the whole order lands or nothing does.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: Arc<PgPool>,
}

impl PgOrderRepository {
    /// Create a new PgOrderRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl OrderRepository for PgOrderRepository {
    #[instrument(
        skip(self, customer, lines),
        fields(customer_id = %customer.id, line_count = lines.len()),
        err
    )]
    async fn create(
        &self,
        customer: &Customer,
        lines: Vec<NewOrderLine>,
    ) -> Result<Order, RepositoryError> {
        let order_id = OrderId::new();
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(customer.id.as_uuid())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        let mut stored_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let line_id = OrderLineId::new();

            // The column is int4; a quantity past it can never be stored.
            // An early error drops the transaction, which rolls it back.
            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::ConstraintViolation(format!(
                    "quantity {} exceeds the integer column range",
                    line.quantity
                ))
            })?;

            sqlx::query(
                r#"
                INSERT INTO orders_products (
                    id,
                    price,
                    quantity,
                    product_id,
                    order_id,
                    created_at,
                    updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(line_id.as_uuid())
            .bind(line.unit_price.amount())
            .bind(quantity)
            .bind(line.product_id.as_uuid())
            .bind(order_id.as_uuid())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_line", e))?;

            stored_lines.push(OrderLine {
                id: line_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(Order {
            id: order_id,
            customer_id: customer.id,
            lines: stored_lines,
            created_at: now,
            updated_at: now,
        })
    }

    #[instrument(skip(self, id), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let header = sqlx::query(
            r#"
            SELECT id, customer_id, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_by_id", e))?;

        let Some(header) = header else {
            return Ok(None);
        };

        let order_row = OrderHeaderRow::from_row(&header).map_err(|e| {
            RepositoryError::Backend(format!("failed to decode order row: {}", e))
        })?;

        // Line ids are UUIDv7, so the id tiebreak keeps same-timestamp lines
        // in insertion order.
        let rows = sqlx::query(
            r#"
            SELECT id, price, quantity, product_id
            FROM orders_products
            WHERE order_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_lines", e))?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let line_row = OrderLineRow::from_row(&row).map_err(|e| {
                RepositoryError::Backend(format!("failed to decode order line row: {}", e))
            })?;
            lines.push(line_row.into_order_line()?);
        }

        Ok(Some(order_row.into_order(lines)?))
    }
}

// SQLx row types
//
// The schema keeps the foreign key columns nullable (a deleted customer or
// product nulls the reference instead of cascading). The domain records
// require both ids, so a nulled reference surfaces as a backend error.

#[derive(Debug)]
struct OrderHeaderRow {
    id: uuid::Uuid,
    customer_id: Option<uuid::Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderHeaderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderHeaderRow {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl OrderHeaderRow {
    fn into_order(self, lines: Vec<OrderLine>) -> Result<Order, RepositoryError> {
        let customer_id = self.customer_id.ok_or_else(|| {
            RepositoryError::Backend(format!(
                "order {} no longer references a customer",
                self.id
            ))
        })?;

        Ok(Order {
            id: OrderId::from_uuid(self.id),
            customer_id: CustomerId::from_uuid(customer_id),
            lines,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug)]
struct OrderLineRow {
    id: uuid::Uuid,
    price: Decimal,
    quantity: i32,
    product_id: Option<uuid::Uuid>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderLineRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderLineRow {
            id: row.try_get("id")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
            product_id: row.try_get("product_id")?,
        })
    }
}

impl OrderLineRow {
    fn into_order_line(self) -> Result<OrderLine, RepositoryError> {
        let product_id = self.product_id.ok_or_else(|| {
            RepositoryError::Backend(format!(
                "order line {} no longer references a product",
                self.id
            ))
        })?;
        let unit_price = Money::new(self.price).map_err(|e| {
            RepositoryError::Backend(format!("stored line price is invalid: {}", e))
        })?;
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::Backend(format!("stored line quantity is negative: {}", self.quantity))
        })?;

        Ok(OrderLine {
            id: OrderLineId::from_uuid(self.id),
            product_id: ProductId::from_uuid(product_id),
            quantity,
            unit_price,
        })
    }
}
