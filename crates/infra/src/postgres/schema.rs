//! Embedded schema for the order-management tables.
//!
//! The four tables are created in dependency order (`customers` and
//! `products` first, then `orders`, then the `orders_products` join table)
//! so the foreign keys resolve. Every statement is
//! `CREATE TABLE IF NOT EXISTS`, so applying the schema twice is harmless.
//!
//! Line rows keep nullable foreign keys on purpose: deleting a product or an
//! order nulls the reference instead of cascading into historical lines.

use anyhow::Context;
use sqlx::PgPool;

const CREATE_CUSTOMERS: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id         uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name       text NOT NULL,
    email      text NOT NULL UNIQUE,
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id         uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    name       text NOT NULL UNIQUE,
    price      decimal(15, 2) NOT NULL,
    quantity   integer NOT NULL CHECK (quantity >= 0),
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id          uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id uuid REFERENCES customers (id) ON DELETE SET NULL ON UPDATE CASCADE,
    created_at  timestamptz NOT NULL DEFAULT now(),
    updated_at  timestamptz NOT NULL DEFAULT now()
)
"#;

const CREATE_ORDERS_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS orders_products (
    id         uuid PRIMARY KEY DEFAULT gen_random_uuid(),
    price      decimal(15, 2) NOT NULL,
    quantity   integer NOT NULL,
    product_id uuid REFERENCES products (id) ON DELETE SET NULL ON UPDATE CASCADE,
    order_id   uuid REFERENCES orders (id) ON DELETE SET NULL ON UPDATE CASCADE,
    created_at timestamptz NOT NULL DEFAULT now(),
    updated_at timestamptz NOT NULL DEFAULT now()
)
"#;

/// Create every table the repositories depend on.
pub async fn apply_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(CREATE_CUSTOMERS)
        .execute(pool)
        .await
        .context("failed to create customers table")?;

    sqlx::query(CREATE_PRODUCTS)
        .execute(pool)
        .await
        .context("failed to create products table")?;

    sqlx::query(CREATE_ORDERS)
        .execute(pool)
        .await
        .context("failed to create orders table")?;

    sqlx::query(CREATE_ORDERS_PRODUCTS)
        .execute(pool)
        .await
        .context("failed to create orders_products table")?;

    Ok(())
}
