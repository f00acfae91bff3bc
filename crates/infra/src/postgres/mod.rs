//! Postgres-backed repository implementations.
//!
//! This module provides persistent repositories using PostgreSQL as the
//! backing storage. Connection configuration, schema management, and the
//! per-table repositories all live here.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `RepositoryError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError | Scenario |
//! |------------|----------------------|-----------------|----------|
//! | Database (unique violation) | `23505` | `ConstraintViolation` | Duplicate customer email or product name |
//! | Database (foreign key violation) | `23503` | `ConstraintViolation` | Order line referencing a missing order/product |
//! | Database (check constraint violation) | `23514` | `ConstraintViolation` | Stock decremented below zero |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed | N/A | `Unavailable` | Connection pool was closed |
//! | PoolTimedOut | N/A | `Unavailable` | No connection available in time |
//! | Io | N/A | `Unavailable` | Network errors, connection failures |
//! | Other | N/A | `Backend` | Decoding failures, protocol errors, etc. |
//!
//! ## Thread Safety
//!
//! Every repository here is `Send + Sync` and can be shared across threads.
//! All operations use the SQLx connection pool which handles thread-safe
//! connection management.

pub mod config;
pub mod customers;
pub mod orders;
pub mod products;
pub mod schema;

pub use config::PgConfig;
pub use customers::PgCustomerRepository;
pub use orders::PgOrderRepository;
pub use products::PgProductRepository;
pub use schema::apply_migrations;

use storefront_core::RepositoryError;

/// Map SQLx errors to RepositoryError.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            // Check for specific error codes
            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        // Unique violation
                        RepositoryError::ConstraintViolation(msg)
                    }
                    "23503" => {
                        // Foreign key violation
                        RepositoryError::ConstraintViolation(msg)
                    }
                    "23514" => {
                        // Check constraint violation
                        RepositoryError::ConstraintViolation(msg)
                    }
                    _ => RepositoryError::Backend(msg),
                }
            } else {
                RepositoryError::Backend(msg)
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::Io(e) => {
            RepositoryError::Unavailable(format!("io error in {}: {}", operation, e))
        }
        _ => RepositoryError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
