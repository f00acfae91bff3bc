//! Connection configuration for the Postgres repositories.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings, typically read from the environment.
#[derive(Debug, Clone)]
pub struct PgConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl PgConfig {
    /// Read configuration from `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    ///
    /// `DATABASE_URL` is required. `DATABASE_MAX_CONNECTIONS` is optional and
    /// falls back to 5 when unset or unparseable.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "DATABASE_MAX_CONNECTIONS is not a valid u32; using default {}",
                    DEFAULT_MAX_CONNECTIONS
                );
                DEFAULT_MAX_CONNECTIONS
            }),
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Open a connection pool against the configured database.
    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.database_url)
            .await
            .context("failed to create Postgres pool")
    }
}
