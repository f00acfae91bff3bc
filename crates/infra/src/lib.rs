//! Infrastructure layer: store implementations and schema management.
//!
//! Two families of repository implementations back the domain store traits:
//! [`memory`] (RwLock-based, for tests/dev) and [`postgres`] (sqlx, for
//! production, including the embedded schema migrations and environment
//! configuration).

pub mod memory;
pub mod postgres;
