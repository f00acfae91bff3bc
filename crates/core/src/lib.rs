//! `storefront-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult, RepositoryError};
pub use id::{CustomerId, OrderId, OrderLineId, ProductId};
pub use money::Money;
