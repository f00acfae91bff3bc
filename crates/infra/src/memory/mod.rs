//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance. Each store mirrors
//! the corresponding trait contract exactly, including subset lookup
//! semantics and all-or-nothing stock updates.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::InMemoryCustomerRepository;
pub use orders::InMemoryOrderRepository;
pub use products::InMemoryProductRepository;
