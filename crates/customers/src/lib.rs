//! Customers domain module.
//!
//! This crate contains the customer record, the customer store contract, and
//! the registration workflow. Business rules live here; persistence stays
//! behind [`CustomerRepository`].

pub mod customer;
pub mod register;
pub mod repository;

pub use customer::{Customer, NewCustomer};
pub use register::{RegisterCustomerError, RegisterCustomerService};
pub use repository::CustomerRepository;
