//! Products domain module.
//!
//! This crate contains the catalog product record, the product store contract
//! (batched lookup + stock updates), and the registration workflow. Business
//! rules live here; persistence stays behind [`ProductRepository`].

pub mod product;
pub mod register;
pub mod repository;

pub use product::{NewProduct, Product, StockDecrement};
pub use register::{RegisterProductError, RegisterProductService};
pub use repository::ProductRepository;
