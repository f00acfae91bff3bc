//! Orders domain module.
//!
//! This crate contains the order aggregate (header + line items), the order
//! store contract, and the order-creation workflow that ties the customer,
//! product, and order stores together.

pub mod create_order;
pub mod order;
pub mod repository;

pub use create_order::{
    CreateOrderError, CreateOrderRequest, CreateOrderService, LineItemRequest,
};
pub use order::{NewOrderLine, Order, OrderLine};
pub use repository::OrderRepository;
