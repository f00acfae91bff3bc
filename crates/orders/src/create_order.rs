//! Order creation workflow (application-level orchestration).
//!
//! This module implements the checkout slice: resolve the customer, resolve
//! the requested products in one batched lookup, validate stock, snapshot
//! unit prices, persist the order, then push the stock decrements.
//!
//! ## Execution Flow
//!
//! ```text
//! CreateOrderRequest
//!   ↓
//! 0. Reject malformed input (empty cart, zero quantities) — no I/O yet
//!   ↓
//! 1. Resolve customer (unknown id fails the request)
//!   ↓
//! 2. Batched product lookup over the distinct ids (subset result, counts diffed)
//!   ↓
//! 3. Availability check in input order (duplicate lines accumulate) +
//!    unit-price snapshot into priced lines
//!   ↓
//! 4. Persist order atomically (header + lines)
//!   ↓
//! 5. Decrement stock (single call; order stays persisted if this fails)
//! ```
//!
//! ## Failure Semantics
//!
//! Exactly one failure reason per request (fail fast). Business failures are
//! the typed variants of [`CreateOrderError`]; infrastructure failures pass
//! through as [`RepositoryError`] without translation.
//!
//! ## Known Limitation
//!
//! Steps 4 and 5 are two independent writes. A failure in step 5 leaves the
//! order persisted with stock not decremented; callers see the error, and
//! reconciliation is out of scope here. Likewise the stock check in step 3 is
//! check-then-act: nothing stops a concurrent order from draining stock
//! between validation and decrement. The storage-level conditional decrement
//! keeps quantities from going negative in that race.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use storefront_core::{CustomerId, ProductId, RepositoryError};
use storefront_customers::CustomerRepository;
use storefront_products::{Product, ProductRepository, StockDecrement};

use crate::order::{NewOrderLine, Order};
use crate::repository::OrderRepository;

/// One requested line: which product, how many units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Input to the order-creation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub line_items: Vec<LineItemRequest>,
}

/// Order creation failure.
///
/// The first five variants are deterministic business failures; the last is
/// an infrastructure failure propagated unmodified.
#[derive(Debug, Error)]
pub enum CreateOrderError {
    /// The referenced customer does not exist.
    #[error("customer was not found: {0}")]
    CustomerNotFound(CustomerId),

    /// At least one referenced product does not exist (first gap, in input
    /// order).
    #[error("product was not found: {0}")]
    ProductNotFound(ProductId),

    /// Requested units exceed available stock. `requested` is the running
    /// total across lines for this product at the failing line.
    #[error(
        "product {product_id} does not have available quantity: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    /// The request contained no line items.
    #[error("order must contain at least one line item")]
    EmptyOrder,

    /// A line item requested zero units of the named product.
    #[error("line item quantity must be at least 1 for product {0}")]
    InvalidQuantity(ProductId),

    /// The store failed; propagated unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Creates orders against the customer, product, and order stores.
///
/// All three collaborators are explicit constructor parameters (generics over
/// the store traits — no service locator). Any mix of implementations works:
/// in-memory for tests/dev, Postgres in production.
#[derive(Debug)]
pub struct CreateOrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
}

impl<C, P, O> CreateOrderService<C, P, O> {
    pub fn new(customers: C, products: P, orders: O) -> Self {
        Self {
            customers,
            products,
            orders,
        }
    }
}

impl<C, P, O> CreateOrderService<C, P, O>
where
    C: CustomerRepository,
    P: ProductRepository,
    O: OrderRepository,
{
    /// Create an order, validating stock and snapshotting catalog prices.
    ///
    /// I/O is sequential: one customer read, one batched product read, one
    /// order write, one stock write. Nothing below ever issues a per-line
    /// store call.
    #[instrument(
        skip(self, request),
        fields(
            customer_id = %request.customer_id,
            line_count = request.line_items.len()
        ),
        err
    )]
    pub async fn execute(&self, request: CreateOrderRequest) -> Result<Order, CreateOrderError> {
        // 0) Reject malformed input before any I/O.
        if request.line_items.is_empty() {
            return Err(CreateOrderError::EmptyOrder);
        }
        if let Some(line) = request.line_items.iter().find(|l| l.quantity == 0) {
            return Err(CreateOrderError::InvalidQuantity(line.product_id));
        }

        // 1) Resolve the customer.
        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or(CreateOrderError::CustomerNotFound(request.customer_id))?;

        // 2) One batched catalog lookup over the distinct product ids. The
        //    store omits missing ids, so a count difference means a gap; the
        //    error names the first missing id in input order.
        let distinct_ids = distinct_product_ids(&request.line_items);
        let found = self.products.find_by_ids(&distinct_ids).await?;
        if found.len() != distinct_ids.len() {
            let found_ids: HashSet<ProductId> = found.iter().map(|p| p.id).collect();
            match distinct_ids.iter().find(|id| !found_ids.contains(id)) {
                Some(missing) => return Err(CreateOrderError::ProductNotFound(*missing)),
                // A count mismatch without a gap means the store broke the
                // subset contract (duplicate rows).
                None => {
                    return Err(RepositoryError::Backend(
                        "product lookup returned duplicate records".to_string(),
                    )
                    .into());
                }
            }
        }
        let by_id: HashMap<ProductId, &Product> = found.iter().map(|p| (p.id, p)).collect();

        // 3) Availability check in input order — duplicate lines for one
        //    product accumulate against the same stock — and unit-price
        //    snapshot into priced lines.
        let mut requested_totals: HashMap<ProductId, u64> = HashMap::new();
        let mut lines = Vec::with_capacity(request.line_items.len());
        for line in &request.line_items {
            let product = by_id
                .get(&line.product_id)
                .ok_or(CreateOrderError::ProductNotFound(line.product_id))?;

            let total = requested_totals.entry(line.product_id).or_insert(0);
            *total += u64::from(line.quantity);
            if !product.can_fulfill(*total) {
                return Err(CreateOrderError::InsufficientStock {
                    product_id: line.product_id,
                    requested: *total,
                    available: u64::from(product.quantity),
                });
            }

            lines.push(NewOrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        // 4) Persist the order atomically (header + lines).
        let order = self.orders.create(&customer, lines).await?;

        // 5) Push the stock decrements in one call, one entry per line. A
        //    failure here leaves the order persisted — the two writes are
        //    independent.
        let decrements: Vec<StockDecrement> = request
            .line_items
            .iter()
            .map(|line| StockDecrement {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect();
        self.products.update_quantity(&decrements).await?;

        Ok(order)
    }
}

/// Order-preserving deduplication of the requested product ids.
fn distinct_product_ids(line_items: &[LineItemRequest]) -> Vec<ProductId> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::with_capacity(line_items.len());
    for line in line_items {
        if seen.insert(line.product_id) {
            distinct.push(line.product_id);
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: ProductId, quantity: u32) -> LineItemRequest {
        LineItemRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn distinct_ids_preserve_first_occurrence_order() {
        let a = ProductId::new();
        let b = ProductId::new();
        let c = ProductId::new();
        let items = vec![line(b, 1), line(a, 2), line(b, 3), line(c, 1), line(a, 1)];

        assert_eq!(distinct_product_ids(&items), vec![b, a, c]);
    }

    #[test]
    fn distinct_ids_of_unique_items_are_unchanged() {
        let a = ProductId::new();
        let b = ProductId::new();
        let items = vec![line(a, 1), line(b, 2)];

        assert_eq!(distinct_product_ids(&items), vec![a, b]);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: deduplication yields unique ids, covers every
            /// requested id, and keeps first-occurrence order.
            #[test]
            fn distinct_ids_are_unique_and_order_preserving(
                picks in prop::collection::vec((0usize..5, 1u32..10), 1..20)
            ) {
                let pool: Vec<ProductId> = (0..5).map(|_| ProductId::new()).collect();
                let items: Vec<LineItemRequest> = picks
                    .iter()
                    .map(|(idx, qty)| line(pool[*idx], *qty))
                    .collect();

                let distinct = distinct_product_ids(&items);

                let unique: HashSet<_> = distinct.iter().copied().collect();
                prop_assert_eq!(unique.len(), distinct.len());

                let requested: HashSet<_> = items.iter().map(|l| l.product_id).collect();
                prop_assert_eq!(&unique, &requested);

                let first_index = |id: ProductId| {
                    items.iter().position(|l| l.product_id == id).unwrap()
                };
                for pair in distinct.windows(2) {
                    prop_assert!(first_index(pair[0]) < first_index(pair[1]));
                }
            }
        }
    }
}
