use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::CustomerId;

/// A stored customer record.
///
/// Customers are referenced by orders but never mutated by the order
/// workflows; as far as this slice is concerned the record is immutable once
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a customer that has not been persisted yet.
///
/// The store assigns the identifier and timestamps during `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}
