use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;

use storefront_core::{ProductId, RepositoryError};
use storefront_products::{NewProduct, Product, ProductRepository, StockDecrement};

/// In-memory product store.
///
/// Intended for tests/dev. Not optimized for performance. Lookup and stock
/// semantics match the Postgres implementation: `find_by_ids` returns one
/// record per distinct known id, and `update_quantity` applies all decrements
/// or none.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an existing record directly (test arrangement).
    pub fn seed(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        products.insert(product.id, product);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, new_product: NewProduct) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            name: new_product.name,
            price: new_product.price,
            quantity: new_product.quantity,
            created_at: now,
            updated_at: now,
        };

        let mut products = self
            .products
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let products = self
            .products
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(products.values().find(|p| p.name == name).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let products = self
            .products
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        // One record per distinct id, in request order. Unknown ids are
        // simply omitted, never reported.
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for id in ids {
            if seen.insert(*id) {
                if let Some(product) = products.get(id) {
                    found.push(product.clone());
                }
            }
        }
        Ok(found)
    }

    async fn update_quantity(
        &self,
        decrements: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        // Net the decrements per product, then validate every one before
        // touching any record. A failure partway through must leave stock
        // levels exactly as they were.
        let mut net: HashMap<ProductId, u64> = HashMap::new();
        for decrement in decrements {
            *net.entry(decrement.product_id).or_insert(0) += u64::from(decrement.quantity);
        }

        for (product_id, total) in &net {
            let product = products.get(product_id).ok_or_else(|| {
                RepositoryError::ConstraintViolation(format!(
                    "stock underflow or unknown product: {product_id}"
                ))
            })?;
            if *total > u64::from(product.quantity) {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "stock underflow or unknown product: {product_id}"
                )));
            }
        }

        let now = Utc::now();
        for (product_id, total) in net {
            if let Some(product) = products.get_mut(&product_id) {
                product.quantity -= total as u32;
                product.updated_at = now;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use storefront_core::Money;

    fn test_product(name: &str, quantity: u32) -> NewProduct {
        NewProduct::new(
            name,
            Money::new(dec!(9.99)).expect("valid price"),
            quantity,
        )
    }

    #[tokio::test]
    async fn find_by_ids_returns_subset_in_request_order() {
        let repo = InMemoryProductRepository::new();
        let first = repo.create(test_product("Keyboard", 5)).await.unwrap();
        let second = repo.create(test_product("Mouse", 5)).await.unwrap();
        let unknown = ProductId::new();

        let found = repo
            .find_by_ids(&[second.id, unknown, first.id])
            .await
            .unwrap();

        let ids: Vec<ProductId> = found.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn find_by_ids_collapses_duplicate_request_ids() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(test_product("Keyboard", 5)).await.unwrap();

        let found = repo
            .find_by_ids(&[product.id, product.id, product.id])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn find_by_ids_with_no_matches_returns_empty() {
        let repo = InMemoryProductRepository::new();
        repo.create(test_product("Keyboard", 5)).await.unwrap();

        let found = repo
            .find_by_ids(&[ProductId::new(), ProductId::new()])
            .await
            .unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn update_quantity_decrements_stock() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(test_product("Keyboard", 5)).await.unwrap();

        repo.update_quantity(&[StockDecrement {
            product_id: product.id,
            quantity: 3,
        }])
        .await
        .unwrap();

        let found = repo.find_by_ids(&[product.id]).await.unwrap();
        assert_eq!(found[0].quantity, 2);
    }

    #[tokio::test]
    async fn update_quantity_nets_decrements_for_same_product() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(test_product("Keyboard", 6)).await.unwrap();

        let decrement = StockDecrement {
            product_id: product.id,
            quantity: 3,
        };
        repo.update_quantity(&[decrement, decrement]).await.unwrap();

        let found = repo.find_by_ids(&[product.id]).await.unwrap();
        assert_eq!(found[0].quantity, 0);
    }

    #[tokio::test]
    async fn update_quantity_rejects_underflow_without_partial_writes() {
        let repo = InMemoryProductRepository::new();
        let plenty = repo.create(test_product("Keyboard", 10)).await.unwrap();
        let scarce = repo.create(test_product("Mouse", 1)).await.unwrap();

        let err = repo
            .update_quantity(&[
                StockDecrement {
                    product_id: plenty.id,
                    quantity: 4,
                },
                StockDecrement {
                    product_id: scarce.id,
                    quantity: 2,
                },
            ])
            .await
            .unwrap_err();

        match err {
            RepositoryError::ConstraintViolation(_) => {}
            other => panic!("Expected ConstraintViolation, got {other:?}"),
        }

        // The valid decrement must not have been applied either.
        let found = repo.find_by_ids(&[plenty.id, scarce.id]).await.unwrap();
        assert_eq!(found[0].quantity, 10);
        assert_eq!(found[1].quantity, 1);
    }

    #[tokio::test]
    async fn update_quantity_rejects_unknown_product() {
        let repo = InMemoryProductRepository::new();

        let err = repo
            .update_quantity(&[StockDecrement {
                product_id: ProductId::new(),
                quantity: 1,
            }])
            .await
            .unwrap_err();

        match err {
            RepositoryError::ConstraintViolation(_) => {}
            other => panic!("Expected ConstraintViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_quantity_treats_quantities_past_the_i32_range_as_underflow() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(test_product("Keyboard", 100)).await.unwrap();

        let err = repo
            .update_quantity(&[StockDecrement {
                product_id: product.id,
                quantity: 3_000_000_000,
            }])
            .await
            .unwrap_err();

        match err {
            RepositoryError::ConstraintViolation(_) => {}
            other => panic!("Expected ConstraintViolation, got {other:?}"),
        }

        let found = repo.find_by_ids(&[product.id]).await.unwrap();
        assert_eq!(found[0].quantity, 100);
    }
}
