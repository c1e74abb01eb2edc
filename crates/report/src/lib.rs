//! `stockroom-report` — derived read-side statistics.
//!
//! Pure computations over catalog state at call time (read-committed
//! snapshots, no caching): total stock value, low-stock alerts, entity
//! counts. Nothing here mutates anything.

use std::sync::Arc;

use rust_decimal::Decimal;

use stockroom_core::{InventoryResult, Product};
use stockroom_store::Backend;

/// Read-side reporter over the product catalog and category store.
#[derive(Debug)]
pub struct Reporter<B> {
    backend: Arc<B>,
}

impl<B> Clone for Reporter<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> Reporter<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Sum of `quantity * price` over all products; zero for an empty catalog.
    pub fn total_value(&self) -> InventoryResult<Decimal> {
        Ok(self
            .backend
            .list_products()?
            .iter()
            .map(|p| p.quantity * p.price)
            .sum())
    }

    /// Products at or below their low-stock threshold.
    pub fn low_stock_products(&self) -> InventoryResult<Vec<Product>> {
        Ok(self
            .backend
            .list_products()?
            .into_iter()
            .filter(Product::low_stock)
            .collect())
    }

    pub fn product_count(&self) -> InventoryResult<usize> {
        Ok(self.backend.list_products()?.len())
    }

    pub fn category_count(&self) -> InventoryResult<usize> {
        Ok(self.backend.list_categories()?.len())
    }
}
