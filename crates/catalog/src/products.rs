//! Product catalog.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use stockroom_core::{
    InventoryError, InventoryResult, MovementKind, NewMovement, NewProduct, Product, ProductId,
    ProductPatch,
};
use stockroom_store::Backend;

/// Product joined with its category name for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub product: Product,
    pub category_name: String,
}

/// Owns product lifecycle and catalog edits.
///
/// Quantity is out of bounds here by construction: [`ProductPatch`] carries no
/// quantity field and registration hands the opening quantity straight to the
/// backend. All later quantity changes flow through the ledger.
#[derive(Debug)]
pub struct ProductCatalog<B> {
    backend: Arc<B>,
}

impl<B> Clone for ProductCatalog<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> ProductCatalog<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Register a product.
    ///
    /// A non-zero initial quantity is recorded as an opening RECEIPT movement
    /// in the same atomic scope as the insert, so replaying the movement log
    /// over an empty catalog reproduces current quantities exactly.
    pub fn register(&self, new: NewProduct) -> InventoryResult<Product> {
        new.validate()?;
        if self.backend.get_category(new.category_id)?.is_none() {
            return Err(InventoryError::not_found("category"));
        }
        let product = new.into_product()?;
        let opening = (product.quantity > Decimal::ZERO).then(|| NewMovement {
            timestamp: Utc::now(),
            product_name: product.name.clone(),
            kind: MovementKind::Receipt,
            quantity: product.quantity,
            unit: product.unit,
        });
        self.backend.insert_product(product.clone(), opening)?;
        tracing::debug!(product_id = %product.id, name = %product.name, "product registered");
        Ok(product)
    }

    /// Edit catalog fields (name, price, threshold, category). Never quantity.
    pub fn update(&self, id: ProductId, patch: ProductPatch) -> InventoryResult<()> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(InventoryError::validation("no fields to update"));
        }
        if let Some(category_id) = patch.category_id {
            if self.backend.get_category(category_id)?.is_none() {
                return Err(InventoryError::not_found("category"));
            }
        }
        if !self.backend.update_product(id, &patch)? {
            return Err(InventoryError::not_found("product"));
        }
        Ok(())
    }

    /// Remove the product row. Movement history is retained.
    pub fn delete(&self, id: ProductId) -> InventoryResult<()> {
        if !self.backend.delete_product(id)? {
            return Err(InventoryError::not_found("product"));
        }
        Ok(())
    }

    pub fn get(&self, id: ProductId) -> InventoryResult<Product> {
        self.backend
            .get_product(id)?
            .ok_or(InventoryError::not_found("product"))
    }

    pub fn find_by_name(&self, name: &str) -> InventoryResult<Product> {
        self.backend
            .find_product_by_name(name)?
            .ok_or(InventoryError::not_found("product"))
    }

    /// All products joined with their category names, by id.
    ///
    /// A product whose category does not resolve is a typed error, not a
    /// placeholder label.
    pub fn list(&self) -> InventoryResult<Vec<ProductRow>> {
        let categories: HashMap<_, _> = self
            .backend
            .list_categories()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        self.backend
            .list_products()?
            .into_iter()
            .map(|product| {
                let category_name = categories
                    .get(&product.category_id)
                    .cloned()
                    .ok_or(InventoryError::not_found("category"))?;
                Ok(ProductRow {
                    product,
                    category_name,
                })
            })
            .collect()
    }
}
