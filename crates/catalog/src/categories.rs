//! Category store.

use std::sync::Arc;

use stockroom_core::{Category, CategoryId, InventoryError, InventoryResult};
use stockroom_store::Backend;

/// Owns category lifecycle: creation, guarded deletion, listing.
#[derive(Debug)]
pub struct CategoryStore<B> {
    backend: Arc<B>,
}

impl<B> Clone for CategoryStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> CategoryStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Create a category. Fails on blank name.
    pub fn create(&self, name: &str, description: Option<&str>) -> InventoryResult<Category> {
        let category = Category::new(name, description.map(str::to_string))?;
        self.backend.insert_category(category.clone())?;
        Ok(category)
    }

    /// Delete a category.
    ///
    /// The dependent-product check is an explicit query rather than a storage
    /// trigger, so the referential rule stays visible and testable here.
    pub fn delete(&self, id: CategoryId) -> InventoryResult<()> {
        let dependents = self.backend.count_products_in_category(id)?;
        if dependents > 0 {
            return Err(InventoryError::referential_integrity(format!(
                "{dependents} product(s) still reference category {id}"
            )));
        }
        if !self.backend.delete_category(id)? {
            return Err(InventoryError::not_found("category"));
        }
        Ok(())
    }

    pub fn get(&self, id: CategoryId) -> InventoryResult<Category> {
        self.backend
            .get_category(id)?
            .ok_or(InventoryError::not_found("category"))
    }

    pub fn list(&self) -> InventoryResult<Vec<Category>> {
        Ok(self.backend.list_categories()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stockroom_core::{NewProduct, Unit};
    use stockroom_store::MemoryBackend;

    use crate::products::ProductCatalog;

    fn services() -> (CategoryStore<MemoryBackend>, ProductCatalog<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        (
            CategoryStore::new(Arc::clone(&backend)),
            ProductCatalog::new(backend),
        )
    }

    fn hammer(category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            unit: Unit::Piece,
            price: Decimal::from(10),
            min_quantity: Decimal::from(2),
            initial_quantity: Decimal::from(5),
            category_id,
        }
    }

    #[test]
    fn create_and_list_categories() {
        let (categories, _) = services();
        categories.create("Tools", None).unwrap();
        categories.create("Paint", Some("wall paint")).unwrap();
        assert_eq!(categories.list().unwrap().len(), 2);
    }

    #[test]
    fn create_rejects_blank_name() {
        let (categories, _) = services();
        assert!(matches!(
            categories.create("  ", None).unwrap_err(),
            InventoryError::Validation(_)
        ));
    }

    #[test]
    fn delete_unknown_category_is_not_found() {
        let (categories, _) = services();
        assert!(matches!(
            categories.delete(CategoryId::new()).unwrap_err(),
            InventoryError::NotFound(_)
        ));
    }

    #[test]
    fn delete_is_blocked_while_products_reference_it() {
        let (categories, products) = services();
        let tools = categories.create("Tools", None).unwrap();
        let product = products.register(hammer(tools.id)).unwrap();

        let err = categories.delete(tools.id).unwrap_err();
        assert!(matches!(err, InventoryError::ReferentialIntegrity(_)));
        // Category must still exist.
        assert!(categories.get(tools.id).is_ok());

        // Once the product is gone, deletion succeeds.
        products.delete(product.id).unwrap();
        categories.delete(tools.id).unwrap();
        assert!(matches!(
            categories.get(tools.id).unwrap_err(),
            InventoryError::NotFound(_)
        ));
    }
}
