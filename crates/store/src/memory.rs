//! In-memory backend for tests and single-process use.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;

use stockroom_core::{
    Category, CategoryId, Movement, MovementFilter, MovementId, NewMovement, Product, ProductId,
    ProductPatch, StorageError,
};

use crate::backend::{Backend, CommitOutcome};

#[derive(Debug, Default)]
struct State {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
    movements: Vec<Movement>,
    movement_seq: u64,
}

impl State {
    fn next_movement_id(&mut self) -> MovementId {
        self.movement_seq += 1;
        MovementId(self.movement_seq)
    }
}

/// In-memory backend.
///
/// A single `RwLock` over the whole state makes `commit_adjustment` trivially
/// atomic: the quantity check, the write, and the movement append all happen
/// under one write guard.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: RwLock<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StorageError> {
        self.inner
            .read()
            .map_err(|_| StorageError::backend("state lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StorageError> {
        self.inner
            .write()
            .map_err(|_| StorageError::backend("state lock poisoned"))
    }
}

impl Backend for MemoryBackend {
    fn insert_category(&self, category: Category) -> Result<(), StorageError> {
        let mut state = self.write()?;
        state.categories.insert(category.id, category);
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError> {
        Ok(self.write()?.categories.remove(&id).is_some())
    }

    fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    fn insert_product(
        &self,
        product: Product,
        opening: Option<NewMovement>,
    ) -> Result<(), StorageError> {
        let mut state = self.write()?;
        state.products.insert(product.id, product);
        if let Some(opening) = opening {
            let id = state.next_movement_id();
            state.movements.push(opening.with_id(id));
        }
        Ok(())
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        Ok(self
            .read()?
            .products
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<bool, StorageError> {
        let mut state = self.write()?;
        match state.products.get_mut(&id) {
            Some(product) => {
                patch.apply_to(product);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        Ok(self.write()?.products.remove(&id).is_some())
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    fn count_products_in_category(&self, id: CategoryId) -> Result<usize, StorageError> {
        Ok(self
            .read()?
            .products
            .values()
            .filter(|p| p.category_id == id)
            .count())
    }

    fn commit_adjustment(
        &self,
        product_id: ProductId,
        expected: Decimal,
        updated: Decimal,
        movement: NewMovement,
    ) -> Result<CommitOutcome, StorageError> {
        let mut state = self.write()?;
        let Some(product) = state.products.get_mut(&product_id) else {
            return Ok(CommitOutcome::ProductMissing);
        };
        if product.quantity != expected {
            return Ok(CommitOutcome::Conflict);
        }
        product.quantity = updated;
        let id = state.next_movement_id();
        let committed = movement.with_id(id);
        state.movements.push(committed.clone());
        Ok(CommitOutcome::Committed(committed))
    }

    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<Movement>, StorageError> {
        Ok(self
            .read()?
            .movements
            .iter()
            .rev()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }
}
