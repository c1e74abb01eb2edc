//! Storage port for the inventory core.

use std::sync::Arc;

use rust_decimal::Decimal;

use stockroom_core::{
    Category, CategoryId, Movement, MovementFilter, NewMovement, Product, ProductId, ProductPatch,
    StorageError,
};

/// Outcome of a conditional adjustment commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The stored quantity matched the expectation; the new quantity and the
    /// appended movement are durable together.
    Committed(Movement),
    /// The stored quantity no longer matched; nothing was written. The caller
    /// must re-read before retrying.
    Conflict,
    /// The product row vanished between read and commit; nothing was written.
    ProductMissing,
}

/// Logical tables of the inventory system plus the atomic conditional-update
/// primitive the ledger is built on.
///
/// Implementations must guarantee that [`Backend::commit_adjustment`] and the
/// opening-movement path of [`Backend::insert_product`] are atomic: either
/// both the quantity write and the movement append become visible, or
/// neither does. Everything else needs only read-committed consistency.
pub trait Backend: Send + Sync {
    fn insert_category(&self, category: Category) -> Result<(), StorageError>;
    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError>;
    /// Remove the category row. Returns `false` if no such row existed.
    /// Referential checks happen at the catalog layer, not here.
    fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError>;
    fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// Insert a product row, optionally appending its opening RECEIPT
    /// movement in the same atomic scope.
    fn insert_product(
        &self,
        product: Product,
        opening: Option<NewMovement>,
    ) -> Result<(), StorageError>;
    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError>;
    /// Rewrite the catalog fields of a product row in place, leaving the
    /// stored quantity untouched. Returns `false` if the row does not exist.
    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<bool, StorageError>;
    /// Remove the product row. Returns `false` if no such row existed.
    /// Movement history is retained.
    fn delete_product(&self, id: ProductId) -> Result<bool, StorageError>;
    fn list_products(&self) -> Result<Vec<Product>, StorageError>;
    fn count_products_in_category(&self, id: CategoryId) -> Result<usize, StorageError>;

    /// Conditional update: swing the product quantity from `expected` to
    /// `updated` and append `movement`, all in one atomic step. Reports
    /// [`CommitOutcome::Conflict`] without writing anything when the stored
    /// quantity differs from `expected`.
    fn commit_adjustment(
        &self,
        product_id: ProductId,
        expected: Decimal,
        updated: Decimal,
        movement: NewMovement,
    ) -> Result<CommitOutcome, StorageError>;

    /// Movements matching `filter`, newest-first (descending id).
    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<Movement>, StorageError>;
}

impl<S> Backend for Arc<S>
where
    S: Backend + ?Sized,
{
    fn insert_category(&self, category: Category) -> Result<(), StorageError> {
        (**self).insert_category(category)
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        (**self).get_category(id)
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError> {
        (**self).delete_category(id)
    }

    fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        (**self).list_categories()
    }

    fn insert_product(
        &self,
        product: Product,
        opening: Option<NewMovement>,
    ) -> Result<(), StorageError> {
        (**self).insert_product(product, opening)
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        (**self).get_product(id)
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        (**self).find_product_by_name(name)
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<bool, StorageError> {
        (**self).update_product(id, patch)
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        (**self).delete_product(id)
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        (**self).list_products()
    }

    fn count_products_in_category(&self, id: CategoryId) -> Result<usize, StorageError> {
        (**self).count_products_in_category(id)
    }

    fn commit_adjustment(
        &self,
        product_id: ProductId,
        expected: Decimal,
        updated: Decimal,
        movement: NewMovement,
    ) -> Result<CommitOutcome, StorageError> {
        (**self).commit_adjustment(product_id, expected, updated, movement)
    }

    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<Movement>, StorageError> {
        (**self).list_movements(filter)
    }
}
