//! Embedded file-backed backend on top of `sled`.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};

use stockroom_core::{
    Category, CategoryId, Movement, MovementFilter, MovementId, NewMovement, Product, ProductId,
    ProductPatch, StorageError,
};

use crate::backend::{Backend, CommitOutcome};

const CATEGORIES_TREE: &str = "categories";
const PRODUCTS_TREE: &str = "products";
const MOVEMENTS_TREE: &str = "movements";
const META_TREE: &str = "meta";
const MOVEMENT_SEQ_KEY: &[u8] = b"movement_seq";

/// Embedded backend.
///
/// Values are JSON-encoded. Movements are keyed by their big-endian sequence
/// id so a reverse range scan yields newest-first order. The conditional
/// adjustment runs as a serializable transaction spanning the products,
/// movements, and meta trees.
#[derive(Debug, Clone)]
pub struct SledBackend {
    db: sled::Db,
    categories: sled::Tree,
    products: sled::Tree,
    movements: sled::Tree,
    meta: sled::Tree,
}

impl SledBackend {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path).map_err(backend_err)?;
        let categories = db.open_tree(CATEGORIES_TREE).map_err(backend_err)?;
        let products = db.open_tree(PRODUCTS_TREE).map_err(backend_err)?;
        let movements = db.open_tree(MOVEMENTS_TREE).map_err(backend_err)?;
        let meta = db.open_tree(META_TREE).map_err(backend_err)?;
        Ok(Self {
            db,
            categories,
            products,
            movements,
            meta,
        })
    }

    /// Block until all pending writes reach disk.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(backend_err)?;
        Ok(())
    }

    fn scan_products(&self) -> Result<Vec<Product>, StorageError> {
        self.products
            .iter()
            .map(|entry| {
                let (_, raw) = entry.map_err(backend_err)?;
                decode(&raw)
            })
            .collect()
    }
}

fn backend_err(e: sled::Error) -> StorageError {
    StorageError::backend(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(value).map_err(|e| StorageError::codec(e.to_string()))
}

fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, StorageError> {
    serde_json::from_slice(raw).map_err(|e| StorageError::codec(e.to_string()))
}

/// Lift a codec/backend fault into a transaction abort.
fn abort<T>(
    result: Result<T, StorageError>,
) -> Result<T, ConflictableTransactionError<StorageError>> {
    result.map_err(ConflictableTransactionError::Abort)
}

fn unwrap_transaction<T>(
    result: Result<T, TransactionError<StorageError>>,
) -> Result<T, StorageError> {
    match result {
        Ok(value) => Ok(value),
        Err(TransactionError::Abort(e)) => Err(e),
        Err(TransactionError::Storage(e)) => Err(backend_err(e)),
    }
}

/// Read-increment the movement sequence inside a transaction.
fn next_movement_id(
    meta: &sled::transaction::TransactionalTree,
) -> Result<MovementId, ConflictableTransactionError<StorageError>> {
    let current = match meta.get(MOVEMENT_SEQ_KEY)? {
        Some(raw) => {
            let bytes: [u8; 8] = raw.as_ref().try_into().map_err(|_| {
                ConflictableTransactionError::Abort(StorageError::codec(
                    "movement sequence is not 8 bytes",
                ))
            })?;
            u64::from_be_bytes(bytes)
        }
        None => 0,
    };
    let next = current + 1;
    meta.insert(MOVEMENT_SEQ_KEY, next.to_be_bytes().to_vec())?;
    Ok(MovementId(next))
}

impl Backend for SledBackend {
    fn insert_category(&self, category: Category) -> Result<(), StorageError> {
        let key = *category.id.as_uuid().as_bytes();
        self.categories
            .insert(key, encode(&category)?)
            .map_err(backend_err)?;
        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>, StorageError> {
        let key = *id.as_uuid().as_bytes();
        match self.categories.get(key).map_err(backend_err)? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    fn delete_category(&self, id: CategoryId) -> Result<bool, StorageError> {
        let key = *id.as_uuid().as_bytes();
        Ok(self.categories.remove(key).map_err(backend_err)?.is_some())
    }

    fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        self.categories
            .iter()
            .map(|entry| {
                let (_, raw) = entry.map_err(backend_err)?;
                decode(&raw)
            })
            .collect()
    }

    fn insert_product(
        &self,
        product: Product,
        opening: Option<NewMovement>,
    ) -> Result<(), StorageError> {
        let key = *product.id.as_uuid().as_bytes();
        let raw_product = encode(&product)?;

        let Some(opening) = opening else {
            self.products
                .insert(key, raw_product)
                .map_err(backend_err)?;
            return Ok(());
        };

        let result = (&self.products, &self.movements, &self.meta).transaction(
            |(products, movements, meta)| {
                products.insert(&key[..], raw_product.clone())?;
                let id = next_movement_id(meta)?;
                let committed = opening.clone().with_id(id);
                movements.insert(
                    id.as_u64().to_be_bytes().to_vec(),
                    abort(encode(&committed))?,
                )?;
                Ok(())
            },
        );
        unwrap_transaction(result)
    }

    fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let key = *id.as_uuid().as_bytes();
        match self.products.get(key).map_err(backend_err)? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    fn find_product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        Ok(self.scan_products()?.into_iter().find(|p| p.name == name))
    }

    fn update_product(&self, id: ProductId, patch: &ProductPatch) -> Result<bool, StorageError> {
        let key = *id.as_uuid().as_bytes();
        let result = self.products.transaction(|products| {
            let Some(raw) = products.get(key)? else {
                return Ok(false);
            };
            let mut product: Product = abort(decode(&raw))?;
            patch.apply_to(&mut product);
            products.insert(&key[..], abort(encode(&product))?)?;
            Ok(true)
        });
        unwrap_transaction(result)
    }

    fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        let key = *id.as_uuid().as_bytes();
        Ok(self.products.remove(key).map_err(backend_err)?.is_some())
    }

    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        self.scan_products()
    }

    fn count_products_in_category(&self, id: CategoryId) -> Result<usize, StorageError> {
        Ok(self
            .scan_products()?
            .iter()
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
        let key = *product_id.as_uuid().as_bytes();
        let result = (&self.products, &self.movements, &self.meta).transaction(
            |(products, movements, meta)| {
                let Some(raw) = products.get(key)? else {
                    return Ok(CommitOutcome::ProductMissing);
                };
                let mut product: Product = abort(decode(&raw))?;
                if product.quantity != expected {
                    return Ok(CommitOutcome::Conflict);
                }
                product.quantity = updated;
                products.insert(&key[..], abort(encode(&product))?)?;

                let id = next_movement_id(meta)?;
                let committed = movement.clone().with_id(id);
                movements.insert(
                    id.as_u64().to_be_bytes().to_vec(),
                    abort(encode(&committed))?,
                )?;
                Ok(CommitOutcome::Committed(committed))
            },
        );
        unwrap_transaction(result)
    }

    fn list_movements(&self, filter: &MovementFilter) -> Result<Vec<Movement>, StorageError> {
        let mut out = Vec::new();
        // Keys are big-endian ids, so reverse iteration is newest-first.
        for entry in self.movements.iter().rev() {
            let (_, raw) = entry.map_err(backend_err)?;
            let movement: Movement = decode(&raw)?;
            if filter.matches(&movement) {
                out.push(movement);
            }
        }
        Ok(out)
    }
}
