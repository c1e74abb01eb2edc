//! `stockroom-core` — domain foundation for the inventory system.
//!
//! This crate contains **pure domain** types (no IO, no storage concerns):
//! typed identifiers, the error taxonomy, units of measure, and the entity
//! types with their field-level validation.

pub mod category;
pub mod error;
pub mod id;
pub mod movement;
pub mod product;
pub mod unit;

pub use category::Category;
pub use error::{InventoryError, InventoryResult, StorageError};
pub use id::{CategoryId, MovementId, ProductId};
pub use movement::{Movement, MovementFilter, MovementKind, NewMovement};
pub use product::{NewProduct, Product, ProductPatch};
pub use unit::Unit;
