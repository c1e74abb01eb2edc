//! Category entity.

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};
use crate::id::CategoryId;

/// Product category.
///
/// Leaf entity: owns nothing, referenced by products. Deleting it is blocked
/// while any product still points at it (checked at the catalog layer, not by
/// a storage trigger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    /// Build a category with a fresh id, validating the name.
    pub fn new(name: impl Into<String>, description: Option<String>) -> InventoryResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InventoryError::validation("category name cannot be empty"));
        }
        Ok(Self {
            id: CategoryId::new(),
            name,
            description,
        })
    }
}
