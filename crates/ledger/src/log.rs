//! Read side of the movement log.

use std::sync::Arc;

use stockroom_core::{InventoryResult, Movement, MovementFilter};
use stockroom_store::Backend;

/// Queryable view over the append-only movement history.
///
/// Appending is not exposed here: entries enter the log only through the
/// ledger's atomic commit (or a registration's opening receipt).
#[derive(Debug)]
pub struct MovementLog<B> {
    backend: Arc<B>,
}

impl<B> Clone for MovementLog<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> MovementLog<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Movements matching `filter`, newest-first.
    pub fn list_recent(&self, filter: &MovementFilter) -> InventoryResult<Vec<Movement>> {
        Ok(self.backend.list_movements(filter)?)
    }
}
