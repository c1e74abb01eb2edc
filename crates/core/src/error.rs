//! Error taxonomy for the inventory core.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type used across the inventory core.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Fault raised by a storage backend.
///
/// Kept separate from [`InventoryError`] so backends stay decoupled from the
/// business taxonomy; callers receive it folded in as
/// [`InventoryError::Storage`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend itself failed (IO, lock poisoning, transaction machinery).
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded.
    #[error("stored record codec failure: {0}")]
    Codec(String),
}

impl StorageError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

/// Typed failure of an inventory operation.
///
/// Every operation returns this as a value; nothing in the core logs, prints,
/// or terminates the process. All variants are independently retryable by the
/// caller, except that a [`InventoryError::Validation`] retry must supply
/// corrected input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Bad input; the caller's fault, never retried automatically.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced identifier does not resolve.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Category deletion blocked by dependent products.
    #[error("referential integrity violated: {0}")]
    ReferentialIntegrity(String),

    /// An issue exceeded available stock. A legitimate business outcome,
    /// not a system fault.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: Decimal,
        available: Decimal,
    },

    /// A conditional update lost its race every time within the retry bound.
    #[error("concurrent update lost after {attempts} attempts")]
    Concurrency { attempts: u32 },

    /// Backend unavailable or misbehaving; surfaced as-is.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl InventoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound(entity)
    }

    pub fn referential_integrity(msg: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(msg.into())
    }
}
