//! `stockroom-catalog` — category and product catalog services.
//!
//! Services hold an explicit backend handle (no global connection state) and
//! own everything about categories and products except quantity mutation,
//! which belongs exclusively to the inventory ledger.

pub mod categories;
pub mod products;

pub use categories::CategoryStore;
pub use products::{ProductCatalog, ProductRow};
