//! `stockroom-ledger` — the one mutator of stock quantities.
//!
//! [`InventoryLedger::adjust_stock`] performs the read → validate →
//! conditional-commit loop that keeps `quantity` non-negative under any
//! interleaving of concurrent calls, and appends the movement record in the
//! same atomic step as the quantity write. [`MovementLog`] is the read side
//! of the ledger; [`replay`] folds a committed log back into quantities.

pub mod ledger;
pub mod log;
pub mod replay;

pub use ledger::InventoryLedger;
pub use log::MovementLog;
pub use replay::replay;
