//! `stockroom-store` — storage port and backends.
//!
//! The core is storage-agnostic: everything above this crate talks to the
//! [`Backend`] trait, whose one concurrency primitive
//! ([`Backend::commit_adjustment`]) is a conditional quantity swap fused with
//! the movement append. Two adapters are provided: an in-memory store and an
//! embedded `sled` database.

pub mod backend;
pub mod memory;
pub mod sled_backend;

pub use backend::{Backend, CommitOutcome};
pub use memory::MemoryBackend;
pub use sled_backend::SledBackend;
