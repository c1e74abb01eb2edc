//! Tracing/logging setup for processes embedding the inventory core.
//!
//! The core itself only emits `tracing` events and returns typed errors; how
//! those events surface (format, filtering, destination) is decided here by
//! the embedding binary.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
