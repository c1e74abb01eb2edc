//! Atomic stock adjustment.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use stockroom_core::{
    InventoryError, InventoryResult, Movement, MovementKind, NewMovement, ProductId,
};
use stockroom_store::{Backend, CommitOutcome};

/// Retry bound for the optimistic commit loop. Conflicts are only possible
/// while other adjustments on the same product are in flight, so a handful of
/// attempts is enough; beyond that the caller gets a typed concurrency error.
const MAX_COMMIT_ATTEMPTS: u32 = 8;

/// Orchestrates quantity mutation and movement append.
///
/// The only component allowed to change `Product.quantity`. The check-then-act
/// sequence is made indivisible by the backend's conditional update: the
/// ledger reads a snapshot, validates against it, and asks the backend to
/// commit only if the stored quantity is still the snapshot value. A lost race
/// re-reads fresh state and revalidates rather than replaying a stale delta,
/// so an issue that becomes unaffordable mid-retry fails with
/// `InsufficientStock`, never with a negative quantity.
#[derive(Debug)]
pub struct InventoryLedger<B> {
    backend: Arc<B>,
}

impl<B> Clone for InventoryLedger<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> InventoryLedger<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Apply one stock movement and append it to the log, atomically.
    ///
    /// - `quantity` must be positive.
    /// - RECEIPT always succeeds once validated.
    /// - ISSUE fails with [`InventoryError::InsufficientStock`] when the
    ///   current quantity cannot cover it; nothing is written in that case.
    /// - Either the quantity write and the movement append are both durably
    ///   visible, or neither is.
    pub fn adjust_stock(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: Decimal,
    ) -> InventoryResult<Movement> {
        if quantity <= Decimal::ZERO {
            return Err(InventoryError::validation(
                "movement quantity must be positive",
            ));
        }

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let product = self
                .backend
                .get_product(product_id)?
                .ok_or(InventoryError::not_found("product"))?;

            let updated = match kind {
                MovementKind::Receipt => product.quantity + quantity,
                MovementKind::Issue => {
                    if product.quantity < quantity {
                        return Err(InventoryError::InsufficientStock {
                            requested: quantity,
                            available: product.quantity,
                        });
                    }
                    product.quantity - quantity
                }
            };

            let movement = NewMovement {
                timestamp: Utc::now(),
                product_name: product.name.clone(),
                kind,
                quantity,
                unit: product.unit,
            };

            match self
                .backend
                .commit_adjustment(product_id, product.quantity, updated, movement)?
            {
                CommitOutcome::Committed(movement) => {
                    tracing::debug!(
                        %product_id,
                        movement_id = %movement.id,
                        %kind,
                        %quantity,
                        new_quantity = %updated,
                        "stock adjusted"
                    );
                    return Ok(movement);
                }
                CommitOutcome::Conflict => {
                    tracing::debug!(%product_id, attempt, "adjustment lost the swap, re-reading");
                }
                CommitOutcome::ProductMissing => {
                    return Err(InventoryError::not_found("product"));
                }
            }
        }

        tracing::warn!(
            %product_id,
            attempts = MAX_COMMIT_ATTEMPTS,
            "giving up after repeated quantity conflicts"
        );
        Err(InventoryError::Concurrency {
            attempts: MAX_COMMIT_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use stockroom_catalog::{CategoryStore, ProductCatalog};
    use stockroom_core::{MovementFilter, NewProduct, Product, Unit};
    use stockroom_store::{MemoryBackend, SledBackend};

    fn seed<B: Backend>(backend: &Arc<B>, initial: i64) -> Product {
        let categories = CategoryStore::new(Arc::clone(backend));
        let products = ProductCatalog::new(Arc::clone(backend));
        let tools = categories.create("Tools", None).unwrap();
        products
            .register(NewProduct {
                name: "Hammer".to_string(),
                unit: Unit::Piece,
                price: Decimal::from(10),
                min_quantity: Decimal::from(2),
                initial_quantity: Decimal::from(initial),
                category_id: tools.id,
            })
            .unwrap()
    }

    #[test]
    fn issue_decrements_and_appends_movement() {
        let backend = Arc::new(MemoryBackend::new());
        let product = seed(&backend, 5);
        let ledger = InventoryLedger::new(Arc::clone(&backend));

        let movement = ledger
            .adjust_stock(product.id, MovementKind::Issue, Decimal::from(3))
            .unwrap();
        assert_eq!(movement.kind, MovementKind::Issue);
        assert_eq!(movement.quantity, Decimal::from(3));
        assert_eq!(movement.unit, Unit::Piece);
        assert_eq!(movement.product_name, "Hammer");

        let stored = backend.get_product(product.id).unwrap().unwrap();
        assert_eq!(stored.quantity, Decimal::from(2));
        assert!(stored.low_stock());
    }

    #[test]
    fn receipt_increments() {
        let backend = Arc::new(MemoryBackend::new());
        let product = seed(&backend, 5);
        let ledger = InventoryLedger::new(Arc::clone(&backend));

        ledger
            .adjust_stock(product.id, MovementKind::Receipt, Decimal::from(7))
            .unwrap();
        assert_eq!(
            backend.get_product(product.id).unwrap().unwrap().quantity,
            Decimal::from(12)
        );
    }

    #[test]
    fn oversized_issue_fails_and_writes_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let product = seed(&backend, 2);
        let ledger = InventoryLedger::new(Arc::clone(&backend));
        let log_len_before = backend
            .list_movements(&MovementFilter::default())
            .unwrap()
            .len();

        let err = ledger
            .adjust_stock(product.id, MovementKind::Issue, Decimal::from(10))
            .unwrap_err();
        match err {
            InventoryError::InsufficientStock {
                requested,
                available,
            } => {
                assert_eq!(requested, Decimal::from(10));
                assert_eq!(available, Decimal::from(2));
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(
            backend.get_product(product.id).unwrap().unwrap().quantity,
            Decimal::from(2)
        );
        assert_eq!(
            backend
                .list_movements(&MovementFilter::default())
                .unwrap()
                .len(),
            log_len_before
        );
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        let product = seed(&backend, 5);
        let ledger = InventoryLedger::new(Arc::clone(&backend));

        for quantity in [Decimal::ZERO, Decimal::from(-3)] {
            assert!(matches!(
                ledger
                    .adjust_stock(product.id, MovementKind::Issue, quantity)
                    .unwrap_err(),
                InventoryError::Validation(_)
            ));
        }
    }

    #[test]
    fn unknown_product_is_not_found() {
        let backend = Arc::new(MemoryBackend::new());
        let ledger = InventoryLedger::new(backend);
        assert!(matches!(
            ledger
                .adjust_stock(ProductId::new(), MovementKind::Receipt, Decimal::ONE)
                .unwrap_err(),
            InventoryError::NotFound("product")
        ));
    }

    #[test]
    fn two_racing_issues_on_last_unit_produce_exactly_one_success() {
        // Scenario: quantity = 1, two concurrent issues of 1.
        for _ in 0..50 {
            let backend = Arc::new(MemoryBackend::new());
            let product = seed(&backend, 1);
            let ledger = InventoryLedger::new(Arc::clone(&backend));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let ledger = ledger.clone();
                    let id = product.id;
                    thread::spawn(move || ledger.adjust_stock(id, MovementKind::Issue, Decimal::ONE))
                })
                .collect();
            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            let successes = results.iter().filter(|r| r.is_ok()).count();
            let insufficient = results
                .iter()
                .filter(|r| matches!(r, Err(InventoryError::InsufficientStock { .. })))
                .count();
            assert_eq!(successes, 1);
            assert_eq!(insufficient, 1);
            assert_eq!(
                backend.get_product(product.id).unwrap().unwrap().quantity,
                Decimal::ZERO
            );
        }
    }

    #[test]
    fn concurrent_issues_exhaust_stock_exactly_to_zero() {
        // 10 units, 16 threads each issuing 1: exactly 10 succeed.
        let backend = Arc::new(MemoryBackend::new());
        let product = seed(&backend, 10);
        let ledger = InventoryLedger::new(Arc::clone(&backend));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let ledger = ledger.clone();
                let id = product.id;
                thread::spawn(move || ledger.adjust_stock(id, MovementKind::Issue, Decimal::ONE))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 10);
        assert!(results.iter().all(|r| matches!(
            r,
            Ok(_) | Err(InventoryError::InsufficientStock { .. })
        )));

        let stored = backend.get_product(product.id).unwrap().unwrap();
        assert_eq!(stored.quantity, Decimal::ZERO);

        // One movement per successful issue, plus the opening receipt.
        let movements = backend.list_movements(&MovementFilter::default()).unwrap();
        assert_eq!(movements.len(), 11);
    }

    #[test]
    fn concurrent_adjustments_on_sled_backend_stay_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(SledBackend::open(dir.path().join("db")).unwrap());
        let product = seed(&backend, 5);
        let ledger = InventoryLedger::new(Arc::clone(&backend));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = ledger.clone();
                let id = product.id;
                thread::spawn(move || ledger.adjust_stock(id, MovementKind::Issue, Decimal::ONE))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 5);
        assert_eq!(
            backend.get_product(product.id).unwrap().unwrap().quantity,
            Decimal::ZERO
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Receipt(u32),
            Issue(u32),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (1u32..50).prop_map(Op::Receipt),
                (1u32..50).prop_map(Op::Issue),
            ]
        }

        proptest! {
            /// Quantity never goes negative under any serial operation
            /// sequence, and the committed log replays to the final state.
            #[test]
            fn serial_sequences_preserve_invariant_and_replay(
                initial in 0u32..100,
                ops in proptest::collection::vec(op_strategy(), 1..40)
            ) {
                let backend = Arc::new(MemoryBackend::new());
                let product = seed(&backend, i64::from(initial));
                let ledger = InventoryLedger::new(Arc::clone(&backend));

                for op in &ops {
                    let result = match op {
                        Op::Receipt(q) => ledger.adjust_stock(
                            product.id,
                            MovementKind::Receipt,
                            Decimal::from(*q),
                        ),
                        Op::Issue(q) => ledger.adjust_stock(
                            product.id,
                            MovementKind::Issue,
                            Decimal::from(*q),
                        ),
                    };
                    if let Err(e) = result {
                        prop_assert!(
                            matches!(e, InventoryError::InsufficientStock { .. }),
                            "expected InsufficientStock, got {:?}",
                            e
                        );
                    }
                    let stored = backend.get_product(product.id).unwrap().unwrap();
                    prop_assert!(stored.quantity >= Decimal::ZERO);
                }

                let movements = backend.list_movements(&MovementFilter::default()).unwrap();
                let replayed = crate::replay(&movements);
                let stored = backend.get_product(product.id).unwrap().unwrap();
                let expected = replayed
                    .get("Hammer")
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                prop_assert_eq!(stored.quantity, expected);
            }

            /// Randomized concurrent interleavings never oversell: the number
            /// of successful issues is exactly what the stock can cover.
            #[test]
            fn concurrent_issues_never_oversell(
                initial in 1u32..12,
                issue_count in 2usize..10
            ) {
                let backend = Arc::new(MemoryBackend::new());
                let product = seed(&backend, i64::from(initial));
                let ledger = InventoryLedger::new(Arc::clone(&backend));

                let handles: Vec<_> = (0..issue_count)
                    .map(|_| {
                        let ledger = ledger.clone();
                        let id = product.id;
                        std::thread::spawn(move || {
                            ledger.adjust_stock(id, MovementKind::Issue, Decimal::ONE)
                        })
                    })
                    .collect();
                let results: Vec<_> =
                    handles.into_iter().map(|h| h.join().unwrap()).collect();

                let successes = results.iter().filter(|r| r.is_ok()).count();
                let expected = issue_count.min(initial as usize);
                prop_assert_eq!(successes, expected);

                let stored = backend.get_product(product.id).unwrap().unwrap();
                prop_assert!(stored.quantity >= Decimal::ZERO);
                prop_assert_eq!(
                    stored.quantity,
                    Decimal::from(initial) - Decimal::from(successes as u32)
                );
            }
        }
    }
}
