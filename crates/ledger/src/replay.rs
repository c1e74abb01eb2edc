//! Movement log replay.

use std::collections::HashMap;

use rust_decimal::Decimal;

use stockroom_core::{Movement, MovementKind};

/// Fold a committed movement log into per-product quantities.
///
/// Entries are applied in id order regardless of the order given, so feeding
/// in a newest-first listing is fine. Products are keyed by their denormalized
/// name, the identity movements carry.
pub fn replay(movements: &[Movement]) -> HashMap<String, Decimal> {
    let mut ordered: Vec<&Movement> = movements.iter().collect();
    ordered.sort_by_key(|m| m.id);

    let mut quantities: HashMap<String, Decimal> = HashMap::new();
    for movement in ordered {
        let entry = quantities
            .entry(movement.product_name.clone())
            .or_insert(Decimal::ZERO);
        match movement.kind {
            MovementKind::Receipt => *entry += movement.quantity,
            MovementKind::Issue => *entry -= movement.quantity,
        }
    }
    quantities
}
