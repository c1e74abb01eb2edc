//! Movement ledger entries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::id::MovementId;
use crate::unit::Unit;

/// Direction of a stock change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    Receipt,
    Issue,
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MovementKind::Receipt => f.write_str("RECEIPT"),
            MovementKind::Issue => f.write_str("ISSUE"),
        }
    }
}

/// Committed ledger entry: one immutable stock change.
///
/// Product name and unit are denormalized at append time so the entry stays
/// meaningful after the product itself is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub timestamp: DateTime<Utc>,
    pub product_name: String,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub unit: Unit,
}

/// Movement awaiting its backend-assigned sequence id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub timestamp: DateTime<Utc>,
    pub product_name: String,
    pub kind: MovementKind,
    pub quantity: Decimal,
    pub unit: Unit,
}

impl NewMovement {
    pub fn with_id(self, id: MovementId) -> Movement {
        Movement {
            id,
            timestamp: self.timestamp,
            product_name: self.product_name,
            kind: self.kind,
            quantity: self.quantity,
            unit: self.unit,
        }
    }
}

/// Read-side filter over the movement log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub product_name: Option<String>,
}

impl MovementFilter {
    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(kind) = self.kind {
            if movement.kind != kind {
                return false;
            }
        }
        if let Some(name) = &self.product_name {
            if &movement.product_name != name {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(id: u64, name: &str, kind: MovementKind) -> Movement {
        Movement {
            id: MovementId(id),
            timestamp: Utc::now(),
            product_name: name.to_string(),
            kind,
            quantity: Decimal::ONE,
            unit: Unit::Piece,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = MovementFilter::default();
        assert!(filter.matches(&movement(1, "Hammer", MovementKind::Issue)));
        assert!(filter.matches(&movement(2, "Nails", MovementKind::Receipt)));
    }

    #[test]
    fn filter_narrows_by_kind_and_name() {
        let filter = MovementFilter {
            kind: Some(MovementKind::Issue),
            product_name: Some("Hammer".to_string()),
        };
        assert!(filter.matches(&movement(1, "Hammer", MovementKind::Issue)));
        assert!(!filter.matches(&movement(2, "Hammer", MovementKind::Receipt)));
        assert!(!filter.matches(&movement(3, "Nails", MovementKind::Issue)));
    }

    #[test]
    fn kind_serializes_uppercase() {
        let json = serde_json::to_string(&MovementKind::Receipt).unwrap();
        assert_eq!(json, "\"RECEIPT\"");
    }
}
