//! Units of measure.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Unit of measure attached to a product and copied onto its movements.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Piece,
    Kg,
    Meter,
    Liter,
    Package,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Kg => "kg",
            Unit::Meter => "meter",
            Unit::Liter => "liter",
            Unit::Package => "package",
        }
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "piece" => Ok(Unit::Piece),
            "kg" => Ok(Unit::Kg),
            "meter" => Ok(Unit::Meter),
            "liter" => Ok(Unit::Liter),
            "package" => Ok(Unit::Package),
            other => Err(InventoryError::validation(format!(
                "unknown unit of measure: {other:?}"
            ))),
        }
    }
}
