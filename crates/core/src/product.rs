//! Product entity and its registration/update inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};
use crate::id::{CategoryId, ProductId};
use crate::unit::Unit;

/// Catalog product.
///
/// `quantity` is the one mutable field under concurrency protection: it is
/// written exclusively through the inventory ledger's conditional update,
/// never through catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub unit: Unit,
    pub price: Decimal,
    pub quantity: Decimal,
    pub min_quantity: Decimal,
    pub category_id: CategoryId,
}

impl Product {
    /// Low-stock signal: quantity at or below the configured threshold.
    pub fn low_stock(&self) -> bool {
        self.quantity <= self.min_quantity
    }
}

/// Registration input for a new product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit: Unit,
    pub price: Decimal,
    pub min_quantity: Decimal,
    pub initial_quantity: Decimal,
    pub category_id: CategoryId,
}

impl NewProduct {
    pub fn validate(&self) -> InventoryResult<()> {
        if self.name.trim().is_empty() {
            return Err(InventoryError::validation("product name cannot be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(InventoryError::validation("price cannot be negative"));
        }
        if self.min_quantity < Decimal::ZERO {
            return Err(InventoryError::validation(
                "minimum quantity cannot be negative",
            ));
        }
        if self.initial_quantity < Decimal::ZERO {
            return Err(InventoryError::validation(
                "initial quantity cannot be negative",
            ));
        }
        Ok(())
    }

    /// Promote validated input into a product row with a fresh id.
    pub fn into_product(self) -> InventoryResult<Product> {
        self.validate()?;
        Ok(Product {
            id: ProductId::new(),
            name: self.name,
            unit: self.unit,
            price: self.price,
            quantity: self.initial_quantity,
            min_quantity: self.min_quantity,
            category_id: self.category_id,
        })
    }
}

/// Field-wise product update.
///
/// Deliberately has no quantity field: quantity changes flow only through the
/// ledger, so the exclusion is structural rather than a documentation rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub min_quantity: Option<Decimal>,
    pub category_id: Option<CategoryId>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.min_quantity.is_none()
            && self.category_id.is_none()
    }

    pub fn validate(&self) -> InventoryResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(InventoryError::validation("product name cannot be empty"));
            }
        }
        if let Some(price) = self.price {
            if price < Decimal::ZERO {
                return Err(InventoryError::validation("price cannot be negative"));
            }
        }
        if let Some(min_quantity) = self.min_quantity {
            if min_quantity < Decimal::ZERO {
                return Err(InventoryError::validation(
                    "minimum quantity cannot be negative",
                ));
            }
        }
        Ok(())
    }

    /// Apply the patched fields onto an existing row. Quantity is untouched.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(min_quantity) = self.min_quantity {
            product.min_quantity = min_quantity;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new_product() -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            unit: Unit::Piece,
            price: Decimal::from(10),
            min_quantity: Decimal::from(2),
            initial_quantity: Decimal::from(5),
            category_id: CategoryId::new(),
        }
    }

    #[test]
    fn into_product_carries_initial_quantity() {
        let product = sample_new_product().into_product().unwrap();
        assert_eq!(product.quantity, Decimal::from(5));
        assert_eq!(product.min_quantity, Decimal::from(2));
        assert_eq!(product.unit, Unit::Piece);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let mut new = sample_new_product();
        new.name = "  ".to_string();
        assert!(matches!(
            new.validate().unwrap_err(),
            InventoryError::Validation(_)
        ));
    }

    #[test]
    fn validate_rejects_negative_fields() {
        for field in ["price", "min_quantity", "initial_quantity"] {
            let mut new = sample_new_product();
            match field {
                "price" => new.price = Decimal::from(-1),
                "min_quantity" => new.min_quantity = Decimal::from(-1),
                _ => new.initial_quantity = Decimal::from(-1),
            }
            assert!(
                matches!(new.validate().unwrap_err(), InventoryError::Validation(_)),
                "expected Validation error for negative {field}"
            );
        }
    }

    #[test]
    fn low_stock_triggers_at_threshold() {
        let mut product = sample_new_product().into_product().unwrap();
        product.quantity = Decimal::from(2);
        assert!(product.low_stock());
        product.quantity = Decimal::from(3);
        assert!(!product.low_stock());
    }

    #[test]
    fn patch_leaves_quantity_untouched() {
        let mut product = sample_new_product().into_product().unwrap();
        let before = product.quantity;
        let patch = ProductPatch {
            name: Some("Sledgehammer".to_string()),
            price: Some(Decimal::from(25)),
            min_quantity: Some(Decimal::ONE),
            category_id: Some(CategoryId::new()),
        };
        patch.apply_to(&mut product);
        assert_eq!(product.name, "Sledgehammer");
        assert_eq!(product.price, Decimal::from(25));
        assert_eq!(product.quantity, before);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(ProductPatch::default().is_empty());
    }
}
