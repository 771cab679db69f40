//! Stock movements and the inventory audit trail
//!
//! Every change to a product's stock outside invoice posting is expressed as
//! a `StockMovement`. Applying one mutates the product and appends an
//! immutable `InventoryTransaction`; the two always happen together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{InventoryTransactionId, Money, ProductId, UserId};

use crate::error::InventoryError;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockMovementType {
    /// Goods received from a supplier
    Purchase,
    /// Goods leaving the shop
    Sale,
    /// Manual correction, always an increment
    Adjustment,
}

impl StockMovementType {
    /// Returns the signed change in stock for a positive quantity
    pub fn signed_delta(&self, quantity: i64) -> i64 {
        match self {
            StockMovementType::Sale => -quantity,
            StockMovementType::Purchase | StockMovementType::Adjustment => quantity,
        }
    }

    /// Returns true if this movement removes stock
    pub fn is_outbound(&self) -> bool {
        matches!(self, StockMovementType::Sale)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockMovementType::Purchase => "purchase",
            StockMovementType::Sale => "sale",
            StockMovementType::Adjustment => "adjustment",
        }
    }
}

impl std::fmt::Display for StockMovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether invoice posting may take stock below zero
///
/// Manual stock movements always enforce the floor; this policy only
/// governs the decrement performed when a sale is posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversellPolicy {
    /// Stock may go negative (the shop sells goods not yet booked in)
    #[default]
    Allow,
    /// A line exceeding available stock aborts the whole posting
    Reject,
}

impl OversellPolicy {
    /// Builds the policy from a configuration flag
    pub fn from_allow(allow_oversell: bool) -> Self {
        if allow_oversell {
            OversellPolicy::Allow
        } else {
            OversellPolicy::Reject
        }
    }
}

/// A validated request to move stock for one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub product_id: ProductId,
    pub movement_type: StockMovementType,
    /// Always positive; direction comes from `movement_type`
    pub quantity: i64,
    pub unit_cost: Money,
    pub note: Option<String>,
    pub created_by: Option<UserId>,
}

impl StockMovement {
    /// Creates a movement, rejecting non-positive quantities and negative costs
    ///
    /// # Errors
    ///
    /// `InventoryError::InvalidInput` when the quantity is not positive or the
    /// unit cost is negative
    pub fn new(
        product_id: ProductId,
        movement_type: StockMovementType,
        quantity: i64,
        unit_cost: Option<Money>,
        note: Option<String>,
        created_by: Option<UserId>,
    ) -> Result<Self, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::invalid(format!(
                "quantity must be greater than zero, got {}",
                quantity
            )));
        }
        let unit_cost = unit_cost.unwrap_or(Money::ZERO).require_non_negative("unit cost")?;

        Ok(Self {
            product_id,
            movement_type,
            quantity,
            unit_cost,
            note: note.filter(|n| !n.trim().is_empty()),
            created_by,
        })
    }

    /// Signed change this movement applies to stock
    pub fn delta(&self) -> i64 {
        self.movement_type.signed_delta(self.quantity)
    }

    /// Builds the audit record for this movement
    pub fn to_transaction(&self, at: DateTime<Utc>) -> InventoryTransaction {
        InventoryTransaction {
            id: InventoryTransactionId::new_v7(),
            product_id: self.product_id,
            movement_type: self.movement_type,
            quantity: self.quantity,
            unit_cost: self.unit_cost,
            note: self.note.clone(),
            created_by: self.created_by,
            transaction_date: at,
        }
    }
}

/// Immutable audit record of a stock movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTransaction {
    pub id: InventoryTransactionId,
    pub product_id: ProductId,
    pub movement_type: StockMovementType,
    pub quantity: i64,
    pub unit_cost: Money,
    pub note: Option<String>,
    pub created_by: Option<UserId>,
    pub transaction_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_delta() {
        assert_eq!(StockMovementType::Sale.signed_delta(4), -4);
        assert_eq!(StockMovementType::Purchase.signed_delta(4), 4);
        assert_eq!(StockMovementType::Adjustment.signed_delta(4), 4);
    }

    #[test]
    fn test_movement_rejects_zero_quantity() {
        let result = StockMovement::new(
            ProductId::new(),
            StockMovementType::Purchase,
            0,
            None,
            None,
            None,
        );
        assert!(matches!(result, Err(InventoryError::InvalidInput(_))));
    }

    #[test]
    fn test_movement_rejects_negative_cost() {
        let result = StockMovement::new(
            ProductId::new(),
            StockMovementType::Purchase,
            5,
            Some(Money::new(dec!(-1))),
            None,
            None,
        );
        assert!(matches!(result, Err(InventoryError::InvalidInput(_))));
    }

    #[test]
    fn test_movement_defaults_unit_cost_to_zero() {
        let movement = StockMovement::new(
            ProductId::new(),
            StockMovementType::Adjustment,
            2,
            None,
            Some("  ".to_string()),
            None,
        )
        .unwrap();
        assert!(movement.unit_cost.is_zero());
        assert_eq!(movement.note, None);
    }

    #[test]
    fn test_type_serializes_lowercase() {
        let json = serde_json::to_string(&StockMovementType::Adjustment).unwrap();
        assert_eq!(json, "\"adjustment\"");
        let parsed: Result<StockMovementType, _> = serde_json::from_str("\"refund\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_oversell_policy_from_flag() {
        assert_eq!(OversellPolicy::from_allow(true), OversellPolicy::Allow);
        assert_eq!(OversellPolicy::from_allow(false), OversellPolicy::Reject);
        assert_eq!(OversellPolicy::default(), OversellPolicy::Allow);
    }
}
