//! # Stock Ledger
//!
//! Pure stock transitions. Given an inventory record and a movement, produces
//! the updated record and the immutable ledger entry that explains it. The
//! store persists both together (see `cafe-db`'s inventory repository).
//!
//! ## Transitions
//! ```text
//! ┌──────────────┬───────────────────────────────┬──────────────────────────┐
//! │ type         │ new_stock                     │ total_cost               │
//! ├──────────────┼───────────────────────────────┼──────────────────────────┤
//! │ restock      │ previous + quantity           │ quantity × cost_per_unit │
//! │ waste        │ max(0, previous − quantity)   │ none                     │
//! │ adjustment   │ max(0, quantity)              │ none                     │
//! └──────────────┴───────────────────────────────┴──────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `new_stock` is never negative
//! - The returned record's `current_stock` equals the entry's `new_stock`
//! - Only a restock stamps `last_restocked`

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{InventoryItem, StockTransaction, TransactionType};
use crate::validation::validate_stock_quantity;

/// A requested stock movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMovement {
    pub transaction_type: TransactionType,
    pub quantity: i64,
    pub notes: Option<String>,
    /// Display name recorded as `created_by`.
    pub actor: String,
}

/// The outcome of applying a movement: the record to write back and the
/// entry to append.
#[derive(Debug, Clone, PartialEq)]
pub struct StockAdjustment {
    pub inventory: InventoryItem,
    pub transaction: StockTransaction,
}

/// Computes the stock level after a movement.
///
/// Returns `None` when a restock would overflow.
pub fn next_stock_level(transaction_type: TransactionType, previous: i64, quantity: i64) -> Option<i64> {
    match transaction_type {
        TransactionType::Restock => previous.checked_add(quantity),
        TransactionType::Waste => Some(previous.saturating_sub(quantity).max(0)),
        TransactionType::Adjustment => Some(quantity.max(0)),
    }
}

/// Applies a movement to an inventory record.
///
/// `transaction_id` and `now` are supplied by the caller so the function stays
/// deterministic.
///
/// ## Errors
/// - `Validation` when `quantity` is negative
/// - `StockOverflow` when the new level or the restock cost overflows
pub fn adjust_stock(
    record: &InventoryItem,
    movement: StockMovement,
    transaction_id: String,
    now: DateTime<Utc>,
) -> CoreResult<StockAdjustment> {
    validate_stock_quantity(movement.quantity)?;

    let overflow = || CoreError::StockOverflow {
        inventory_id: record.id.clone(),
    };

    let previous_stock = record.current_stock;
    let new_stock =
        next_stock_level(movement.transaction_type, previous_stock, movement.quantity).ok_or_else(overflow)?;

    let total_cost_cents = match movement.transaction_type {
        TransactionType::Restock => Some(
            movement
                .quantity
                .checked_mul(record.cost_price_cents)
                .ok_or_else(overflow)?,
        ),
        TransactionType::Waste | TransactionType::Adjustment => None,
    };

    let mut inventory = record.clone();
    inventory.current_stock = new_stock;
    inventory.updated_at = now;
    if movement.transaction_type == TransactionType::Restock {
        inventory.last_restocked = Some(now);
    }

    let transaction = StockTransaction {
        id: transaction_id,
        inventory_id: record.id.clone(),
        menu_item_name: record.menu_item_name.clone(),
        transaction_type: movement.transaction_type,
        quantity: movement.quantity,
        previous_stock,
        new_stock,
        cost_per_unit_cents: record.cost_price_cents,
        total_cost_cents,
        notes: movement.notes,
        created_by: movement.actor,
        created_at: now,
    };

    Ok(StockAdjustment { inventory, transaction })
}

// =============================================================================
// Unit Tests
// =============================================================================
