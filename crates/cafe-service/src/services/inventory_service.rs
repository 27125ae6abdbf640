//! # Inventory Service
//!
//! Inventory records and the stock ledger.
//!
//! ## Adjustment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust(actor, inventory_id, { transaction_type, quantity, notes })     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  policy: AdjustStock                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load record ───────────────────────────────► NOT_FOUND                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cafe_core::adjust_stock ───────────────────► VALIDATION_ERROR          │
//! │       │   (pure: new level, snapshot entry)      (negative quantity)    │
//! │       ▼                                                                 │
//! │  InventoryRepository::apply_adjustment                                  │
//! │       │   one transaction, UPDATE guarded by the level we read          │
//! │       │                                                                 │
//! │       ├── another writer got there first ───► CONFLICT                  │
//! │       ▼                                                                 │
//! │  { inventory, transaction }                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `current_stock` moves only through this flow; `update` changes thresholds,
//! cost, supplier and unit.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::Actor;
use crate::dto::{AdjustStockRequest, CreateInventoryRequest, StockAdjustmentResponse, UpdateInventoryRequest};
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::{checked_id, MAX_TEXT_LEN};
use crate::AppState;
use cafe_core::validation::{
    normalize_optional, validate_limit, validate_name, validate_price_cents, validate_stock_levels,
    validate_stock_quantity,
};
use cafe_core::{adjust_stock, InventoryItem, StockMovement, StockTransaction, Supplier};
use cafe_db::{new_id, DbError};

/// Default page size for the ledger listing.
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 100;

/// Largest page the ledger listing returns.
pub const MAX_TRANSACTION_LIMIT: u32 = 500;

/// Recorded as `created_by` when the policy lets anonymous callers adjust.
const ANONYMOUS_ACTOR: &str = "anonymous";

/// Inventory service.
pub struct InventoryService {
    state: Arc<AppState>,
}

impl InventoryService {
    pub fn new(state: Arc<AppState>) -> Self {
        InventoryService { state }
    }

    // =========================================================================
    // Records
    // =========================================================================

    pub async fn list(&self, actor: Option<&Actor>) -> ApiResult<Vec<InventoryItem>> {
        self.state.authorize(actor, Operation::ListInventory)?;
        Ok(self.state.db.inventory().list().await?)
    }

    pub async fn get(&self, actor: Option<&Actor>, id: &str) -> ApiResult<InventoryItem> {
        self.state.authorize(actor, Operation::GetInventory)?;
        self.find(id).await
    }

    /// Records at or below their minimum level.
    pub async fn low_stock(&self, actor: Option<&Actor>) -> ApiResult<Vec<InventoryItem>> {
        self.state.authorize(actor, Operation::LowStock)?;
        Ok(self.state.db.inventory().low_stock().await?)
    }

    /// Starts tracking a menu item.
    ///
    /// ## Errors
    /// - `NOT_FOUND` when the menu item or supplier does not exist
    /// - `CONFLICT` when the menu item already has a record
    pub async fn create(&self, actor: Option<&Actor>, req: CreateInventoryRequest) -> ApiResult<InventoryItem> {
        self.state.authorize(actor, Operation::CreateInventory)?;

        let menu_item_id = checked_id(&req.menu_item_id)?;
        validate_stock_quantity(req.current_stock)?;
        validate_stock_levels(req.min_stock_level, req.max_stock_level)?;
        validate_price_cents("cost_price_cents", req.cost_price_cents)?;
        let unit = validate_name("unit", &req.unit)?;

        let menu_item = self
            .state
            .db
            .menu()
            .get_by_id(menu_item_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Menu item", menu_item_id))?;

        if self.state.db.inventory().get_by_menu_item(menu_item_id).await?.is_some() {
            return Err(already_tracked());
        }

        let supplier = match req.supplier_id.as_deref() {
            Some(id) => Some(self.find_supplier(id).await?),
            None => None,
        };

        let now = self.state.clock.now();
        let item = InventoryItem {
            id: new_id(),
            menu_item_id: menu_item.id,
            menu_item_name: menu_item.name,
            current_stock: req.current_stock,
            min_stock_level: req.min_stock_level,
            max_stock_level: req.max_stock_level,
            cost_price_cents: req.cost_price_cents,
            supplier_id: supplier.as_ref().map(|s| s.id.clone()),
            supplier_name: supplier.map(|s| s.name),
            unit,
            last_restocked: None,
            created_at: now,
            updated_at: now,
        };

        // The UNIQUE index catches a creator that raced past the check above.
        self.state.db.inventory().insert(&item).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => already_tracked(),
            other => ApiError::from(other),
        })?;

        info!(
            id = %item.id,
            menu_item = %item.menu_item_name,
            opening_stock = item.current_stock,
            "Inventory record created"
        );

        Ok(item)
    }

    /// Changes thresholds, cost, supplier or unit. Stock is left alone.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        id: &str,
        req: UpdateInventoryRequest,
    ) -> ApiResult<InventoryItem> {
        self.state.authorize(actor, Operation::UpdateInventory)?;
        let mut item = self.find(id).await?;

        if let Some(min) = req.min_stock_level {
            item.min_stock_level = min;
        }
        if let Some(max) = req.max_stock_level {
            item.max_stock_level = max;
        }
        validate_stock_levels(item.min_stock_level, item.max_stock_level)?;

        if let Some(cost) = req.cost_price_cents {
            validate_price_cents("cost_price_cents", cost)?;
            item.cost_price_cents = cost;
        }
        if let Some(unit) = req.unit {
            item.unit = validate_name("unit", &unit)?;
        }
        match req.supplier_id {
            Some(Some(supplier_id)) => {
                let supplier = self.find_supplier(&supplier_id).await?;
                item.supplier_id = Some(supplier.id);
                item.supplier_name = Some(supplier.name);
            }
            Some(None) => {
                item.supplier_id = None;
                item.supplier_name = None;
            }
            None => {}
        }

        item.updated_at = self.state.clock.now();
        self.state.db.inventory().update(&item).await?;
        info!(id = %item.id, "Inventory record updated");

        Ok(item)
    }

    /// Stops tracking a menu item. Its ledger history is kept.
    pub async fn delete(&self, actor: Option<&Actor>, id: &str) -> ApiResult<()> {
        self.state.authorize(actor, Operation::DeleteInventory)?;
        self.state.db.inventory().delete(checked_id(id)?).await?;
        info!(id = %id, "Inventory record deleted");
        Ok(())
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Applies a restock, waste or absolute adjustment.
    ///
    /// ## Errors
    /// - `NOT_FOUND` for an unknown record
    /// - `VALIDATION_ERROR` for a negative or overflowing quantity
    /// - `CONFLICT` when the stock level changed since it was read
    pub async fn adjust(
        &self,
        actor: Option<&Actor>,
        id: &str,
        req: AdjustStockRequest,
    ) -> ApiResult<StockAdjustmentResponse> {
        self.state.authorize(actor, Operation::AdjustStock)?;

        let record = self.find(id).await?;
        let movement = StockMovement {
            transaction_type: req.transaction_type,
            quantity: req.quantity,
            notes: normalize_optional("notes", req.notes, MAX_TEXT_LEN)?,
            actor: actor.map_or_else(|| ANONYMOUS_ACTOR.to_string(), |a| a.name.clone()),
        };

        let adjustment = adjust_stock(&record, movement, new_id(), self.state.clock.now())?;

        if let Err(e) = self.state.db.inventory().apply_adjustment(&adjustment).await {
            if matches!(e, DbError::ConcurrentModification { .. }) {
                warn!(id = %record.id, "Stock adjustment lost a race");
            }
            return Err(e.into());
        }

        info!(
            id = %record.id,
            kind = %adjustment.transaction.transaction_type,
            quantity = adjustment.transaction.quantity,
            previous = adjustment.transaction.previous_stock,
            new = adjustment.transaction.new_stock,
            "Stock adjusted"
        );

        Ok(adjustment.into())
    }

    /// Ledger entries for one record, newest first. Works for deleted records.
    pub async fn history(&self, actor: Option<&Actor>, id: &str) -> ApiResult<Vec<StockTransaction>> {
        self.state.authorize(actor, Operation::StockHistory)?;
        Ok(self.state.db.inventory().history(checked_id(id)?).await?)
    }

    /// Latest ledger entries across all records.
    pub async fn transactions(&self, actor: Option<&Actor>, limit: Option<u32>) -> ApiResult<Vec<StockTransaction>> {
        self.state.authorize(actor, Operation::ListStockTransactions)?;
        let limit = validate_limit(limit, DEFAULT_TRANSACTION_LIMIT, MAX_TRANSACTION_LIMIT)?;
        Ok(self.state.db.inventory().transactions(limit).await?)
    }

    async fn find(&self, id: &str) -> ApiResult<InventoryItem> {
        self.state
            .db
            .inventory()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Inventory item", id))
    }

    async fn find_supplier(&self, id: &str) -> ApiResult<Supplier> {
        self.state
            .db
            .suppliers()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier", id))
    }
}

fn already_tracked() -> ApiError {
    ApiError::conflict("Inventory already exists for this menu item")
}
