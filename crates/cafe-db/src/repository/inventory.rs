//! # Inventory Repository
//!
//! Stock records and the append-only stock ledger.
//!
//! ## Ledger Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cafe_core::adjust_stock(record, movement) ──► StockAdjustment          │
//! │                                                      │                  │
//! │  apply_adjustment(&adjustment)                       ▼                  │
//! │  ┌───────────────────────────────────────────────────────────────────┐  │
//! │  │ BEGIN                                                             │  │
//! │  │   INSERT INTO stock_transactions (...)                            │  │
//! │  │   UPDATE inventory SET current_stock = new                        │  │
//! │  │     WHERE id = ? AND current_stock = previous   ◄── optimistic    │  │
//! │  │   0 rows? ──► ROLLBACK, ConcurrentModification                    │  │
//! │  │ COMMIT                                                            │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `current_stock` is only ever written by [`InventoryRepository::insert`]
//! (initial level) and [`InventoryRepository::apply_adjustment`]. The general
//! [`InventoryRepository::update`] leaves it alone.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use cafe_core::{InventoryItem, StockAdjustment, StockTransaction};

const SELECT_INVENTORY: &str = r#"
    SELECT id, menu_item_id, menu_item_name, current_stock, min_stock_level,
           max_stock_level, cost_price_cents, supplier_id, supplier_name, unit,
           last_restocked, created_at, updated_at
    FROM inventory
"#;

const SELECT_TRANSACTION: &str = r#"
    SELECT id, inventory_id, menu_item_name, transaction_type, quantity,
           previous_stock, new_stock, cost_per_unit_cents, total_cost_cents,
           notes, created_by, created_at
    FROM stock_transactions
"#;

/// Repository for inventory and stock ledger operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Lists every record alphabetically by menu item name.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_INVENTORY} ORDER BY menu_item_name"))
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_INVENTORY} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn get_by_menu_item(&self, menu_item_id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!("{SELECT_INVENTORY} WHERE menu_item_id = ?1"))
            .bind(menu_item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Records at or below their reorder threshold, emptiest first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "{SELECT_INVENTORY} WHERE current_stock <= min_stock_level ORDER BY current_stock, menu_item_name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new record.
    ///
    /// ## Errors
    /// - `UniqueViolation` when the menu item is already tracked
    /// - `ForeignKeyViolation` when the menu item or supplier is missing
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, menu_item_id = %item.menu_item_id, "Inserting inventory record");

        sqlx::query(
            r#"
            INSERT INTO inventory (
                id, menu_item_id, menu_item_name, current_stock,
                min_stock_level, max_stock_level, cost_price_cents,
                supplier_id, supplier_name, unit, last_restocked,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&item.id)
        .bind(&item.menu_item_id)
        .bind(&item.menu_item_name)
        .bind(item.current_stock)
        .bind(item.min_stock_level)
        .bind(item.max_stock_level)
        .bind(item.cost_price_cents)
        .bind(&item.supplier_id)
        .bind(&item.supplier_name)
        .bind(&item.unit)
        .bind(item.last_restocked)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: item.menu_item_id.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Writes thresholds, cost, supplier and unit. Never touches stock.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, "Updating inventory record");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                min_stock_level = ?2,
                max_stock_level = ?3,
                cost_price_cents = ?4,
                supplier_id = ?5,
                supplier_name = ?6,
                unit = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(item.min_stock_level)
        .bind(item.max_stock_level)
        .bind(item.cost_price_cents)
        .bind(&item.supplier_id)
        .bind(&item.supplier_name)
        .bind(&item.unit)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", &item.id));
        }

        Ok(())
    }

    /// Deletes a record. Its ledger entries are kept.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting inventory record");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Persists a computed stock adjustment atomically.
    ///
    /// ## Errors
    /// - `ConcurrentModification` when the stored stock no longer equals the
    ///   transaction's `previous_stock` (or the record vanished). Nothing is
    ///   written in that case.
    pub async fn apply_adjustment(&self, adjustment: &StockAdjustment) -> DbResult<()> {
        let tx_row = &adjustment.transaction;
        let record = &adjustment.inventory;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO stock_transactions (
                id, inventory_id, menu_item_name, transaction_type, quantity,
                previous_stock, new_stock, cost_per_unit_cents, total_cost_cents,
                notes, created_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&tx_row.id)
        .bind(&tx_row.inventory_id)
        .bind(&tx_row.menu_item_name)
        .bind(tx_row.transaction_type)
        .bind(tx_row.quantity)
        .bind(tx_row.previous_stock)
        .bind(tx_row.new_stock)
        .bind(tx_row.cost_per_unit_cents)
        .bind(tx_row.total_cost_cents)
        .bind(&tx_row.notes)
        .bind(&tx_row.created_by)
        .bind(tx_row.created_at)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                current_stock = ?2,
                last_restocked = ?3,
                updated_at = ?4
            WHERE id = ?1 AND current_stock = ?5
            "#,
        )
        .bind(&record.id)
        .bind(record.current_stock)
        .bind(record.last_restocked)
        .bind(record.updated_at)
        .bind(tx_row.previous_stock)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!(
                inventory_id = %record.id,
                expected_stock = tx_row.previous_stock,
                "Stock changed underneath adjustment, rolling back"
            );
            tx.rollback().await?;
            return Err(DbError::concurrent("Inventory item", &record.id));
        }

        tx.commit().await?;

        info!(
            inventory_id = %record.id,
            kind = %tx_row.transaction_type,
            previous_stock = tx_row.previous_stock,
            new_stock = tx_row.new_stock,
            "Stock adjusted"
        );
        Ok(())
    }

    /// Ledger entries for one record, newest first.
    pub async fn history(&self, inventory_id: &str) -> DbResult<Vec<StockTransaction>> {
        let entries = sqlx::query_as::<_, StockTransaction>(&format!(
            "{SELECT_TRANSACTION} WHERE inventory_id = ?1 ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(inventory_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Ledger entries across all records, newest first.
    pub async fn transactions(&self, limit: u32) -> DbResult<Vec<StockTransaction>> {
        let entries = sqlx::query_as::<_, StockTransaction>(&format!(
            "{SELECT_TRANSACTION} ORDER BY created_at DESC, rowid DESC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
