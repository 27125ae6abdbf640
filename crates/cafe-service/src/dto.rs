//! # Wire Contract
//!
//! Request and response bodies as a transport sees them. Field names are
//! snake_case; money is integer cents; discount and tax arrive as decimal
//! percents and become basis points during validation.
//!
//! ## Bill Request
//! ```json
//! {
//!   "items": [
//!     { "menu_item_id": "…", "name": "Latte", "unit_price_cents": 350, "quantity": 1,
//!       "modifiers": [{ "modifier_name": "Size", "option_name": "Large", "price_adjustment_cents": 50 }] }
//!   ],
//!   "discount_percent": 10,
//!   "tax_percent": 23,
//!   "customer_name": "Rita",
//!   "table_number": "T4",
//!   "currency": "EUR"
//! }
//! ```
//!
//! Update requests are partial: an absent field keeps its stored value.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use cafe_core::{
    InventoryItem, LineItem, MenuCategory, ModifierOption, Role, StockAdjustment, StockTransaction,
    TransactionType, UserProfile,
};

fn default_true() -> bool {
    true
}

fn default_min_stock() -> i64 {
    10
}

fn default_max_stock() -> i64 {
    100
}

fn default_unit() -> String {
    "units".to_string()
}

/// Tells "absent" (`None`) apart from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub price_cents: i64,
    pub category: MenuCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateMenuItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub category: Option<MenuCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Modifiers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateModifierRequest {
    pub name: String,
    pub options: Vec<ModifierOption>,
    /// Empty means every category.
    #[serde(default)]
    pub applies_to: Vec<MenuCategory>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateModifierRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<ModifierOption>>,
    #[serde(default)]
    pub applies_to: Option<Vec<MenuCategory>>,
    #[serde(default)]
    pub required: Option<bool>,
}

// =============================================================================
// Suppliers
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSupplierRequest {
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSupplierRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateInventoryRequest {
    pub menu_item_id: String,
    /// Opening balance; later changes go through the ledger.
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default = "default_min_stock")]
    pub min_stock_level: i64,
    #[serde(default = "default_max_stock")]
    pub max_stock_level: i64,
    #[serde(default)]
    pub cost_price_cents: i64,
    #[serde(default)]
    pub supplier_id: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl CreateInventoryRequest {
    /// A request with the default thresholds and unit.
    pub fn for_menu_item(menu_item_id: impl Into<String>) -> Self {
        CreateInventoryRequest {
            menu_item_id: menu_item_id.into(),
            current_stock: 0,
            min_stock_level: default_min_stock(),
            max_stock_level: default_max_stock(),
            cost_price_cents: 0,
            supplier_id: None,
            unit: default_unit(),
        }
    }
}

/// Changes everything about a record except its stock level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateInventoryRequest {
    #[serde(default)]
    pub min_stock_level: Option<i64>,
    #[serde(default)]
    pub max_stock_level: Option<i64>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    /// `null` detaches the supplier; absent keeps it.
    #[serde(default, deserialize_with = "double_option")]
    #[ts(type = "string | null")]
    pub supplier_id: Option<Option<String>>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdjustStockRequest {
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockAdjustmentResponse {
    pub inventory: InventoryItem,
    pub transaction: StockTransaction,
}

impl From<StockAdjustment> for StockAdjustmentResponse {
    fn from(adjustment: StockAdjustment) -> Self {
        StockAdjustmentResponse {
            inventory: adjustment.inventory,
            transaction: adjustment.transaction,
        }
    }
}

// =============================================================================
// Bills
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateBillRequest {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub discount_percent: f64,
    /// Falls back to the configured default tax.
    #[serde(default)]
    pub tax_percent: Option<f64>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default)]
    pub nif: Option<String>,
    /// Falls back to the configured default currency.
    #[serde(default)]
    pub currency: Option<String>,
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Only honoured for admin callers.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_request_defaults() {
        let req: CreateBillRequest = serde_json::from_str(
            r#"{ "items": [{ "menu_item_id": "m-1", "name": "Latte", "unit_price_cents": 350, "quantity": 1 }] }"#,
        )
        .unwrap();

        assert_eq!(req.discount_percent, 0.0);
        assert_eq!(req.tax_percent, None);
        assert!(req.items[0].modifiers.is_empty());
        assert_eq!(req.currency, None);
    }

    #[test]
    fn test_inventory_request_defaults() {
        let req: CreateInventoryRequest = serde_json::from_str(r#"{ "menu_item_id": "m-1" }"#).unwrap();
        assert_eq!(req, CreateInventoryRequest::for_menu_item("m-1"));
    }

    #[test]
    fn test_supplier_null_vs_absent() {
        let absent: UpdateInventoryRequest = serde_json::from_str(r#"{ "unit": "kg" }"#).unwrap();
        assert_eq!(absent.supplier_id, None);

        let cleared: UpdateInventoryRequest = serde_json::from_str(r#"{ "supplier_id": null }"#).unwrap();
        assert_eq!(cleared.supplier_id, Some(None));

        let set: UpdateInventoryRequest = serde_json::from_str(r#"{ "supplier_id": "s-1" }"#).unwrap();
        assert_eq!(set.supplier_id, Some(Some("s-1".to_string())));
    }

    #[test]
    fn test_adjust_request_wire_names() {
        let req: AdjustStockRequest =
            serde_json::from_str(r#"{ "transaction_type": "waste", "quantity": 5, "notes": "dropped tray" }"#)
                .unwrap();
        assert_eq!(req.transaction_type, TransactionType::Waste);
        assert_eq!(req.quantity, 5);
    }
}
