//! # Access Policy
//!
//! Decides who may call which operation.
//!
//! ## Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation ──► Requirement                                              │
//! │                                                                         │
//! │  public            anyone, token or not                                 │
//! │  authenticated     any valid, active account                            │
//! │  role(min)         account whose role ranks >= min                      │
//! │                    staff (1) < manager (2) < admin (3)                  │
//! │                                                                         │
//! │  authorize(actor, op):                                                  │
//! │    Public                          ──► Ok                               │
//! │    no actor                        ──► UNAUTHORIZED                     │
//! │    Role(min), actor.role < min     ──► FORBIDDEN                        │
//! │    otherwise                       ──► Ok                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Defaults come from [`Operation::default_requirement`]. Deployments can
//! override single entries with a JSON object keyed by operation name:
//!
//! ```json
//! { "create_bill": "authenticated", "delete_supplier": { "role": "admin" } }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::Actor;
use crate::error::{ApiError, ApiResult};
use cafe_core::Role;

// =============================================================================
// Operations
// =============================================================================

/// Every guarded operation the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    // Menu
    ListMenu,
    GetMenuItem,
    ListCategories,
    CreateMenuItem,
    UpdateMenuItem,
    DeleteMenuItem,

    // Modifiers
    ListModifiers,
    GetModifier,
    CreateModifier,
    UpdateModifier,
    DeleteModifier,

    // Suppliers
    ListSuppliers,
    GetSupplier,
    CreateSupplier,
    UpdateSupplier,
    DeleteSupplier,

    // Inventory and ledger
    ListInventory,
    GetInventory,
    LowStock,
    StockHistory,
    ListStockTransactions,
    CreateInventory,
    UpdateInventory,
    AdjustStock,
    DeleteInventory,

    // Bills
    CreateBill,
    GetBill,
    ListBills,
    SearchBills,

    // Reports
    DailyReport,
    RangeReport,

    // Settings
    GetTheme,
    UpdateTheme,
    ResetTheme,

    // Accounts
    Register,
    Login,
    Me,
    ListUsers,
    DeactivateUser,
}

impl Operation {
    pub const ALL: [Operation; 39] = [
        Operation::ListMenu,
        Operation::GetMenuItem,
        Operation::ListCategories,
        Operation::CreateMenuItem,
        Operation::UpdateMenuItem,
        Operation::DeleteMenuItem,
        Operation::ListModifiers,
        Operation::GetModifier,
        Operation::CreateModifier,
        Operation::UpdateModifier,
        Operation::DeleteModifier,
        Operation::ListSuppliers,
        Operation::GetSupplier,
        Operation::CreateSupplier,
        Operation::UpdateSupplier,
        Operation::DeleteSupplier,
        Operation::ListInventory,
        Operation::GetInventory,
        Operation::LowStock,
        Operation::StockHistory,
        Operation::ListStockTransactions,
        Operation::CreateInventory,
        Operation::UpdateInventory,
        Operation::AdjustStock,
        Operation::DeleteInventory,
        Operation::CreateBill,
        Operation::GetBill,
        Operation::ListBills,
        Operation::SearchBills,
        Operation::DailyReport,
        Operation::RangeReport,
        Operation::GetTheme,
        Operation::UpdateTheme,
        Operation::ResetTheme,
        Operation::Register,
        Operation::Login,
        Operation::Me,
        Operation::ListUsers,
        Operation::DeactivateUser,
    ];

    /// Requirement used when configuration does not override the entry.
    pub const fn default_requirement(&self) -> Requirement {
        use Operation::*;

        match self {
            ListMenu | GetMenuItem | ListCategories | ListModifiers | GetModifier | ListSuppliers
            | GetSupplier | ListInventory | GetInventory | LowStock | StockHistory
            | ListStockTransactions | CreateBill | GetBill | ListBills | SearchBills | DailyReport
            | RangeReport | GetTheme | Register | Login => Requirement::Public,

            Me => Requirement::Authenticated,

            CreateMenuItem | UpdateMenuItem | DeleteMenuItem | CreateModifier | UpdateModifier
            | DeleteModifier | CreateSupplier | UpdateSupplier | DeleteSupplier | CreateInventory
            | UpdateInventory | AdjustStock => Requirement::Role(Role::Staff),

            DeleteInventory | UpdateTheme | ResetTheme => Requirement::Role(Role::Manager),

            ListUsers | DeactivateUser => Requirement::Role(Role::Admin),
        }
    }
}

/// What a caller must present to run an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Public,
    Authenticated,
    Role(Role),
}

// =============================================================================
// Policy
// =============================================================================

/// The operation table with any configured overrides applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    overrides: HashMap<Operation, Requirement>,
}

impl AccessPolicy {
    /// The built-in table.
    pub fn defaults() -> Self {
        AccessPolicy::default()
    }

    /// Parses a JSON object of overrides on top of the defaults.
    pub fn from_overrides_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: HashMap<Operation, Requirement> = serde_json::from_str(json)?;
        Ok(AccessPolicy { overrides })
    }

    /// Replaces a single entry.
    pub fn with(mut self, operation: Operation, requirement: Requirement) -> Self {
        self.overrides.insert(operation, requirement);
        self
    }

    pub fn requirement(&self, operation: Operation) -> Requirement {
        self.overrides
            .get(&operation)
            .copied()
            .unwrap_or_else(|| operation.default_requirement())
    }

    /// Checks the caller against the table.
    ///
    /// ## Errors
    /// - `UNAUTHORIZED` when the operation needs an account and none was given
    /// - `FORBIDDEN` when the account's role ranks too low
    pub fn authorize(&self, actor: Option<&Actor>, operation: Operation) -> ApiResult<()> {
        let min_role = match self.requirement(operation) {
            Requirement::Public => return Ok(()),
            Requirement::Authenticated => None,
            Requirement::Role(role) => Some(role),
        };

        let actor = actor.ok_or_else(|| {
            warn!(?operation, "Rejected anonymous call");
            ApiError::unauthorized("Not authenticated")
        })?;

        match min_role {
            Some(min) if !actor.role.at_least(min) => {
                warn!(
                    ?operation,
                    user_id = %actor.user_id,
                    role = %actor.role,
                    required = %min,
                    "Rejected call for insufficient role"
                );
                Err(ApiError::forbidden(format!("Requires {} role", min)))
            }
            _ => Ok(()),
        }
    }
}
