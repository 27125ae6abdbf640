//! # cafe-core: Pure Business Logic for the Café Back Office
//!
//! This crate holds the calculations every other layer relies on, written as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Café Back Office                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │              Transport (HTTP / IPC, not in this repo)           │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    cafe-service                                 │    │
//! │  │    auth, access policy, request validation, operations          │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ cafe-core (THIS CRATE) ★                        │    │
//! │  │                                                                 │    │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │    │
//! │  │   │  types  │ │  money  │ │ billing │ │ ledger  │ │  report  │  │    │
//! │  │   │MenuItem │ │  Money  │ │compute_ │ │ adjust_ │ │summarize │  │    │
//! │  │   │  Bill   │ │ Percent │ │  bill   │ │  stock  │ │  top 10  │  │    │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    cafe-db (Database Layer)                     │    │
//! │  │              SQLite queries, migrations, repositories           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, Bill, InventoryItem, etc.)
//! - [`money`] - Money in cents and Percent in basis points
//! - [`billing`] - The bill calculator
//! - [`ledger`] - Stock ledger transitions
//! - [`report`] - Daily and range sales aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cafe_core::money::{Money, Percent};
//!
//! let taxable = Money::from_cents(720);
//! let tax = taxable.percentage(Percent::from_bps(2300)); // 23%
//! assert_eq!(tax.cents(), 166); // 1.656 rounds to 1.66
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{compute_bill, BillTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{adjust_stock, StockAdjustment, StockMovement};
pub use money::{Money, Percent};
pub use report::{SalesReport, TopItem};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number given to the first bill ever created.
pub const FIRST_BILL_NUMBER: i64 = 1001;

/// Maximum lines allowed on a single bill.
///
/// ## Business Reason
/// Prevents runaway orders and keeps the stored JSON row small.
pub const MAX_BILL_ITEMS: usize = 100;

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Catches fat-finger entries (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
