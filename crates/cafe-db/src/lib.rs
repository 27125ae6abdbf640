//! # cafe-db: Database Layer for the Café Back Office
//!
//! This crate provides database access for the café back office.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Data Flow                                        │
//! │                                                                         │
//! │  cafe-service operation (create_bill, adjust_stock, ...)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     cafe-db (THIS CRATE)                        │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │    │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │   │    │
//! │  │   │               │    │ MenuRepo       │    │              │   │    │
//! │  │   │ SqlitePool    │◄───│ BillRepo       │    │ 001_initial_ │   │    │
//! │  │   │ WAL, FKs on   │    │ InventoryRepo  │    │   schema.sql │   │    │
//! │  │   │               │    │ SettingsRepo   │    │ 002_settings │   │    │
//! │  │   │               │    │ UserRepo ...   │    │              │   │    │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘   │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (path from configuration)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cafe.db")).await?;
//! let low = db.inventory().low_stock().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::new_id;

pub use repository::bill::BillRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::menu::MenuRepository;
pub use repository::modifier::ModifierRepository;
pub use repository::settings::SettingsRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;
