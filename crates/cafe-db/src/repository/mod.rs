//! # Repository Module
//!
//! Database repository implementations for the café back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Service operation                                                      │
//! │       │                                                                 │
//! │       │  db.inventory().apply_adjustment(&adjustment)                   │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── insert(&self, item)                                                │
//! │  ├── apply_adjustment(&self, adjustment)   ← one DB transaction         │
//! │  └── history(&self, inventory_id)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`menu::MenuRepository`] - Menu item CRUD
//! - [`modifier::ModifierRepository`] - Modifier CRUD (JSON option lists)
//! - [`bill::BillRepository`] - Bill numbering, insert, listing, search
//! - [`supplier::SupplierRepository`] - Supplier CRUD
//! - [`inventory::InventoryRepository`] - Stock records and the ledger
//! - [`user::UserRepository`] - Accounts
//! - [`settings::SettingsRepository`] - Store settings (theme)

pub mod bill;
pub mod inventory;
pub mod menu;
pub mod modifier;
pub mod settings;
pub mod supplier;
pub mod user;

/// Builds a case-insensitive `LIKE` pattern matching `query` anywhere,
/// escaping the wildcard characters. Use with `ESCAPE '\'`.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Generates a new entity id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::pool::{Database, DbConfig};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Ana"), "%ana%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
