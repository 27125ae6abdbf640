//! Service operations.
//!
//! One service per resource, each holding the shared [`AppState`]. Every
//! public operation starts with the policy check for its [`Operation`].
//!
//! [`AppState`]: crate::AppState
//! [`Operation`]: crate::policy::Operation

pub mod bill_service;
pub mod config_service;
pub mod inventory_service;
pub mod menu_service;
pub mod modifier_service;
pub mod report_service;
pub mod supplier_service;
pub mod user_service;

pub use bill_service::BillService;
pub use config_service::ConfigService;
pub use inventory_service::InventoryService;
pub use menu_service::MenuService;
pub use modifier_service::ModifierService;
pub use report_service::ReportService;
pub use supplier_service::SupplierService;
pub use user_service::UserService;

use cafe_core::validation::validate_uuid;

use crate::error::ApiResult;

/// Longest free-text note or description accepted.
pub(crate) const MAX_TEXT_LEN: usize = 1000;

/// Rejects ids that could never have been issued.
pub(crate) fn checked_id(id: &str) -> ApiResult<&str> {
    validate_uuid(id)?;
    Ok(id)
}
