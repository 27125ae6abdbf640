//! # Bill Service
//!
//! Turns a validated order into a stored, numbered, immutable bill.
//!
//! ## Creation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CreateBillRequest                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate lines, discount ∈ [0, 100], tax ≥ 0 (default from config)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compute_bill(items, discount, tax) ──► overflow? VALIDATION_ERROR      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BillRepository::create(|number| …)                                     │
//! │       │   BEGIN                                                         │
//! │       │   bump sequence ──► number stamped onto the totals              │
//! │       │   INSERT bill                                                   │
//! │       │   COMMIT                                                        │
//! │       ▼                                                                 │
//! │  Bill { bill_number: 1001, subtotal, discount, tax, total, … }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use crate::auth::Actor;
use crate::dto::CreateBillRequest;
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::checked_id;
use crate::AppState;
use cafe_core::validation::{
    normalize_optional, validate_discount_percent, validate_limit, validate_line_items, validate_search_query,
    validate_tax_percent, MAX_NAME_LEN,
};
use cafe_core::{compute_bill, Bill, BillTotals, FIRST_BILL_NUMBER};
use cafe_db::new_id;

/// Default page size for bill listings.
pub const DEFAULT_BILL_LIMIT: u32 = 100;

/// Largest page a bill listing returns.
pub const MAX_BILL_LIMIT: u32 = 500;

const MAX_TABLE_LEN: usize = 20;
const MAX_NIF_LEN: usize = 20;
const MAX_CURRENCY_LEN: usize = 10;

/// Bill service.
pub struct BillService {
    state: Arc<AppState>,
}

impl BillService {
    pub fn new(state: Arc<AppState>) -> Self {
        BillService { state }
    }

    /// Validates, prices, numbers and stores a bill.
    pub async fn create(&self, actor: Option<&Actor>, req: CreateBillRequest) -> ApiResult<Bill> {
        self.state.authorize(actor, Operation::CreateBill)?;

        validate_line_items(&req.items)?;
        let discount = validate_discount_percent(req.discount_percent)?;
        let tax = match req.tax_percent {
            Some(pct) => validate_tax_percent(pct)?,
            None => self.state.config.default_tax,
        };
        let customer_name = normalize_optional("customer_name", req.customer_name, MAX_NAME_LEN)?;
        let table_number = normalize_optional("table_number", req.table_number, MAX_TABLE_LEN)?;
        let nif = normalize_optional("nif", req.nif, MAX_NIF_LEN)?;
        let currency = normalize_optional("currency", req.currency, MAX_CURRENCY_LEN)?
            .unwrap_or_else(|| self.state.config.default_currency.clone());

        // Totals do not depend on the number, so an unpriceable bill is
        // rejected before it consumes one.
        let totals = compute_bill(&req.items, discount, tax, FIRST_BILL_NUMBER)?;

        let id = new_id();
        let created_at = self.state.clock.now();
        let items = req.items;

        let bill = self
            .state
            .db
            .bills()
            .create(move |bill_number| {
                let totals = BillTotals { bill_number, ..totals };
                Bill {
                    id,
                    bill_number: totals.bill_number,
                    items,
                    subtotal_cents: totals.subtotal.cents(),
                    discount_bps: discount.bps(),
                    discount_cents: totals.discount_amount.cents(),
                    tax_bps: tax.bps(),
                    tax_cents: totals.tax_amount.cents(),
                    total_cents: totals.total.cents(),
                    customer_name,
                    table_number,
                    nif,
                    currency,
                    created_at,
                }
            })
            .await?;

        info!(
            id = %bill.id,
            bill_number = bill.bill_number,
            lines = bill.items.len(),
            total = %bill.total(),
            "Bill created"
        );

        Ok(bill)
    }

    pub async fn get(&self, actor: Option<&Actor>, id: &str) -> ApiResult<Bill> {
        self.state.authorize(actor, Operation::GetBill)?;
        self.state
            .db
            .bills()
            .get_by_id(checked_id(id)?)
            .await?
            .ok_or_else(|| ApiError::not_found("Bill", id))
    }

    /// Newest bills first.
    pub async fn list(&self, actor: Option<&Actor>, limit: Option<u32>) -> ApiResult<Vec<Bill>> {
        self.state.authorize(actor, Operation::ListBills)?;
        let limit = validate_limit(limit, DEFAULT_BILL_LIMIT, MAX_BILL_LIMIT)?;
        Ok(self.state.db.bills().list_recent(limit).await?)
    }

    /// Case-insensitive substring match on customer name, table number or NIF.
    /// A blank query lists the newest bills.
    pub async fn search(&self, actor: Option<&Actor>, query: &str, limit: Option<u32>) -> ApiResult<Vec<Bill>> {
        self.state.authorize(actor, Operation::SearchBills)?;
        let query = validate_search_query(query)?;
        let limit = validate_limit(limit, DEFAULT_BILL_LIMIT, MAX_BILL_LIMIT)?;

        if query.is_empty() {
            return Ok(self.state.db.bills().list_recent(limit).await?);
        }
        Ok(self.state.db.bills().search(&query, limit).await?)
    }
}
