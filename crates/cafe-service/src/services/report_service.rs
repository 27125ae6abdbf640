//! Report service implementation.
//!
//! Sales reports over stored bills. Dates are `YYYY-MM-DD` and interpreted
//! as UTC calendar days; a range includes both ends.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::auth::Actor;
use crate::error::ApiResult;
use crate::policy::Operation;
use crate::AppState;
use cafe_core::report::{parse_report_date, report_window, summarize};
use cafe_core::SalesReport;

/// Report service.
pub struct ReportService {
    state: Arc<AppState>,
}

impl ReportService {
    pub fn new(state: Arc<AppState>) -> Self {
        ReportService { state }
    }

    /// Report for a single day.
    pub async fn daily(&self, actor: Option<&Actor>, date: &str) -> ApiResult<SalesReport> {
        self.state.authorize(actor, Operation::DailyReport)?;
        let date = parse_report_date("date", date)?;
        self.build(date, date).await
    }

    /// Report for `[start_date, end_date]` with one breakdown row per day.
    pub async fn range(&self, actor: Option<&Actor>, start_date: &str, end_date: &str) -> ApiResult<SalesReport> {
        self.state.authorize(actor, Operation::RangeReport)?;
        let start = parse_report_date("start_date", start_date)?;
        let end = parse_report_date("end_date", end_date)?;
        self.build(start, end).await
    }

    async fn build(&self, start: NaiveDate, end: NaiveDate) -> ApiResult<SalesReport> {
        let (from, to) = report_window(start, end)?;
        let bills = self.state.db.bills().list_between(from, to).await?;
        debug!(%start, %end, bills = bills.len(), "Summarizing bills");
        Ok(summarize(&bills, start, end))
    }
}
