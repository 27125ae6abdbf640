//! # Sales Reporting
//!
//! Aggregates stored bills into daily and date-range summaries.
//!
//! ## Aggregation
//! ```text
//! bills in [start 00:00, end+1 00:00)  (UTC)
//!      │
//!      ├──► total_bills       = count
//!      ├──► total_revenue     = Σ bill.total
//!      ├──► total_items_sold  = Σ line.quantity
//!      ├──► avg_bill_value    = revenue / bills (0 when none)
//!      ├──► top_items         = group by line name, rank by quantity,
//!      │                        ties in first-seen order, keep 10
//!      └──► daily_breakdown   = one row per calendar day, zero days included
//! ```
//!
//! The window functions turn calendar dates into half-open UTC timestamp
//! ranges; the store filters with them and hands the bills back here.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Bill;

/// How many best sellers a report lists.
pub const TOP_ITEMS_LIMIT: usize = 10;

/// Longest range a single report may cover, in days.
pub const MAX_REPORT_DAYS: i64 = 366;

// =============================================================================
// Report Types
// =============================================================================

/// One best-selling line name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopItem {
    pub name: String,
    pub quantity: i64,
    /// Effective price × quantity, before bill-level discount and tax.
    pub revenue_cents: i64,
}

/// Bills and revenue for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyBreakdown {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub bills: i64,
    pub revenue_cents: i64,
}

/// A sales summary over an inclusive date range. A daily report is a range
/// whose start and end coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub total_bills: i64,
    pub total_revenue_cents: i64,
    pub total_items_sold: i64,
    pub avg_bill_value_cents: i64,
    pub top_items: Vec<TopItem>,
    pub daily_breakdown: Vec<DailyBreakdown>,
}

// =============================================================================
// Date Windows
// =============================================================================

/// Parses a `YYYY-MM-DD` report date.
pub fn parse_report_date(field: &str, value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        })
    })
}

/// Converts an inclusive date range into a half-open UTC window
/// `[start 00:00, day after end 00:00)`.
///
/// ## Errors
/// - `InvalidDateRange` when `end` is before `start` or has no successor
/// - `Validation` when the range spans more than [`MAX_REPORT_DAYS`]
pub fn report_window(start: NaiveDate, end: NaiveDate) -> CoreResult<(DateTime<Utc>, DateTime<Utc>)> {
    if end < start {
        return Err(CoreError::InvalidDateRange { start, end });
    }

    if (end - start).num_days() + 1 > MAX_REPORT_DAYS {
        return Err(CoreError::Validation(ValidationError::OutOfRange {
            field: "date range (days)".to_string(),
            min: 1,
            max: MAX_REPORT_DAYS,
        }));
    }

    let after_end = end
        .checked_add_days(Days::new(1))
        .ok_or(CoreError::InvalidDateRange { start, end })?;

    Ok((
        start.and_time(NaiveTime::MIN).and_utc(),
        after_end.and_time(NaiveTime::MIN).and_utc(),
    ))
}

// =============================================================================
// Aggregation
// =============================================================================

/// Summarizes bills that fall inside `[start, end]`.
///
/// Bills are expected to be pre-filtered by [`report_window`]; any bill whose
/// creation day lies outside the range still counts towards the totals but is
/// left out of the daily breakdown.
pub fn summarize(bills: &[Bill], start: NaiveDate, end: NaiveDate) -> SalesReport {
    let total_revenue: Money = bills.iter().map(Bill::total).sum();
    let total_items_sold: i64 = bills.iter().map(Bill::item_count).sum();
    let total_bills = bills.len() as i64;

    SalesReport {
        start_date: start,
        end_date: end,
        total_bills,
        total_revenue_cents: total_revenue.cents(),
        total_items_sold,
        avg_bill_value_cents: total_revenue.average_over(bills.len() as u64).cents(),
        top_items: top_items(bills),
        daily_breakdown: daily_breakdown(bills, start, end),
    }
}

/// Ranks line names by units sold.
fn top_items(bills: &[Bill]) -> Vec<TopItem> {
    let mut ranked: Vec<TopItem> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in bills.iter().flat_map(|b| b.items.iter()) {
        let slot = *index.entry(item.name.as_str()).or_insert_with(|| {
            ranked.push(TopItem {
                name: item.name.clone(),
                quantity: 0,
                revenue_cents: 0,
            });
            ranked.len() - 1
        });
        ranked[slot].quantity += item.quantity;
        ranked[slot].revenue_cents = ranked[slot].revenue_cents.saturating_add(item.line_total().cents());
    }

    // sort_by is stable: equal quantities keep first-seen order
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(TOP_ITEMS_LIMIT);
    ranked
}

fn daily_breakdown(bills: &[Bill], start: NaiveDate, end: NaiveDate) -> Vec<DailyBreakdown> {
    let mut days: Vec<DailyBreakdown> = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| DailyBreakdown {
            date,
            bills: 0,
            revenue_cents: 0,
        })
        .collect();

    for bill in bills {
        let offset = (bill.created_at.date_naive() - start).num_days();
        if let Some(day) = usize::try_from(offset).ok().and_then(|i| days.get_mut(i)) {
            day.bills += 1;
            day.revenue_cents = day.revenue_cents.saturating_add(bill.total_cents);
        }
    }

    days
}

// =============================================================================
// Unit Tests
// =============================================================================
