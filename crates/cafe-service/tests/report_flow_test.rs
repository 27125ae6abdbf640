mod common;

use chrono::NaiveDate;

use cafe_service::ErrorCode;
use common::{at, bill_request, line, setup, with_modifier, TestApp};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

async fn sell(app: &TestApp, day: u32, hour: u32, items: Vec<cafe_core::LineItem>) {
    app.clock.set(at(day, hour));
    app.bills().create(None, bill_request(items, 0.0, 0.0)).await.unwrap();
}

#[tokio::test]
async fn empty_day_reports_zeroes() {
    let app = setup().await;

    let report = app.reports().daily(None, "2025-03-01").await.unwrap();
    assert_eq!(report.total_bills, 0);
    assert_eq!(report.total_revenue_cents, 0);
    assert_eq!(report.avg_bill_value_cents, 0);
    assert!(report.top_items.is_empty());
}

#[tokio::test]
async fn daily_report_counts_only_that_day() {
    let app = setup().await;
    sell(&app, 1, 10, vec![line("Latte", 450, 2)]).await;
    sell(&app, 1, 23, vec![line("Espresso", 350, 1), line("Latte", 450, 1)]).await;
    sell(&app, 2, 0, vec![line("Espresso", 350, 5)]).await;

    let report = app.reports().daily(None, "2025-03-01").await.unwrap();
    assert_eq!(report.total_bills, 2);
    assert_eq!(report.total_revenue_cents, 900 + 800);
    assert_eq!(report.total_items_sold, 4);
    assert_eq!(report.avg_bill_value_cents, 850);

    assert_eq!(report.top_items[0].name, "Latte");
    assert_eq!(report.top_items[0].quantity, 3);
    assert_eq!(report.top_items[0].revenue_cents, 1350);
    assert_eq!(report.top_items[1].name, "Espresso");
}

#[tokio::test]
async fn top_item_revenue_uses_effective_price() {
    let app = setup().await;
    sell(&app, 1, 12, vec![with_modifier(line("Latte", 450, 2), "Oat milk", 50)]).await;

    let report = app.reports().daily(None, "2025-03-01").await.unwrap();
    assert_eq!(report.top_items[0].revenue_cents, 1000);
}

#[tokio::test]
async fn range_report_breaks_down_every_day() {
    let app = setup().await;
    sell(&app, 1, 9, vec![line("Tea", 300, 1)]).await;
    sell(&app, 3, 9, vec![line("Tea", 300, 2)]).await;
    sell(&app, 3, 18, vec![line("Scone", 250, 1)]).await;

    let report = app.reports().range(None, "2025-03-01", "2025-03-03").await.unwrap();
    assert_eq!(report.start_date, day(1));
    assert_eq!(report.end_date, day(3));
    assert_eq!(report.total_bills, 3);
    assert_eq!(report.total_revenue_cents, 300 + 600 + 250);

    let breakdown: Vec<_> = report
        .daily_breakdown
        .iter()
        .map(|d| (d.date, d.bills, d.revenue_cents))
        .collect();
    assert_eq!(breakdown, vec![(day(1), 1, 300), (day(2), 0, 0), (day(3), 2, 850)]);
}

#[tokio::test]
async fn bad_dates_rejected() {
    let app = setup().await;
    let reports = app.reports();

    let err = reports.daily(None, "01/03/2025").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = reports.range(None, "2025-03-05", "2025-03-01").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = reports.range(None, "2024-01-01", "2025-03-01").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}
