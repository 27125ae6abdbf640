mod common;

use std::collections::HashSet;

use cafe_service::ErrorCode;
use common::{bill_request, line, setup, with_modifier};

#[tokio::test]
async fn bill_totals_with_discount_and_tax() {
    let app = setup().await;

    let bill = app
        .bills()
        .create(
            None,
            bill_request(vec![line("Latte", 250, 2), line("Croissant", 300, 1)], 10.0, 23.0),
        )
        .await
        .unwrap();

    assert_eq!(bill.bill_number, 1001);
    assert_eq!(bill.subtotal_cents, 800);
    assert_eq!(bill.discount_cents, 80);
    assert_eq!(bill.taxable_amount().cents(), 720);
    assert_eq!(bill.tax_cents, 166);
    assert_eq!(bill.total_cents, 886);
    assert_eq!(bill.discount_bps, 1000);
    assert_eq!(bill.tax_bps, 2300);
    assert_eq!(bill.currency, "EUR");
}

#[tokio::test]
async fn modifier_adjustments_roll_into_price() {
    let app = setup().await;

    let latte = with_modifier(with_modifier(line("Latte", 350, 1), "Large", 50), "Oat milk", 150);
    let bill = app
        .bills()
        .create(None, bill_request(vec![latte], 0.0, 23.0))
        .await
        .unwrap();

    assert_eq!(bill.subtotal_cents, 550);
    assert_eq!(bill.tax_cents, 127);
    assert_eq!(bill.total_cents, 677);
}

#[tokio::test]
async fn numbers_start_at_1001_and_increase() {
    let app = setup().await;

    let first = app
        .bills()
        .create(None, bill_request(vec![line("Espresso", 350, 1)], 0.0, 5.0))
        .await
        .unwrap();
    let second = app
        .bills()
        .create(None, bill_request(vec![line("Espresso", 350, 1)], 0.0, 5.0))
        .await
        .unwrap();

    assert_eq!(first.bill_number, 1001);
    assert_eq!(second.bill_number, 1002);
}

#[tokio::test]
async fn concurrent_creators_get_distinct_numbers() {
    let app = setup().await;

    let mut tasks = vec![];
    for i in 0..10 {
        let bills = app.bills();
        tasks.push(tokio::spawn(async move {
            bills
                .create(None, bill_request(vec![line("Tea", 300, i + 1)], 0.0, 5.0))
                .await
                .map(|b| b.bill_number)
        }));
    }

    let mut numbers = HashSet::new();
    for task in tasks {
        numbers.insert(task.await.unwrap().unwrap());
    }

    assert_eq!(numbers, (1001..=1010).collect::<HashSet<i64>>());
}

#[tokio::test]
async fn configured_defaults_fill_gaps() {
    let app = setup().await;

    let mut req = bill_request(vec![line("Scone", 1000, 1)], 0.0, 0.0);
    req.tax_percent = None;
    req.currency = Some("  ".to_string());

    let bill = app.bills().create(None, req).await.unwrap();
    assert_eq!(bill.tax_bps, 2300);
    assert_eq!(bill.tax_cents, 230);
    assert_eq!(bill.currency, "EUR");
}

#[tokio::test]
async fn tax_above_100_percent_is_literal() {
    let app = setup().await;

    let bill = app
        .bills()
        .create(None, bill_request(vec![line("Wine", 1000, 1)], 0.0, 150.0))
        .await
        .unwrap();
    assert_eq!(bill.tax_cents, 1500);
    assert_eq!(bill.total_cents, 2500);
}

#[tokio::test]
async fn invalid_requests_rejected_without_consuming_numbers() {
    let app = setup().await;
    let bills = app.bills();

    let empty = bills.create(None, bill_request(vec![], 0.0, 5.0)).await.unwrap_err();
    assert_eq!(empty.code, ErrorCode::ValidationError);

    let discount = bills
        .create(None, bill_request(vec![line("Tea", 300, 1)], 120.0, 5.0))
        .await
        .unwrap_err();
    assert_eq!(discount.code, ErrorCode::ValidationError);

    let tax = bills
        .create(None, bill_request(vec![line("Tea", 300, 1)], 0.0, -1.0))
        .await
        .unwrap_err();
    assert_eq!(tax.code, ErrorCode::ValidationError);

    let quantity = bills
        .create(None, bill_request(vec![line("Tea", 300, 0)], 0.0, 5.0))
        .await
        .unwrap_err();
    assert_eq!(quantity.code, ErrorCode::ValidationError);

    let ok = bills
        .create(None, bill_request(vec![line("Tea", 300, 1)], 0.0, 5.0))
        .await
        .unwrap();
    assert_eq!(ok.bill_number, 1001);
}

#[tokio::test]
async fn unpriceable_bills_rejected_without_consuming_numbers() {
    let app = setup().await;
    let bills = app.bills();

    let line_overflow = bills
        .create(None, bill_request(vec![line("Gold", i64::MAX / 2, 3)], 0.0, 5.0))
        .await
        .unwrap_err();
    assert_eq!(line_overflow.code, ErrorCode::ValidationError);

    let modifier_overflow = bills
        .create(None, bill_request(vec![with_modifier(line("Gold", i64::MAX, 1), "Leaf", 1)], 0.0, 5.0))
        .await
        .unwrap_err();
    assert_eq!(modifier_overflow.code, ErrorCode::ValidationError);

    let tax_overflow = bills
        .create(None, bill_request(vec![line("Yacht", 10_000_000_000_000, 999)], 0.0, 40_000_000.0))
        .await
        .unwrap_err();
    assert_eq!(tax_overflow.code, ErrorCode::ValidationError);

    assert!(bills.list(None, None).await.unwrap().is_empty());
    let ok = bills
        .create(None, bill_request(vec![line("Tea", 300, 1)], 0.0, 5.0))
        .await
        .unwrap();
    assert_eq!(ok.bill_number, 1001);
}

#[tokio::test]
async fn stored_bill_reads_back_unchanged() {
    let app = setup().await;

    let mut req = bill_request(vec![with_modifier(line("Mocha", 550, 2), "Extra shot", 80)], 5.0, 23.0);
    req.customer_name = Some("Rita Sousa".to_string());
    req.table_number = Some("T4".to_string());
    req.nif = Some("123456789".to_string());

    let created = app.bills().create(None, req).await.unwrap();
    let fetched = app.bills().get(None, &created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_bill_is_not_found() {
    let app = setup().await;

    let err = app.bills().get(None, &cafe_db::new_id()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let err = app.bills().get(None, "1001").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn list_and_search_newest_first() {
    let app = setup().await;
    let bills = app.bills();

    for (customer, table) in [("Rita", "T1"), ("Rui", "T2"), ("Ana", "T3")] {
        let mut req = bill_request(vec![line("Tea", 300, 1)], 0.0, 5.0);
        req.customer_name = Some(customer.to_string());
        req.table_number = Some(table.to_string());
        bills.create(None, req).await.unwrap();
        app.clock.advance(chrono::Duration::minutes(5));
    }

    let recent = bills.list(None, Some(2)).await.unwrap();
    let customers: Vec<_> = recent.iter().filter_map(|b| b.customer_name.as_deref()).collect();
    assert_eq!(customers, vec!["Ana", "Rui"]);

    let found = bills.search(None, "r", None).await.unwrap();
    let customers: Vec<_> = found.iter().filter_map(|b| b.customer_name.as_deref()).collect();
    assert_eq!(customers, vec!["Rui", "Rita"]);

    let by_table = bills.search(None, "t3", None).await.unwrap();
    assert_eq!(by_table.len(), 1);
    assert_eq!(by_table[0].customer_name.as_deref(), Some("Ana"));

    assert_eq!(bills.search(None, "  ", None).await.unwrap().len(), 3);

    let err = bills.list(None, Some(0)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}
