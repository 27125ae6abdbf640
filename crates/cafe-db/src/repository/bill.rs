//! # Bill Repository
//!
//! Database operations for bills, including bill-number allocation.
//!
//! ## Bill Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  INSERT INTO sequences ('bill_number', 1001)                            │
//! │    ON CONFLICT DO UPDATE SET value = value + 1                          │
//! │    RETURNING value                       ──► 1001, 1002, ...            │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  build(number) ──► Bill (totals computed by the caller)                 │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  INSERT INTO bills (... bill_number UNIQUE ...)                         │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT   (any failure rolls back the counter bump too)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The counter bump is one statement and SQLite admits a single writer, so
//! two creators can never read the same value.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::contains_pattern;
use cafe_core::{Bill, LineItem, FIRST_BILL_NUMBER};

/// Name of the bill counter row in `sequences`.
const BILL_SEQUENCE: &str = "bill_number";

/// Row shape of the `bills` table.
#[derive(Debug, sqlx::FromRow)]
struct BillRecord {
    id: String,
    bill_number: i64,
    items: String,
    subtotal_cents: i64,
    discount_bps: i64,
    discount_cents: i64,
    tax_bps: i64,
    tax_cents: i64,
    total_cents: i64,
    customer_name: Option<String>,
    table_number: Option<String>,
    nif: Option<String>,
    currency: String,
    created_at: DateTime<Utc>,
}

fn bps_from_column(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::Serialization(format!("{column} out of range: {value}")))
}

impl TryFrom<BillRecord> for Bill {
    type Error = DbError;

    fn try_from(record: BillRecord) -> DbResult<Self> {
        let items: Vec<LineItem> = serde_json::from_str(&record.items)?;
        Ok(Bill {
            id: record.id,
            bill_number: record.bill_number,
            items,
            subtotal_cents: record.subtotal_cents,
            discount_bps: bps_from_column("discount_bps", record.discount_bps)?,
            discount_cents: record.discount_cents,
            tax_bps: bps_from_column("tax_bps", record.tax_bps)?,
            tax_cents: record.tax_cents,
            total_cents: record.total_cents,
            customer_name: record.customer_name,
            table_number: record.table_number,
            nif: record.nif,
            currency: record.currency,
            created_at: record.created_at,
        })
    }
}

const SELECT_BILL: &str = r#"
    SELECT id, bill_number, items, subtotal_cents, discount_bps, discount_cents,
           tax_bps, tax_cents, total_cents, customer_name, table_number, nif,
           currency, created_at
    FROM bills
"#;

/// Bumps and returns the bill counter on the given connection.
async fn next_bill_number(conn: &mut SqliteConnection) -> DbResult<i64> {
    let number: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO sequences (name, value) VALUES (?1, ?2)
        ON CONFLICT (name) DO UPDATE SET value = value + 1
        RETURNING value
        "#,
    )
    .bind(BILL_SEQUENCE)
    .bind(FIRST_BILL_NUMBER)
    .fetch_one(conn)
    .await?;

    Ok(number)
}

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Allocates the next bill number, builds the bill with it and stores it,
    /// all in one transaction.
    ///
    /// ## Arguments
    /// * `build` - Turns the allocated number into the finished bill
    pub async fn create<F>(&self, build: F) -> DbResult<Bill>
    where
        F: FnOnce(i64) -> Bill,
    {
        let mut tx = self.pool.begin().await?;

        let number = next_bill_number(&mut tx).await?;
        let bill = build(number);
        debug!(id = %bill.id, bill_number = bill.bill_number, "Inserting bill");

        sqlx::query(
            r#"
            INSERT INTO bills (
                id, bill_number, items,
                subtotal_cents, discount_bps, discount_cents,
                tax_bps, tax_cents, total_cents,
                customer_name, table_number, nif, currency, created_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12, ?13, ?14
            )
            "#,
        )
        .bind(&bill.id)
        .bind(bill.bill_number)
        .bind(serde_json::to_string(&bill.items)?)
        .bind(bill.subtotal_cents)
        .bind(i64::from(bill.discount_bps))
        .bind(bill.discount_cents)
        .bind(i64::from(bill.tax_bps))
        .bind(bill.tax_cents)
        .bind(bill.total_cents)
        .bind(&bill.customer_name)
        .bind(&bill.table_number)
        .bind(&bill.nif)
        .bind(&bill.currency)
        .bind(bill.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(id = %bill.id, bill_number = bill.bill_number, total_cents = bill.total_cents, "Bill stored");
        Ok(bill)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let record = sqlx::query_as::<_, BillRecord>(&format!("{SELECT_BILL} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(Bill::try_from).transpose()
    }

    /// Most recent bills first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Bill>> {
        let records = sqlx::query_as::<_, BillRecord>(&format!(
            "{SELECT_BILL} ORDER BY created_at DESC, bill_number DESC LIMIT ?1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Bill::try_from).collect()
    }

    /// Case-insensitive substring search over customer name, table number
    /// and NIF, most recent first.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Bill>> {
        debug!(query = %query, limit, "Searching bills");

        let pattern = contains_pattern(query);
        let records = sqlx::query_as::<_, BillRecord>(&format!(
            r#"{SELECT_BILL}
            WHERE lower(coalesce(customer_name, '')) LIKE ?1 ESCAPE '\'
               OR lower(coalesce(table_number, '')) LIKE ?1 ESCAPE '\'
               OR lower(coalesce(nif, '')) LIKE ?1 ESCAPE '\'
            ORDER BY created_at DESC, bill_number DESC
            LIMIT ?2"#
        ))
        .bind(pattern)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Bill::try_from).collect()
    }

    /// Bills created in `[from, to)`, oldest first.
    pub async fn list_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<Bill>> {
        debug!(%from, %to, "Loading bills for report");

        let records = sqlx::query_as::<_, BillRecord>(&format!(
            "{SELECT_BILL} WHERE created_at >= ?1 AND created_at < ?2 ORDER BY created_at, bill_number"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(Bill::try_from).collect()
    }
}
