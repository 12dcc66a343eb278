//! The `Repository`: typed database operations over the shared pool.
//!
//! Methods live in submodules by area: `users` (accounts and per-tenant
//! settings), `purchases` (purchase ledger), and `sales` (sale ledger plus
//! the stock-checked insert). Shared row parsing stays here.

mod purchases;
mod sales;
mod users;

use crate::domain::{Money, PaymentMethod, PurchaseEntry, SaleEntry};
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tokio::sync::Mutex;
use tracing::warn;

pub use sales::SaleOutcome;

/// Account row including the stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub eggs_per_crate: i64,
    pub crates_per_box: i64,
    pub created_at: i64,
}

/// Repository for database operations.
///
/// `stock_lock` serializes stock-affecting writes so the sale stock check
/// and the insert happen against the same stock figure.
pub struct Repository {
    pool: SqlitePool,
    stock_lock: Mutex<()>,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository {
            pool,
            stock_lock: Mutex::new(()),
        }
    }

    /// Round-trip a trivial query, used by the readiness probe.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Current wall-clock time as epoch milliseconds, for `created_at` columns.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn parse_money(row: &SqliteRow, column: &str) -> Money {
    let raw: String = row.get(column);
    Money::from_str_canonical(&raw).unwrap_or_else(|e| {
        warn!(
            column = column,
            value = %raw,
            error = %e,
            "Failed to parse stored amount, using zero"
        );
        Money::zero()
    })
}

fn parse_opt_money(row: &SqliteRow, column: &str) -> Option<Money> {
    let raw: Option<String> = row.get(column);
    raw.map(|s| {
        Money::from_str_canonical(&s).unwrap_or_else(|e| {
            warn!(
                column = column,
                value = %s,
                error = %e,
                "Failed to parse stored amount, using zero"
            );
            Money::zero()
        })
    })
}

fn parse_date(row: &SqliteRow, column: &str) -> NaiveDate {
    let raw: String = row.get(column);
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").unwrap_or_else(|e| {
        warn!(
            column = column,
            value = %raw,
            error = %e,
            "Failed to parse stored date, using epoch"
        );
        NaiveDate::default()
    })
}

pub(crate) fn purchase_from_row(row: &SqliteRow) -> PurchaseEntry {
    PurchaseEntry {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        boxes_got: row.get("boxes_got"),
        box_price: parse_money(row, "box_price"),
        crates_per_box: row.get("crates_per_box"),
        crate_price: parse_money(row, "crate_price"),
        crates_got: row.get("crates_got"),
        eggs_per_crate: row.get("eggs_per_crate"),
        egg_price: parse_opt_money(row, "egg_price"),
        eggs_got: row.get("eggs_got"),
        date: parse_date(row, "date"),
    }
}

pub(crate) fn sale_from_row(row: &SqliteRow) -> SaleEntry {
    let payment: String = row.get("payment_method");
    SaleEntry {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        boxes_sold: row.get("boxes_sold"),
        box_sale_price: parse_money(row, "box_sale_price"),
        crates_per_box: row.get("crates_per_box"),
        crates_sold: row.get("crates_sold"),
        crate_sale_price: parse_money(row, "crate_sale_price"),
        individual_eggs: row.get("individual_eggs"),
        egg_sale_price: parse_money(row, "egg_sale_price"),
        eggs_per_crate: row.get("eggs_per_crate"),
        eggs_sold: row.get("eggs_sold"),
        sale_price: parse_opt_money(row, "sale_price"),
        payment_method: PaymentMethod::from_stored(&payment),
        date: parse_date(row, "date"),
    }
}
