//! # Repository Module
//!
//! Database repository implementations for Niaga.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                           │
//! │       │  db.orders().transition(id, request, &policy)                   │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── BEGIN IMMEDIATE                                                    │
//! │  ├── load row, re-check StatusPolicy (niaga-core)                       │
//! │  ├── stock side effects (conditional UPDATEs)                           │
//! │  ├── UPDATE ... WHERE id = ? AND status = ? AND version = ?             │
//! │  └── COMMIT  (any failure rolls everything back)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Write transactions take SQLite's write lock up front, so two writers
//! queue on the busy timeout instead of failing when one upgrades a read.
//! Inside a transaction every query runs on the transaction's connection,
//! never on the pool.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD, filtering, stock changes
//! - [`catalog::CatalogRepository`] - Creatable categories and units
//! - [`order::OrderRepository`] - Purchase/sales orders and their lifecycle
//! - [`shift::ShiftRepository`] - Cash-drawer shifts
//! - [`transaction::TransactionRepository`] - POS sales

pub mod catalog;
pub mod order;
pub mod product;
pub mod shift;
pub mod transaction;

use chrono::NaiveDate;
use niaga_core::validation::format_document_number;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use uuid::Uuid;

use crate::error::DbResult;

/// Fresh entity id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Opens a transaction that holds the write lock from its first statement.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Next `PREFIX-YYYYMMDD-NNNN` number for `date`, sequenced per day.
///
/// The sequence is compared as a number, so `-10000` follows `-9999`.
/// `table` and `column` are compile-time identifiers, never user input.
pub(crate) async fn next_document_number(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
    prefix: &str,
    date: NaiveDate,
) -> DbResult<String> {
    let day_prefix = format!("{}-{}-", prefix, date.format("%Y%m%d"));
    let sql = format!(
        "SELECT MAX(CAST(substr({column}, ?2) AS INTEGER)) FROM {table} WHERE {column} LIKE ?1",
        column = column,
        table = table
    );

    let last: Option<i64> = sqlx::query_scalar(&sql)
        .bind(format!("{}%", day_prefix))
        .bind(day_prefix.len() as i64 + 1)
        .fetch_one(&mut *conn)
        .await?;

    let sequence = last.and_then(|n| u32::try_from(n).ok()).unwrap_or(0);

    Ok(format_document_number(prefix, date, sequence + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_document_sequence_past_four_digits() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();
        sqlx::query("CREATE TEMP TABLE numbered (number TEXT NOT NULL)")
            .execute(&mut *conn)
            .await
            .unwrap();
        for number in ["SO-20260105-9999", "SO-20260105-10000", "SO-20260106-20000"] {
            sqlx::query("INSERT INTO numbered (number) VALUES (?1)")
                .bind(number)
                .execute(&mut *conn)
                .await
                .unwrap();
        }

        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let next = next_document_number(&mut *conn, "numbered", "number", "SO", date)
            .await
            .unwrap();
        assert_eq!(next, "SO-20260105-10001");

        let fresh_day = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let first = next_document_number(&mut *conn, "numbered", "number", "SO", fresh_day)
            .await
            .unwrap();
        assert_eq!(first, "SO-20260107-0001");
    }
}
