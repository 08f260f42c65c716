//! # Shift Repository
//!
//! Opening and closing cash-drawer shifts.
//!
//! At most one open shift per cashier, enforced by the partial unique index
//! `idx_shifts_one_open`. Closing freezes the expected cash and variance onto
//! the shift row so later corrections to sales cannot change a closed report.

use chrono::Utc;
use niaga_core::shift::{reconcile, Reconciliation, ShiftClosing, ShiftOpening, ShiftStats};
use niaga_core::{CoreError, Shift};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{begin_write, new_id};

const SHIFT_COLUMNS: &str = "id, cashier_id, opening_cash, opening_notes, opened_at, \
     closing_cash, closing_notes, closed_at, expected_cash, variance";

/// A shift after closing, with the figures that produced its variance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedShift {
    pub shift: Shift,
    pub stats: ShiftStats,
    pub reconciliation: Reconciliation,
}

/// Repository for cash-drawer shifts.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Opens a shift for the cashier.
    pub async fn open(&self, opening: &ShiftOpening) -> DbResult<Shift> {
        let id = new_id();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO shifts (id, cashier_id, opening_cash, opening_notes, opened_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(opening.cashier_id())
        .bind(opening.opening_cash())
        .bind(opening.notes())
        .bind(now)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            let err = DbError::from(e);
            if err.is_unique_violation() {
                warn!(cashier_id = %opening.cashier_id(), "Shift already open");
                return Err(CoreError::ShiftAlreadyOpen {
                    cashier_id: opening.cashier_id().to_string(),
                }
                .into());
            }
            return Err(err);
        }

        info!(
            shift_id = %id,
            cashier_id = %opening.cashier_id(),
            opening_cash = opening.opening_cash().rupiah(),
            "Shift opened"
        );

        self.get(&id).await
    }

    pub async fn get(&self, id: &str) -> DbResult<Shift> {
        sqlx::query_as::<_, Shift>(&format!("SELECT {} FROM shifts WHERE id = ?1", SHIFT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id))
    }

    /// The cashier's open shift, if any.
    pub async fn active(&self, cashier_id: &str) -> DbResult<Option<Shift>> {
        let mut conn = self.pool.acquire().await?;
        fetch_active(&mut conn, cashier_id).await
    }

    /// Sales totals recorded against a shift so far.
    pub async fn stats(&self, shift_id: &str) -> DbResult<ShiftStats> {
        let mut conn = self.pool.acquire().await?;
        fetch_stats(&mut conn, shift_id).await
    }

    /// Closes the cashier's open shift and reconciles the drawer.
    pub async fn close(&self, cashier_id: &str, closing: &ShiftClosing) -> DbResult<ClosedShift> {
        let mut tx = begin_write(&self.pool).await?;

        let shift = fetch_active(&mut tx, cashier_id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift aktif", cashier_id))?;

        let stats = fetch_stats(&mut tx, &shift.id).await?;
        let reconciliation = reconcile(shift.opening_cash, &stats, closing.closing_cash());

        debug!(shift_id = %shift.id, ?reconciliation, "Reconciling shift");

        let result = sqlx::query(
            r#"
            UPDATE shifts SET
                closing_cash = ?1, closing_notes = ?2, closed_at = ?3,
                expected_cash = ?4, variance = ?5
            WHERE id = ?6 AND closed_at IS NULL
            "#,
        )
        .bind(closing.closing_cash())
        .bind(closing.notes())
        .bind(Utc::now())
        .bind(reconciliation.expected_cash)
        .bind(reconciliation.variance)
        .bind(&shift.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shift aktif", cashier_id));
        }

        let shift = sqlx::query_as::<_, Shift>(&format!("SELECT {} FROM shifts WHERE id = ?1", SHIFT_COLUMNS))
            .bind(&shift.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            shift_id = %shift.id,
            cashier_id = %cashier_id,
            expected_cash = reconciliation.expected_cash.rupiah(),
            variance = reconciliation.variance.rupiah(),
            "Shift closed"
        );

        Ok(ClosedShift {
            shift,
            stats,
            reconciliation,
        })
    }
}

pub(crate) async fn fetch_active(conn: &mut SqliteConnection, cashier_id: &str) -> DbResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(&format!(
        "SELECT {} FROM shifts WHERE cashier_id = ?1 AND closed_at IS NULL",
        SHIFT_COLUMNS
    ))
    .bind(cashier_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(shift)
}

async fn fetch_stats(conn: &mut SqliteConnection, shift_id: &str) -> DbResult<ShiftStats> {
    let stats = sqlx::query_as::<_, ShiftStats>(
        r#"
        SELECT
            COALESCE(SUM(total_amount), 0) AS total_sales,
            COALESCE(SUM(CASE WHEN payment_method = 'cash' THEN total_amount ELSE 0 END), 0) AS cash_sales,
            COUNT(*) AS transaction_count
        FROM pos_transactions
        WHERE shift_id = ?1
        "#,
    )
    .bind(shift_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(stats)
}
