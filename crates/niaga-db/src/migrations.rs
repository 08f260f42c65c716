//! # Database Migrations
//!
//! Embedded SQL migrations for Niaga.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                 │
//! │       │                                                                 │
//! │       └── 001_initial_schema.sql  ⬜ → run, record checksum             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. **NEVER** modify an applied migration, add a new one instead

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    async fn insert_order(db: &Database, id: &str, status: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO orders (id, order_number, kind, counterparty_id, order_date, status, \
             created_at, updated_at) VALUES (?1, ?1, 'sales', 'pelanggan-1', '2026-01-05', ?2, \
             '2026-01-05T08:00:00Z', '2026-01-05T08:00:00Z')",
        )
        .bind(id)
        .bind(status)
        .execute(db.pool())
        .await
        .map(|_| ())
    }

    #[tokio::test]
    async fn test_order_status_is_constrained() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(insert_order(&db, "SO-20260105-0001", "pending_approval").await.is_ok());
        assert!(insert_order(&db, "SO-20260105-0002", "archived").await.is_err());
    }
}
