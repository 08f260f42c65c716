//! # Catalog Repository
//!
//! Categories and units: the two "creatable select" lookups of the product
//! form. Typing a name that already exists (in any letter case) returns the
//! existing row instead of creating a twin.

use chrono::Utc;
use niaga_core::validation::validate_name;
use niaga_core::{Category, CoreError, Unit};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{begin_write, new_id};

/// Which lookup table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Unit,
}

impl CatalogKind {
    const fn table(&self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::Unit => "units",
        }
    }

    /// Product column referencing this table.
    const fn product_column(&self) -> &'static str {
        match self {
            CatalogKind::Category => "category_id",
            CatalogKind::Unit => "unit_id",
        }
    }

    /// Indonesian entity name for messages.
    pub const fn label(&self) -> &'static str {
        match self {
            CatalogKind::Category => "Kategori",
            CatalogKind::Unit => "Satuan",
        }
    }
}

/// Repository for categories and units.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        self.list(CatalogKind::Category).await
    }

    pub async fn list_units(&self) -> DbResult<Vec<Unit>> {
        self.list(CatalogKind::Unit).await
    }

    /// Returns the category named `name`, creating it if needed.
    pub async fn create_or_get_category(&self, name: &str) -> DbResult<Category> {
        self.create_or_get(CatalogKind::Category, name).await
    }

    /// Returns the unit named `name`, creating it if needed.
    pub async fn create_or_get_unit(&self, name: &str) -> DbResult<Unit> {
        self.create_or_get(CatalogKind::Unit, name).await
    }

    /// Deletes an entry no product uses.
    pub async fn delete(&self, kind: CatalogKind, id: &str) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let name: Option<String> =
            sqlx::query_scalar(&format!("SELECT name FROM {} WHERE id = ?1", kind.table()))
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let name = name.ok_or_else(|| DbError::not_found(kind.label(), id))?;

        let product_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products WHERE {} = ?1",
            kind.product_column()
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if product_count > 0 {
            return Err(CoreError::StillReferenced {
                entity: kind.label().to_string(),
                name,
                product_count,
            }
            .into());
        }

        sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", kind.table()))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(table = kind.table(), id = %id, "Catalog entry deleted");
        Ok(())
    }

    async fn list<T>(&self, kind: CatalogKind) -> DbResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let rows = sqlx::query_as::<_, T>(&format!(
            "SELECT id, name, created_at FROM {} ORDER BY name COLLATE NOCASE",
            kind.table()
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create_or_get<T>(&self, kind: CatalogKind, name: &str) -> DbResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let name = validate_name(name)?;
        let select = format!(
            "SELECT id, name, created_at FROM {} WHERE name = ?1 COLLATE NOCASE",
            kind.table()
        );

        let mut tx = begin_write(&self.pool).await?;

        if let Some(existing) = sqlx::query_as::<_, T>(&select)
            .bind(&name)
            .fetch_optional(&mut *tx)
            .await?
        {
            debug!(table = kind.table(), name = %name, "Catalog entry already exists");
            return Ok(existing);
        }

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, created_at) VALUES (?1, ?2, ?3)",
            kind.table()
        ))
        .bind(new_id())
        .bind(&name)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let created = sqlx::query_as::<_, T>(&select)
            .bind(&name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(table = kind.table(), name = %name, "Catalog entry created");
        Ok(created)
    }
}
