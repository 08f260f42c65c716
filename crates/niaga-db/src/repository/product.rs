//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with system-generated `PRD######` codes
//! - Filtered listing (search, category, status, stock label)
//! - Conditional stock updates used by orders and POS sales
//!
//! ## Stock Label Filter
//! ```text
//!   Habis    →  stock <= 0
//!   Menipis  →  stock > 0 AND stock <= min_stock
//!   Aman     →  stock > min_stock
//! ```
//! Same thresholds as `niaga_core::stock::classify`, pushed into SQL so the
//! listing can be paged.

use chrono::Utc;
use niaga_core::stock::StockStatus;
use niaga_core::validation::{
    next_product_code, validate_monetary_amount, validate_name, validate_product_code,
    validate_stock_count, PRODUCT_CODE_PREFIX,
};
use niaga_core::{CoreError, Money, Product, ProductStatus};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::{begin_write, new_id};

const PRODUCT_COLUMNS: &str = "id, code, name, category_id, unit_id, price, cost, stock, \
     min_stock, status, created_at, updated_at";

// =============================================================================
// Inputs
// =============================================================================

/// Product form contents, for both create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Omit to have a `PRD######` code generated (create) or kept (update).
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub cost: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(rename = "stok_minimal", default)]
    pub min_stock: i64,
    #[serde(default)]
    pub status: ProductStatus,
}

/// Create and update share one shape.
pub type NewProduct = ProductInput;
pub type ProductUpdate = ProductInput;

impl ProductInput {
    /// Checks names, code format, bounds. Returns the trimmed name and code.
    fn validated(&self) -> DbResult<(String, Option<String>)> {
        let name = validate_name(&self.name)?;
        let code = match self.code.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(validate_product_code(code)?),
        };
        validate_monetary_amount("price", self.price)?;
        validate_monetary_amount("cost", self.cost)?;
        validate_stock_count("stock", self.stock)?;
        validate_stock_count("min_stock", self.min_stock)?;
        Ok((name, code))
    }
}

/// Sort order of product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    Code,
    Stock,
}

/// Listing filters. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<ProductStatus>,
    pub stock_status: Option<StockStatus>,
    #[serde(default)]
    pub sort: ProductSort,
    pub limit: Option<u32>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products matching `filter`.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        debug!(?filter, "Listing products");

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM products WHERE 1 = 1", PRODUCT_COLUMNS));

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR code LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(category_id) = &filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id.clone());
        }

        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }

        match filter.stock_status {
            Some(StockStatus::Habis) => {
                qb.push(" AND stock <= 0");
            }
            Some(StockStatus::Menipis) => {
                qb.push(" AND stock > 0 AND stock <= min_stock");
            }
            Some(StockStatus::Aman) => {
                qb.push(" AND stock > min_stock");
            }
            None => {}
        }

        qb.push(match filter.sort {
            ProductSort::Name => " ORDER BY name COLLATE NOCASE, code",
            ProductSort::Code => " ORDER BY code",
            ProductSort::Stock => " ORDER BY stock, name COLLATE NOCASE",
        });

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by ID or fails with NotFound.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Produk", id))
    }

    /// Gets a product by its code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE code = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Code the next product created without one would receive.
    pub async fn next_code(&self) -> DbResult<String> {
        let mut conn = self.pool.acquire().await?;
        generate_code(&mut conn).await
    }

    /// Inserts a new product, generating its code when omitted.
    pub async fn insert(&self, input: &NewProduct) -> DbResult<Product> {
        let (name, code) = input.validated()?;

        let mut tx = begin_write(&self.pool).await?;

        let code = match code {
            Some(code) => code,
            None => generate_code(&mut tx).await?,
        };

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            code,
            name,
            category_id: input.category_id.clone(),
            unit_id: input.unit_id.clone(),
            price: input.price,
            cost: input.cost,
            stock: input.stock,
            min_stock: input.min_stock,
            status: input.status,
            created_at: now,
            updated_at: now,
        };

        debug!(code = %product.code, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, code, name, category_id, unit_id, price, cost,
                stock, min_stock, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(&product.unit_id)
        .bind(product.price)
        .bind(product.cost)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_code(e, &product.code))?;

        tx.commit().await?;

        info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    /// Replaces a product's editable fields.
    pub async fn update(&self, id: &str, input: &ProductUpdate) -> DbResult<Product> {
        let (name, code) = input.validated()?;
        let existing = self.get(id).await?;
        let code = code.unwrap_or(existing.code);
        let now = Utc::now();

        debug!(product_id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                code = ?1, name = ?2, category_id = ?3, unit_id = ?4,
                price = ?5, cost = ?6, stock = ?7, min_stock = ?8,
                status = ?9, updated_at = ?10
            WHERE id = ?11
            "#,
        )
        .bind(&code)
        .bind(&name)
        .bind(&input.category_id)
        .bind(&input.unit_id)
        .bind(input.price)
        .bind(input.cost)
        .bind(input.stock)
        .bind(input.min_stock)
        .bind(input.status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_code(e, &code))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Produk", id));
        }

        self.get(id).await
    }

    /// Deletes a product that no order or sale references.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(product_id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Produk", id));
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Returns total product count.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn duplicate_code(err: sqlx::Error, code: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } if field.contains("code") => {
            DbError::duplicate("code", code)
        }
        other => other,
    }
}

// =============================================================================
// Helpers shared with other repositories
// =============================================================================

/// Next `PRD######` code, looking at the numerically highest existing one.
///
/// Only codes whose whole suffix is digits count, so a manual code such as
/// `PRD0000001-A` never feeds the sequence.
pub(crate) async fn generate_code(conn: &mut SqliteConnection) -> DbResult<String> {
    let highest: Option<String> = sqlx::query_scalar(
        r#"
        SELECT code FROM products
        WHERE code GLOB ?1 AND substr(code, ?2) NOT GLOB '*[^0-9]*'
        ORDER BY CAST(substr(code, ?2) AS INTEGER) DESC, LENGTH(code) DESC
        LIMIT 1
        "#,
    )
    .bind(format!("{}[0-9]*", PRODUCT_CODE_PREFIX))
    .bind(PRODUCT_CODE_PREFIX.len() as i64 + 1)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(next_product_code(highest.as_deref()))
}

/// Loads a product inside a transaction.
pub(crate) async fn fetch_product(conn: &mut SqliteConnection, id: &str) -> DbResult<Product> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = ?1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Produk", id))
}

/// Adds received goods to stock.
pub(crate) async fn increment_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query("UPDATE products SET stock = stock + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Produk", product_id));
    }

    debug!(product_id = %product_id, quantity, "Stock incremented");
    Ok(())
}

/// Takes goods out of stock, only if enough is on hand.
///
/// The check and the write are one conditional UPDATE, so two concurrent
/// sales can never both take the last unit.
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - ?1, updated_at = ?2 WHERE id = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let current: Option<(String, i64)> =
            sqlx::query_as("SELECT code, stock FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&mut *conn)
                .await?;

        return Err(match current {
            None => DbError::not_found("Produk", product_id),
            Some((code, available)) => CoreError::InsufficientStock {
                code,
                available,
                requested: quantity,
            }
            .into(),
        });
    }

    debug!(product_id = %product_id, quantity, "Stock decremented");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn input(name: &str, stock: i64, min_stock: i64) -> NewProduct {
        NewProduct {
            code: None,
            name: name.to_string(),
            category_id: None,
            unit_id: None,
            price: Money::from_rupiah(15_000),
            cost: Money::from_rupiah(12_000),
            stock,
            min_stock,
            status: ProductStatus::Active,
        }
    }

    async fn repo() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    #[tokio::test]
    async fn test_insert_generates_sequential_codes() {
        let repo = repo().await;

        let first = repo.insert(&input("Minyak Goreng 2L", 10, 3)).await.unwrap();
        let second = repo.insert(&input("Gula Pasir 1kg", 10, 3)).await.unwrap();

        assert_eq!(first.code, "PRD000001");
        assert_eq!(second.code, "PRD000002");
        assert_eq!(repo.next_code().await.unwrap(), "PRD000003");
    }

    #[tokio::test]
    async fn test_generated_codes_skip_manual_suffixes() {
        let repo = repo().await;
        let mut manual = input("Beras 5kg varian A", 5, 1);
        manual.code = Some("PRD0000001-A".to_string());
        repo.insert(&manual).await.unwrap();

        let first = repo.insert(&input("Beras 5kg", 5, 1)).await.unwrap();
        let second = repo.insert(&input("Beras 10kg", 5, 1)).await.unwrap();
        assert_eq!(first.code, "PRD000001");
        assert_eq!(second.code, "PRD000002");

        let mut wide = input("Tepung Terigu", 5, 1);
        wide.code = Some("PRD0000010".to_string());
        repo.insert(&wide).await.unwrap();
        assert_eq!(repo.next_code().await.unwrap(), "PRD000011");
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let repo = repo().await;
        let mut product = input("Kopi Bubuk", 5, 1);
        product.code = Some("KOPI-01".to_string());

        let stored = repo.insert(&product).await.unwrap();
        let err = repo.insert(&product).await.unwrap_err();
        assert!(err.is_unique_violation());

        let found = repo.get_by_code(&stored.code).await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert!(repo.get_by_code("TIDAK-ADA").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_insert() {
        let repo = repo().await;
        let mut product = input("Teh Celup", 5, 1);
        product.price = Money::from_rupiah(-1);

        let err = repo.insert(&product).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::Validation(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_filter_by_stock_status() {
        let repo = repo().await;
        repo.insert(&input("Habis", 0, 5)).await.unwrap();
        repo.insert(&input("Menipis", 5, 5)).await.unwrap();
        repo.insert(&input("Aman", 6, 5)).await.unwrap();

        for (status, name) in [
            (StockStatus::Habis, "Habis"),
            (StockStatus::Menipis, "Menipis"),
            (StockStatus::Aman, "Aman"),
        ] {
            let filter = ProductFilter {
                stock_status: Some(status),
                ..Default::default()
            };
            let found = repo.list(&filter).await.unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].name, name);
            assert_eq!(found[0].stock_status(), status);
        }
    }

    #[tokio::test]
    async fn test_search_and_sort() {
        let repo = repo().await;
        repo.insert(&input("Sabun Mandi", 20, 2)).await.unwrap();
        repo.insert(&input("Sampo Sachet", 3, 2)).await.unwrap();
        repo.insert(&input("Beras 5kg", 9, 2)).await.unwrap();

        let filter = ProductFilter {
            search: Some("sa".to_string()),
            sort: ProductSort::Stock,
            ..Default::default()
        };
        let found = repo.list(&filter).await.unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sampo Sachet", "Sabun Mandi"]);
    }

    #[tokio::test]
    async fn test_update_keeps_code_when_omitted() {
        let repo = repo().await;
        let created = repo.insert(&input("Mie Instan", 40, 10)).await.unwrap();

        let mut changes = input("Mie Instan Goreng", 35, 10);
        changes.status = ProductStatus::Inactive;
        let updated = repo.update(&created.id, &changes).await.unwrap();

        assert_eq!(updated.code, created.code);
        assert_eq!(updated.name, "Mie Instan Goreng");
        assert_eq!(updated.status, ProductStatus::Inactive);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = repo().await;
        let err = repo.delete("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_conditional_decrement() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().insert(&input("Telur 1kg", 3, 1)).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        decrement_stock(&mut conn, &product.id, 2).await.unwrap();
        let err = decrement_stock(&mut conn, &product.id, 2).await.unwrap_err();
        drop(conn);

        assert!(matches!(
            err,
            DbError::Rule(CoreError::InsufficientStock {
                available: 1,
                requested: 2,
                ..
            })
        ));
        assert_eq!(db.products().get(&product.id).await.unwrap().stock, 1);
    }
}
