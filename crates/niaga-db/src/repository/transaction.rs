//! # POS Transaction Repository
//!
//! Records counter sales against the cashier's open shift.
//!
//! Prices and names come from the product rows at the moment of sale, never
//! from the client. Stock is taken with the same conditional UPDATE used for
//! shipped sales orders, and the whole sale is one SQL transaction.

use chrono::Utc;
use niaga_core::totals::{calculate_line, calculate_order, LineInput};
use niaga_core::validation::{
    validate_gross_total, validate_line_count, validate_monetary_amount, validate_percentage,
    validate_quantity, validate_required_text, validate_uuid,
};
use niaga_core::{
    CoreError, Discount, Money, PaymentMethod, Percentage, PosTransaction, ProductStatus,
    TransactionLine, ValidationError,
};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::{decrement_stock, fetch_product};
use crate::repository::shift::fetch_active;
use crate::repository::{begin_write, new_id, next_document_number};

const RECEIPT_PREFIX: &str = "TRX";

const TRANSACTION_COLUMNS: &str = "id, receipt_number, shift_id, cashier_id, subtotal, tax_rate, \
     tax_amount, discount_amount, total_amount, payment_method, paid_amount, change_amount, created_at";

const LINE_COLUMNS: &str = "id, transaction_id, product_id, product_name, product_code, quantity, \
     unit_price, discount_percentage, discount_amount, line_total";

/// One scanned product in a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransactionLine {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub discount: Discount,
}

/// A sale as submitted from the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub cashier_id: String,
    pub lines: Vec<NewTransactionLine>,
    pub payment_method: PaymentMethod,
    /// Cash handed over. Ignored for non-cash payments.
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub order_discount: Money,
}

impl NewTransaction {
    fn validate(&self) -> DbResult<String> {
        let cashier_id = validate_required_text("cashier_id", &self.cashier_id)?;
        validate_line_count(self.lines.len())?;
        for line in &self.lines {
            validate_uuid("product_id", line.product_id.trim())?;
            validate_quantity(line.quantity)?;
            match line.discount {
                Discount::Percentage(pct) => validate_percentage("discount_percentage", pct)?,
                Discount::Amount(amount) => validate_monetary_amount("discount_amount", amount)?,
                Discount::None => {}
            }
        }
        validate_monetary_amount("paid_amount", self.paid_amount)?;
        validate_monetary_amount("discount_amount", self.order_discount)?;
        Ok(cashier_id)
    }
}

/// Repository for point-of-sale transactions.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Records a sale.
    ///
    /// ## Errors
    /// - `NoActiveShift` when the cashier has no open shift
    /// - `ProductInactive` / `InsufficientStock` per line
    /// - Validation when cash paid is less than the total
    pub async fn record(&self, sale: &NewTransaction, tax_rate: Percentage) -> DbResult<PosTransaction> {
        let cashier_id = sale.validate()?;

        let mut tx = begin_write(&self.pool).await?;

        let shift = fetch_active(&mut tx, &cashier_id)
            .await?
            .ok_or_else(|| CoreError::NoActiveShift {
                cashier_id: cashier_id.clone(),
            })?;

        let mut priced = Vec::with_capacity(sale.lines.len());
        for line in &sale.lines {
            let product = fetch_product(&mut tx, line.product_id.trim()).await?;
            if product.status != ProductStatus::Active {
                return Err(CoreError::ProductInactive { code: product.code }.into());
            }
            priced.push((product, line.quantity, line.discount.clamped()));
        }
        validate_gross_total(priced.iter().map(|(product, qty, _)| (*qty, product.price)))?;

        let inputs: Vec<LineInput> = priced
            .iter()
            .map(|(product, qty, discount)| LineInput::new(*qty, product.price, *discount))
            .collect();
        let totals = calculate_order(&inputs, tax_rate, sale.order_discount);

        let (paid_amount, change_amount) = match sale.payment_method {
            PaymentMethod::Cash => {
                if sale.paid_amount < totals.total_amount {
                    return Err(ValidationError::OutOfRange {
                        field: "paid_amount".to_string(),
                        min: totals.total_amount.rupiah(),
                        max: niaga_core::MAX_MONETARY_AMOUNT,
                    }
                    .into());
                }
                (sale.paid_amount, sale.paid_amount - totals.total_amount)
            }
            PaymentMethod::NonCash => (totals.total_amount, Money::zero()),
        };

        let now = Utc::now();
        let id = new_id();
        let receipt_number = next_document_number(
            &mut tx,
            "pos_transactions",
            "receipt_number",
            RECEIPT_PREFIX,
            now.date_naive(),
        )
        .await?;

        debug!(receipt_number = %receipt_number, lines = priced.len(), "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO pos_transactions (
                id, receipt_number, shift_id, cashier_id, subtotal, tax_rate, tax_amount,
                discount_amount, total_amount, payment_method, paid_amount, change_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&id)
        .bind(&receipt_number)
        .bind(&shift.id)
        .bind(&cashier_id)
        .bind(totals.subtotal)
        .bind(totals.tax_rate)
        .bind(totals.tax_amount)
        .bind(totals.discount_amount)
        .bind(totals.total_amount)
        .bind(sale.payment_method)
        .bind(paid_amount)
        .bind(change_amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (product, quantity, discount) in &priced {
            let line = calculate_line(*quantity, product.price, *discount);
            let (discount_percentage, discount_amount) = discount.into_parts();

            sqlx::query(
                r#"
                INSERT INTO transaction_lines (
                    id, transaction_id, product_id, product_name, product_code,
                    quantity, unit_price, discount_percentage, discount_amount, line_total
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(new_id())
            .bind(&id)
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.code)
            .bind(*quantity)
            .bind(product.price)
            .bind(discount_percentage)
            .bind(discount_amount)
            .bind(line.total)
            .execute(&mut *tx)
            .await?;

            decrement_stock(&mut tx, &product.id, *quantity).await?;
        }

        let mut transaction = fetch_transaction(&mut tx, &id).await?;
        transaction.items = fetch_lines(&mut tx, &id).await?;

        tx.commit().await?;

        info!(
            receipt_number = %receipt_number,
            shift_id = %shift.id,
            total = totals.total_amount.rupiah(),
            "Sale recorded"
        );

        Ok(transaction)
    }

    /// Gets a sale with its lines.
    pub async fn get(&self, id: &str) -> DbResult<PosTransaction> {
        let mut conn = self.pool.acquire().await?;
        let mut transaction = fetch_transaction(&mut conn, id).await?;
        transaction.items = fetch_lines(&mut conn, id).await?;
        Ok(transaction)
    }

    /// Sales of one shift, oldest first. Lines are not loaded.
    pub async fn list_for_shift(&self, shift_id: &str) -> DbResult<Vec<PosTransaction>> {
        let rows = sqlx::query_as::<_, PosTransaction>(&format!(
            "SELECT {} FROM pos_transactions WHERE shift_id = ?1 ORDER BY receipt_number",
            TRANSACTION_COLUMNS
        ))
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

async fn fetch_transaction(conn: &mut SqliteConnection, id: &str) -> DbResult<PosTransaction> {
    sqlx::query_as::<_, PosTransaction>(&format!(
        "SELECT {} FROM pos_transactions WHERE id = ?1",
        TRANSACTION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Transaksi", id))
}

async fn fetch_lines(conn: &mut SqliteConnection, transaction_id: &str) -> DbResult<Vec<TransactionLine>> {
    let lines = sqlx::query_as::<_, TransactionLine>(&format!(
        "SELECT {} FROM transaction_lines WHERE transaction_id = ?1 ORDER BY rowid",
        LINE_COLUMNS
    ))
    .bind(transaction_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::product::NewProduct;
    use crate::{Database, DbConfig};
    use niaga_core::error::ErrorCategory;
    use niaga_core::shift::{ShiftClosing, ShiftOpening, VarianceKind};
    use niaga_core::Product;

    async fn product(db: &Database, name: &str, price: i64, stock: i64, status: ProductStatus) -> Product {
        db.products()
            .insert(&NewProduct {
                code: None,
                name: name.to_string(),
                category_id: None,
                unit_id: None,
                price: Money::from_rupiah(price),
                cost: Money::from_rupiah(price / 2),
                stock,
                min_stock: 0,
                status,
            })
            .await
            .unwrap()
    }

    fn sale(lines: Vec<(&str, i64)>, method: PaymentMethod, paid: i64) -> NewTransaction {
        NewTransaction {
            cashier_id: "kasir-1".to_string(),
            lines: lines
                .into_iter()
                .map(|(id, quantity)| NewTransactionLine {
                    product_id: id.to_string(),
                    quantity,
                    discount: Discount::None,
                })
                .collect(),
            payment_method: method,
            paid_amount: Money::from_rupiah(paid),
            order_discount: Money::zero(),
        }
    }

    async fn open_shift(db: &Database, opening: i64) {
        let opening = ShiftOpening::new("kasir-1", Money::from_rupiah(opening), "catatan shift").unwrap();
        db.shifts().open(&opening).await.unwrap();
    }

    #[tokio::test]
    async fn test_sale_requires_open_shift() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = product(&db, "Gula 1kg", 15_000, 10, ProductStatus::Active).await;

        let err = db
            .transactions()
            .record(&sale(vec![(p.id.as_str(), 1)], PaymentMethod::Cash, 20_000), Percentage::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::NoActiveShift { .. })));
        assert_eq!(err.category(), Some(ErrorCategory::Conflict));
    }

    #[tokio::test]
    async fn test_cash_sale_computes_change_and_takes_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = product(&db, "Gula 1kg", 15_000, 10, ProductStatus::Active).await;
        open_shift(&db, 100_000).await;

        let trx = db
            .transactions()
            .record(&sale(vec![(p.id.as_str(), 2)], PaymentMethod::Cash, 50_000), Percentage::from_percent(10))
            .await
            .unwrap();

        assert!(trx.receipt_number.starts_with("TRX-"));
        assert_eq!(trx.subtotal, Money::from_rupiah(30_000));
        assert_eq!(trx.total_amount, Money::from_rupiah(33_000));
        assert_eq!(trx.change_amount, Money::from_rupiah(17_000));
        assert_eq!(trx.items.len(), 1);
        assert_eq!(trx.items[0].unit_price, Money::from_rupiah(15_000));
        assert_eq!(db.products().get(&p.id).await.unwrap().stock, 8);
    }

    #[tokio::test]
    async fn test_underpaid_cash_sale_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = product(&db, "Gula 1kg", 15_000, 10, ProductStatus::Active).await;
        open_shift(&db, 0).await;

        let err = db
            .transactions()
            .record(&sale(vec![(p.id.as_str(), 1)], PaymentMethod::Cash, 10_000), Percentage::zero())
            .await
            .unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::Validation));
        assert_eq!(db.products().get(&p.id).await.unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_inactive_and_short_stock_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let inactive = product(&db, "Minyak Lama", 20_000, 5, ProductStatus::Inactive).await;
        let scarce = product(&db, "Telur", 2_000, 1, ProductStatus::Active).await;
        open_shift(&db, 0).await;
        let trx = db.transactions();

        let err = trx
            .record(&sale(vec![(inactive.id.as_str(), 1)], PaymentMethod::NonCash, 0), Percentage::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::ProductInactive { .. })));

        let err = trx
            .record(&sale(vec![(scarce.id.as_str(), 3)], PaymentMethod::NonCash, 0), Percentage::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::InsufficientStock { available: 1, .. })));
        assert_eq!(db.products().get(&scarce.id).await.unwrap().stock, 1);
    }

    #[tokio::test]
    async fn test_oversized_sale_rejected_before_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = product(&db, "Genset", niaga_core::MAX_MONETARY_AMOUNT, 999_999, ProductStatus::Active).await;
        open_shift(&db, 0).await;

        let lines = vec![(p.id.as_str(), niaga_core::MAX_ITEM_QUANTITY); 10];
        let err = db
            .transactions()
            .record(&sale(lines, PaymentMethod::NonCash, 0), Percentage::from_percent(11))
            .await
            .unwrap_err();

        assert_eq!(err.category(), Some(ErrorCategory::Validation));
        assert!(matches!(
            err,
            DbError::Rule(CoreError::Validation(ValidationError::OutOfRange { ref field, .. })) if field == "total_amount"
        ));
        assert_eq!(db.products().get(&p.id).await.unwrap().stock, 999_999);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sales_on_file_database() {
        let path = std::env::temp_dir().join(format!("niaga-{}.db", new_id()));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let p = product(&db, "Air mineral", 3_000, 1_000, ProductStatus::Active).await;

        let cashiers = ["kasir-1", "kasir-2", "kasir-3", "kasir-4"];
        for cashier in cashiers {
            let opening = ShiftOpening::new(cashier, Money::from_rupiah(50_000), "catatan shift").unwrap();
            db.shifts().open(&opening).await.unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..10 {
            for cashier in cashiers {
                let db = db.clone();
                let mut request = sale(vec![(p.id.as_str(), 1)], PaymentMethod::Cash, 5_000);
                request.cashier_id = cashier.to_string();
                handles.push(tokio::spawn(async move {
                    db.transactions().record(&request, Percentage::zero()).await
                }));
            }
        }

        let mut receipts = std::collections::HashSet::new();
        for handle in handles {
            let trx = handle.await.unwrap().unwrap();
            receipts.insert(trx.receipt_number);
        }

        assert_eq!(receipts.len(), 40);
        assert_eq!(db.products().get(&p.id).await.unwrap().stock, 960);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_shift_close_reconciles_recorded_sales() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = product(&db, "Roti", 50_000, 100, ProductStatus::Active).await;
        open_shift(&db, 100_000).await;

        db.transactions()
            .record(&sale(vec![(p.id.as_str(), 3)], PaymentMethod::Cash, 150_000), Percentage::zero())
            .await
            .unwrap();
        db.transactions()
            .record(&sale(vec![(p.id.as_str(), 2)], PaymentMethod::NonCash, 0), Percentage::zero())
            .await
            .unwrap();

        let closing = ShiftClosing::new(Money::from_rupiah(340_000), "catatan shift").unwrap();
        let closed = db.shifts().close("kasir-1", &closing).await.unwrap();

        assert_eq!(closed.stats.transaction_count, 2);
        assert_eq!(closed.stats.total_sales, Money::from_rupiah(250_000));
        assert_eq!(closed.stats.cash_sales, Money::from_rupiah(150_000));
        assert_eq!(closed.reconciliation.expected_cash, Money::from_rupiah(350_000));
        assert_eq!(closed.reconciliation.variance, Money::from_rupiah(-10_000));
        assert_eq!(closed.reconciliation.variance_kind, VarianceKind::Short);

        let listed = db.transactions().list_for_shift(&closed.shift.id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
