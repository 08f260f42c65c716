//! # Order Repository
//!
//! Purchase and sales orders: creation, edits, status transitions, deletion.
//!
//! ## Transition Side Effects
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  One SQL transaction per status change                                  │
//! │                                                                         │
//! │  purchase → approved   approved_by (required) + approved_at             │
//! │  purchase → received   stock += quantity for every line, received_at    │
//! │  sales    → shipped+   stock -= quantity for every line (conditional)   │
//! │  any      → cancelled  no stock effect                                  │
//! │                                                                         │
//! │  UPDATE orders ... WHERE id = ? AND status = ? AND version = ?          │
//! │  Insufficient stock or a version mismatch rolls the whole thing back.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use niaga_core::draft::OrderDraft;
use niaga_core::status::crosses_into_shipped;
use niaga_core::validation::validate_required_text;
use niaga_core::{
    CoreError, Order, OrderKind, OrderLine, OrderStatus, Percentage, StatusPolicy, ValidationError,
};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::{decrement_stock, increment_stock};
use crate::repository::{begin_write, new_id, next_document_number};

const ORDER_COLUMNS: &str = "id, order_number, kind, counterparty_id, order_date, expected_date, \
     status, subtotal, item_discount_total, tax_rate, tax_amount, discount_amount, total_amount, \
     notes, shipping_address, terms_conditions, approved_by, approved_at, received_at, version, \
     created_at, updated_at";

const LINE_COLUMNS: &str = "id, order_id, position, product_id, product_name, product_code, \
     quantity, unit_price, discount_percentage, discount_amount, line_total";

// =============================================================================
// Requests
// =============================================================================

/// Listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub kind: Option<OrderKind>,
    pub status: Option<OrderStatus>,
    pub limit: Option<u32>,
}

/// A requested status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: OrderStatus,
    /// Version the caller last saw; checked when present.
    #[serde(default)]
    pub expected_version: Option<i64>,
    /// Who performs the change. Required for approvals.
    #[serde(default)]
    pub actor: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for purchase and sales orders.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Creates a draft order from a submitted form.
    ///
    /// The form is validated here as well as in the caller, and all money
    /// fields are recomputed from the lines.
    pub async fn create(&self, draft: &OrderDraft, tax_rate: Percentage) -> DbResult<Order> {
        draft.validate_for_submission()?;

        let now = Utc::now();
        let id = new_id();
        let totals = draft.totals(tax_rate);
        let order_date = draft.order_date.unwrap_or_else(|| now.date_naive());
        let counterparty_id = draft.counterparty_id.clone().unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;

        let order_number = next_document_number(
            &mut tx,
            "orders",
            "order_number",
            draft.kind.number_prefix(),
            now.date_naive(),
        )
        .await?;

        debug!(order_number = %order_number, kind = draft.kind.as_str(), "Inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, kind, counterparty_id, order_date, expected_date, status,
                subtotal, item_discount_total, tax_rate, tax_amount, discount_amount, total_amount,
                notes, shipping_address, terms_conditions, version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, 1, ?17, ?17)
            "#,
        )
        .bind(&id)
        .bind(&order_number)
        .bind(draft.kind)
        .bind(counterparty_id.trim())
        .bind(order_date)
        .bind(draft.expected_date)
        .bind(OrderStatus::Draft)
        .bind(totals.subtotal)
        .bind(totals.item_discount_total)
        .bind(totals.tax_rate)
        .bind(totals.tax_amount)
        .bind(totals.discount_amount)
        .bind(totals.total_amount)
        .bind(&draft.notes)
        .bind(&draft.shipping_address)
        .bind(&draft.terms_conditions)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut tx, &id, draft).await?;

        tx.commit().await?;

        info!(
            order_id = %id,
            order_number = %order_number,
            total = totals.total_amount.rupiah(),
            "Order created"
        );

        self.get(&id).await
    }

    /// Gets an order with its lines.
    pub async fn get(&self, id: &str) -> DbResult<Order> {
        let mut conn = self.pool.acquire().await?;
        let mut order = fetch_order(&mut conn, id).await?;
        order.items = fetch_lines(&mut conn, id).await?;
        Ok(order)
    }

    /// Lists orders, newest first. Lines are not loaded.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<Order>> {
        debug!(?filter, "Listing orders");

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM orders WHERE 1 = 1", ORDER_COLUMNS));

        if let Some(kind) = filter.kind {
            qb.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY created_at DESC, order_number DESC");
        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit as i64);
        }

        let orders = qb.build_query_as::<Order>().fetch_all(&self.pool).await?;
        Ok(orders)
    }

    /// Replaces an editable order's content with `draft`.
    ///
    /// The order keeps the tax rate it was created with.
    pub async fn update_content(
        &self,
        id: &str,
        draft: &OrderDraft,
        expected_version: Option<i64>,
        policy: &StatusPolicy,
    ) -> DbResult<Order> {
        let mut tx = begin_write(&self.pool).await?;

        let order = fetch_order(&mut tx, id).await?;
        policy.ensure_editable(&order.order_number, order.kind, order.status)?;
        check_version(&order, expected_version)?;

        if draft.kind != order.kind {
            return Err(ValidationError::InvalidFormat {
                field: "kind".to_string(),
                reason: "jenis pesanan tidak dapat diubah".to_string(),
            }
            .into());
        }
        draft.validate_for_submission()?;

        let totals = draft.totals(order.tax_rate);
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                counterparty_id = ?1, order_date = ?2, expected_date = ?3,
                subtotal = ?4, item_discount_total = ?5, tax_amount = ?6,
                discount_amount = ?7, total_amount = ?8,
                notes = ?9, shipping_address = ?10, terms_conditions = ?11,
                version = version + 1, updated_at = ?12
            WHERE id = ?13 AND status = ?14 AND version = ?15
            "#,
        )
        .bind(draft.counterparty_id.as_deref().map(str::trim))
        .bind(draft.order_date.unwrap_or(order.order_date))
        .bind(draft.expected_date)
        .bind(totals.subtotal)
        .bind(totals.item_discount_total)
        .bind(totals.tax_amount)
        .bind(totals.discount_amount)
        .bind(totals.total_amount)
        .bind(&draft.notes)
        .bind(&draft.shipping_address)
        .bind(&draft.terms_conditions)
        .bind(now)
        .bind(id)
        .bind(order.status)
        .bind(order.version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale(&order, order.version + 1));
        }

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, id, draft).await?;

        tx.commit().await?;

        info!(order_id = %id, version = order.version + 1, "Order content updated");
        self.get(id).await
    }

    /// Moves an order to a new status, applying its side effects atomically.
    pub async fn transition(
        &self,
        id: &str,
        request: &TransitionRequest,
        policy: &StatusPolicy,
    ) -> DbResult<Order> {
        let mut tx = begin_write(&self.pool).await?;

        let order = fetch_order(&mut tx, id).await?;
        check_version(&order, request.expected_version)?;

        let (from, to) = (order.status, request.status);
        policy.ensure_transition(order.kind, from, to)?;

        let now = Utc::now();
        let mut approved: Option<(String, DateTime<Utc>)> = None;
        let mut received_at: Option<DateTime<Utc>> = None;

        match order.kind {
            OrderKind::Purchase if to == OrderStatus::Approved => {
                let actor = validate_required_text("approved_by", request.actor.as_deref().unwrap_or(""))?;
                approved = Some((actor, now));
            }
            OrderKind::Purchase if to == OrderStatus::Received => {
                for line in fetch_lines(&mut tx, id).await? {
                    increment_stock(&mut tx, &line.product_id, line.quantity).await?;
                }
                received_at = Some(now);
            }
            OrderKind::Sales if crosses_into_shipped(from, to) => {
                for line in fetch_lines(&mut tx, id).await? {
                    decrement_stock(&mut tx, &line.product_id, line.quantity).await?;
                }
            }
            _ => {}
        }

        let (approved_by, approved_at) = match approved {
            Some((actor, at)) => (Some(actor), Some(at)),
            None => (None, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                status = ?1,
                approved_by = COALESCE(?2, approved_by),
                approved_at = COALESCE(?3, approved_at),
                received_at = COALESCE(?4, received_at),
                version = version + 1,
                updated_at = ?5
            WHERE id = ?6 AND status = ?7 AND version = ?8
            "#,
        )
        .bind(to)
        .bind(approved_by)
        .bind(approved_at)
        .bind(received_at)
        .bind(now)
        .bind(id)
        .bind(from)
        .bind(order.version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale(&order, order.version + 1));
        }

        tx.commit().await?;

        info!(
            order_id = %id,
            order_number = %order.order_number,
            from = from.as_str(),
            to = to.as_str(),
            "Order status changed"
        );

        self.get(id).await
    }

    /// Deletes a draft order and its lines.
    pub async fn delete(&self, id: &str, policy: &StatusPolicy) -> DbResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let order = fetch_order(&mut tx, id).await?;
        policy.ensure_deletable(&order.order_number, order.status)?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1 AND status = ?2")
            .bind(id)
            .bind(OrderStatus::Draft)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::OrderNotDeletable {
                order_number: order.order_number,
                status: order.status,
            }
            .into());
        }

        tx.commit().await?;

        info!(order_id = %id, order_number = %order.order_number, "Order deleted");
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn fetch_order(conn: &mut SqliteConnection, id: &str) -> DbResult<Order> {
    sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Pesanan", id))
}

async fn fetch_lines(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Vec<OrderLine>> {
    let lines = sqlx::query_as::<_, OrderLine>(&format!(
        "SELECT {} FROM order_lines WHERE order_id = ?1 ORDER BY position",
        LINE_COLUMNS
    ))
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(lines)
}

async fn insert_lines(conn: &mut SqliteConnection, order_id: &str, draft: &OrderDraft) -> DbResult<()> {
    for (position, line) in draft.items.iter().enumerate() {
        let totals = line.totals();
        let (discount_percentage, discount_amount) = line.discount.clamped().into_parts();

        sqlx::query(
            r#"
            INSERT INTO order_lines (
                id, order_id, position, product_id, product_name, product_code,
                quantity, unit_price, discount_percentage, discount_amount, line_total
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(new_id())
        .bind(order_id)
        .bind(position as i64)
        .bind(line.product_id.trim())
        .bind(&line.product_name)
        .bind(&line.product_code)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(discount_percentage)
        .bind(discount_amount)
        .bind(totals.total)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

fn check_version(order: &Order, expected: Option<i64>) -> DbResult<()> {
    match expected {
        Some(expected) if expected != order.version => Err(stale(order, expected)),
        _ => Ok(()),
    }
}

fn stale(order: &Order, expected: i64) -> DbError {
    CoreError::StaleVersion {
        order_number: order.order_number.clone(),
        expected,
        actual: order.version,
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::product::NewProduct;
    use crate::{Database, DbConfig};
    use niaga_core::draft::DraftAction;
    use niaga_core::error::ErrorCategory;
    use niaga_core::{Money, Product, ProductStatus};

    async fn setup() -> (Database, Product, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut products = Vec::new();
        for (name, price, stock) in [("Kopi Sachet", 10_000, 5), ("Teh Botol", 5_000, 1)] {
            products.push(
                db.products()
                    .insert(&NewProduct {
                        code: None,
                        name: name.to_string(),
                        category_id: None,
                        unit_id: None,
                        price: Money::from_rupiah(price),
                        cost: Money::from_rupiah(price - 1_000),
                        stock,
                        min_stock: 1,
                        status: ProductStatus::Active,
                    })
                    .await
                    .unwrap(),
            );
        }
        let second = products.pop().unwrap();
        let first = products.pop().unwrap();
        (db, first, second)
    }

    fn draft(kind: OrderKind, a: &Product, b: &Product) -> OrderDraft {
        OrderDraft::new(kind)
            .apply(DraftAction::SetCounterparty {
                counterparty_id: Some("mitra-1".to_string()),
            })
            .apply(DraftAction::AddItem {
                product_id: a.id.clone(),
                product_name: a.name.clone(),
                product_code: a.code.clone(),
                unit_price: a.price,
                quantity: 2,
            })
            .apply(DraftAction::AddItem {
                product_id: b.id.clone(),
                product_name: b.name.clone(),
                product_code: b.code.clone(),
                unit_price: b.price,
                quantity: 1,
            })
            .apply(DraftAction::SetDiscountPercentage {
                index: 0,
                percentage: Percentage::from_percent(10),
            })
    }

    fn to(status: OrderStatus) -> TransitionRequest {
        TransitionRequest {
            status,
            expected_version: None,
            actor: Some("manajer-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_computes_totals_and_number() {
        let (db, a, b) = setup().await;
        let order = db
            .orders()
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::from_percent(10))
            .await
            .unwrap();

        assert!(order.order_number.starts_with("PO-"));
        assert!(order.order_number.ends_with("-0001"));
        assert_eq!(order.status, OrderStatus::Draft);
        assert_eq!(order.subtotal, Money::from_rupiah(23_000));
        assert_eq!(order.tax_amount, Money::from_rupiah(2_300));
        assert_eq!(order.total_amount, Money::from_rupiah(25_300));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].line_total, Money::from_rupiah(18_000));
        assert_eq!(order.version, 1);

        let second = db
            .orders()
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::from_percent(10))
            .await
            .unwrap();
        assert!(second.order_number.ends_with("-0002"));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_order() {
        let (db, _, _) = setup().await;
        let empty = OrderDraft::new(OrderKind::Sales).apply(DraftAction::SetCounterparty {
            counterparty_id: Some("pelanggan-1".to_string()),
        });

        let err = db.orders().create(&empty, Percentage::zero()).await.unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::Validation));
    }

    #[tokio::test]
    async fn test_purchase_lifecycle_receives_stock() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::from_percent(10))
            .await
            .unwrap();

        orders.transition(&order.id, &to(OrderStatus::PendingApproval), &policy).await.unwrap();
        let approved = orders.transition(&order.id, &to(OrderStatus::Approved), &policy).await.unwrap();
        assert_eq!(approved.approved_by.as_deref(), Some("manajer-1"));
        assert!(approved.approved_at.is_some());

        let received = orders.transition(&order.id, &to(OrderStatus::Received), &policy).await.unwrap();
        assert!(received.received_at.is_some());
        assert_eq!(received.version, 4);

        assert_eq!(db.products().get(&a.id).await.unwrap().stock, 7);
        assert_eq!(db.products().get(&b.id).await.unwrap().stock, 2);
    }

    #[tokio::test]
    async fn test_approval_requires_actor() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let order = db
            .orders()
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::zero())
            .await
            .unwrap();
        db.orders()
            .transition(&order.id, &to(OrderStatus::PendingApproval), &policy)
            .await
            .unwrap();

        let request = TransitionRequest {
            status: OrderStatus::Approved,
            expected_version: None,
            actor: None,
        };
        let err = db.orders().transition(&order.id, &request, &policy).await.unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::Validation));
        assert_eq!(db.orders().get(&order.id).await.unwrap().status, OrderStatus::PendingApproval);
    }

    #[tokio::test]
    async fn test_received_to_approved_is_illegal() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::zero())
            .await
            .unwrap();
        for status in [OrderStatus::PendingApproval, OrderStatus::Approved, OrderStatus::Received] {
            orders.transition(&order.id, &to(status), &policy).await.unwrap();
        }

        let err = orders
            .transition(&order.id, &to(OrderStatus::Approved), &policy)
            .await
            .unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::IllegalTransition));
    }

    #[tokio::test]
    async fn test_sales_shipping_decrements_stock() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Sales, &a, &b), Percentage::from_percent(10))
            .await
            .unwrap();
        assert!(order.order_number.starts_with("SO-"));

        orders.transition(&order.id, &to(OrderStatus::Confirmed), &policy).await.unwrap();
        orders.transition(&order.id, &to(OrderStatus::Shipped), &policy).await.unwrap();
        assert_eq!(db.products().get(&a.id).await.unwrap().stock, 3);
        assert_eq!(db.products().get(&b.id).await.unwrap().stock, 0);

        // Moving further along the ladder does not take stock again.
        orders.transition(&order.id, &to(OrderStatus::Delivered), &policy).await.unwrap();
        assert_eq!(db.products().get(&a.id).await.unwrap().stock, 3);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_transition() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let mut big = draft(OrderKind::Sales, &a, &b);
        big = big.apply(DraftAction::SetQuantity {
            index: 1,
            raw: "4".to_string(),
        });
        let order = orders.create(&big, Percentage::zero()).await.unwrap();

        let err = orders
            .transition(&order.id, &to(OrderStatus::Shipped), &policy)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::InsufficientStock { .. })));

        // First line's decrement was rolled back with the failed transition.
        assert_eq!(db.products().get(&a.id).await.unwrap().stock, 5);
        assert_eq!(orders.get(&order.id).await.unwrap().status, OrderStatus::Draft);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Sales, &a, &b), Percentage::zero())
            .await
            .unwrap();

        let request = TransitionRequest {
            status: OrderStatus::Confirmed,
            expected_version: Some(order.version + 5),
            actor: None,
        };
        let err = orders.transition(&order.id, &request, &policy).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::StaleVersion { actual: 1, .. })));
    }

    #[tokio::test]
    async fn test_update_content_only_while_editable() {
        let (db, a, b) = setup().await;
        let strict = StatusPolicy::default();
        let lenient = StatusPolicy::new(true);
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::from_percent(10))
            .await
            .unwrap();

        let edited = OrderDraft::from_order(&order).apply(DraftAction::RemoveItem { index: 1 });
        let updated = orders
            .update_content(&order.id, &edited, Some(order.version), &strict)
            .await
            .unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.subtotal, Money::from_rupiah(18_000));
        assert_eq!(updated.version, 2);

        orders
            .transition(&order.id, &to(OrderStatus::PendingApproval), &strict)
            .await
            .unwrap();

        let err = orders
            .update_content(&order.id, &edited, None, &strict)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::OrderNotEditable { .. })));

        orders.update_content(&order.id, &edited, None, &lenient).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_only_drafts() {
        let (db, a, b) = setup().await;
        let policy = StatusPolicy::default();
        let orders = db.orders();
        let order = orders
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::zero())
            .await
            .unwrap();
        orders.transition(&order.id, &to(OrderStatus::PendingApproval), &policy).await.unwrap();
        orders.transition(&order.id, &to(OrderStatus::Approved), &policy).await.unwrap();

        let err = orders.delete(&order.id, &policy).await.unwrap_err();
        assert_eq!(err.category(), Some(ErrorCategory::Conflict));

        let other = orders
            .create(&draft(OrderKind::Purchase, &a, &b), Percentage::zero())
            .await
            .unwrap();
        orders.delete(&other.id, &policy).await.unwrap();
        assert!(matches!(orders.get(&other.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (db, a, b) = setup().await;
        let orders = db.orders();
        orders.create(&draft(OrderKind::Purchase, &a, &b), Percentage::zero()).await.unwrap();
        orders.create(&draft(OrderKind::Sales, &a, &b), Percentage::zero()).await.unwrap();

        let sales = orders
            .list(&OrderFilter {
                kind: Some(OrderKind::Sales),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].kind, OrderKind::Sales);

        let drafts = orders
            .list(&OrderFilter {
                status: Some(OrderStatus::Draft),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(drafts.len(), 2);
    }
}
