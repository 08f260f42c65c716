//! # Domain Types
//!
//! Persisted entities of Niaga.
//!
//! ## Entity Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐     ┌──────────┐     ┌──────────┐                        │
//! │   │ Category │◄────│ Product  │────►│   Unit   │                        │
//! │   └──────────┘     └────┬─────┘     └──────────┘                        │
//! │                         │ referenced by (snapshot of name/code/price)   │
//! │            ┌────────────┴─────────────┐                                 │
//! │            ▼                          ▼                                 │
//! │     ┌────────────┐             ┌──────────────────┐                     │
//! │     │ OrderLine  │             │ TransactionLine  │                     │
//! │     └─────┬──────┘             └────────┬─────────┘                     │
//! │           │ N:1                         │ N:1                           │
//! │     ┌─────▼──────┐             ┌────────▼─────────┐     ┌──────────┐    │
//! │     │   Order    │             │  PosTransaction  │────►│  Shift   │    │
//! │     │ (PO / SO)  │             └──────────────────┘     └──────────┘    │
//! │     └────────────┘                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines snapshot the product's name, code and price at the moment they are
//! added, so later product edits never rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percentage};
use crate::status::{OrderKind, OrderStatus};
use crate::stock::{self, StockStatus};
use crate::totals::Discount;

// =============================================================================
// Product
// =============================================================================

/// Whether a product can still be sold and ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

impl ProductStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Business code, unique (`PRD000001` when system-generated).
    pub code: String,

    pub name: String,

    pub category_id: Option<String>,

    pub unit_id: Option<String>,

    /// Sell price.
    pub price: Money,

    /// Buy price (harga beli).
    pub cost: Money,

    /// Current on-hand quantity.
    pub stock: i64,

    /// Reorder threshold.
    #[serde(rename = "stok_minimal")]
    pub min_stock: i64,

    pub status: ProductStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Derived Habis/Menipis/Aman label.
    pub fn stock_status(&self) -> StockStatus {
        stock::classify(self.stock, self.min_stock)
    }

    /// Whether the POS may sell this product right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.status == ProductStatus::Active
            && stock::can_add_to_cart(self.stock)
            && self.stock >= quantity
    }
}

// =============================================================================
// Category & Unit
// =============================================================================

/// Product category (creatable from the product form).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Unit of measure (pcs, kg, dus...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A purchase order or sales order.
///
/// Money fields are derived from `items` and recomputed on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,

    /// `PO-YYYYMMDD-NNNN` or `SO-YYYYMMDD-NNNN`.
    pub order_number: String,

    pub kind: OrderKind,

    /// Supplier (purchase) or customer (sales) reference.
    pub counterparty_id: String,

    #[ts(as = "String")]
    pub order_date: NaiveDate,

    #[ts(as = "Option<String>")]
    pub expected_date: Option<NaiveDate>,

    pub status: OrderStatus,

    pub subtotal: Money,
    pub item_discount_total: Money,
    pub tax_rate: Percentage,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,

    pub notes: Option<String>,
    pub shipping_address: Option<String>,
    pub terms_conditions: Option<String>,

    pub approved_by: Option<String>,
    #[ts(as = "Option<String>")]
    pub approved_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub received_at: Option<DateTime<Utc>>,

    /// Optimistic concurrency token, bumped on every write.
    pub version: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

/// One line of an order.
///
/// The discount is stored as two columns with at most one non-zero;
/// [`OrderLine::discount`] gives the tagged form back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: String,
    pub order_id: String,
    pub position: i64,
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_percentage: Percentage,
    pub discount_amount: Money,
    pub line_total: Money,
}

impl OrderLine {
    pub fn discount(&self) -> Discount {
        Discount::from_parts(self.discount_percentage, self.discount_amount)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// A cashier's working session, bounded by opening and closing the drawer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    pub id: String,
    pub cashier_id: String,

    /// Immutable once opened.
    pub opening_cash: Money,
    pub opening_notes: String,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    pub closing_cash: Option<Money>,
    pub closing_notes: Option<String>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Frozen at close time.
    pub expected_cash: Option<Money>,
    pub variance: Option<Money>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

// =============================================================================
// POS Transaction
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Cash into the drawer.
    Cash,
    /// QRIS, debit or transfer.
    NonCash,
}

/// A completed point-of-sale sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PosTransaction {
    pub id: String,

    /// `TRX-YYYYMMDD-NNNN`.
    pub receipt_number: String,

    pub shift_id: String,
    pub cashier_id: String,

    pub subtotal: Money,
    pub tax_rate: Percentage,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub total_amount: Money,

    pub payment_method: PaymentMethod,
    pub paid_amount: Money,
    pub change_amount: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<TransactionLine>,
}

/// One line of a POS sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionLine {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_percentage: Percentage,
    pub discount_amount: Money,
    pub line_total: Money,
}
