//! # Error Types
//!
//! Domain error taxonomy for niaga-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  niaga-core errors (this file)                                         │
//! │  ├── CoreError          - Business rule violations                     │
//! │  │   ├── IllegalTransition                                             │
//! │  │   └── Conflict (not editable / not deletable / shift open / stock)  │
//! │  └── ValidationError    - Input validation failures (incl. OutOfRange) │
//! │                                                                         │
//! │  niaga-db errors (separate crate)                                      │
//! │  └── DbError            - Database operation failures                  │
//! │                                                                         │
//! │  niaga-api errors (in app)                                             │
//! │  └── ApiError           - What the dashboard sees (code + message)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Display` strings are for logs. [`CoreError::user_message`] and
//! [`ValidationError::user_message`] produce the Indonesian text shown to
//! cashiers and purchasing staff.

use thiserror::Error;

use crate::status::{OrderKind, OrderStatus};

// =============================================================================
// Error Category
// =============================================================================

/// Coarse classification used by outer layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    IllegalTransition,
    Conflict,
    NotFound,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested status change is not in the transition table.
    ///
    /// ## When This Occurs
    /// - Moving a received purchase order back to approved
    /// - Regressing a shipped sales order to processing
    #[error("Illegal {kind:?} order transition: {from:?} -> {to:?}")]
    IllegalTransition {
        kind: OrderKind,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Order content can only change while its status permits edits.
    #[error("Order {order_number} is {status:?}, it can no longer be edited")]
    OrderNotEditable {
        order_number: String,
        status: OrderStatus,
    },

    /// Orders can only be deleted while in draft.
    #[error("Order {order_number} is {status:?}, only drafts can be deleted")]
    OrderNotDeletable {
        order_number: String,
        status: OrderStatus,
    },

    /// Someone else changed the order since it was read.
    #[error("Order {order_number} was modified concurrently (expected version {expected}, found {actual})")]
    StaleVersion {
        order_number: String,
        expected: i64,
        actual: i64,
    },

    /// The cashier already has an open shift.
    #[error("Cashier {cashier_id} already has an open shift")]
    ShiftAlreadyOpen { cashier_id: String },

    /// Closing or selling requires an open shift.
    #[error("Cashier {cashier_id} has no open shift")]
    NoActiveShift { cashier_id: String },

    /// Not enough stock on hand to ship or sell.
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// Inactive products cannot be sold.
    #[error("Product {code} is inactive")]
    ProductInactive { code: String },

    /// Category or unit still referenced by products.
    #[error("{entity} {name} is still used by {product_count} product(s)")]
    StillReferenced {
        entity: String,
        name: String,
        product_count: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns the category outer layers map to a response status.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CoreError::IllegalTransition { .. } => ErrorCategory::IllegalTransition,
            CoreError::OrderNotEditable { .. }
            | CoreError::OrderNotDeletable { .. }
            | CoreError::StaleVersion { .. }
            | CoreError::ShiftAlreadyOpen { .. }
            | CoreError::NoActiveShift { .. }
            | CoreError::InsufficientStock { .. }
            | CoreError::ProductInactive { .. }
            | CoreError::StillReferenced { .. } => ErrorCategory::Conflict,
            CoreError::Validation(_) => ErrorCategory::Validation,
        }
    }

    /// Indonesian message naming the failed precondition.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::IllegalTransition { from, to, .. } => format!(
                "Status tidak dapat diubah dari {} ke {}",
                from.label(),
                to.label()
            ),
            CoreError::OrderNotEditable { order_number, status } => format!(
                "Pesanan {} berstatus {} dan tidak dapat diubah lagi",
                order_number,
                status.label()
            ),
            CoreError::OrderNotDeletable { order_number, status } => format!(
                "Pesanan {} berstatus {}; hanya draft yang dapat dihapus",
                order_number,
                status.label()
            ),
            CoreError::StaleVersion { order_number, .. } => format!(
                "Pesanan {} telah diubah oleh pengguna lain, muat ulang lalu coba lagi",
                order_number
            ),
            CoreError::ShiftAlreadyOpen { .. } => {
                "Masih ada shift yang aktif, tutup shift tersebut terlebih dahulu".to_string()
            }
            CoreError::NoActiveShift { .. } => {
                "Tidak ada shift aktif, buka shift terlebih dahulu".to_string()
            }
            CoreError::InsufficientStock {
                code,
                available,
                requested,
            } => format!(
                "Stok {} tidak mencukupi: tersedia {}, diminta {}",
                code, available, requested
            ),
            CoreError::ProductInactive { code } => {
                format!("Produk {} tidak aktif dan tidak dapat dijual", code)
            }
            CoreError::StillReferenced {
                entity,
                name,
                product_count,
            } => format!(
                "{} {} masih digunakan oleh {} produk",
                entity, name, product_count
            ),
            CoreError::Validation(e) => e.user_message(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs, both in the dashboard forms and at
/// the API boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection must contain at least one element.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range (the monetary `OutOfRangeError`).
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed product code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns true for out-of-range numeric input.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ValidationError::OutOfRange { .. })
    }

    /// Indonesian message for the dashboard.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::Required { field } => format!("{} wajib diisi", field_label(field)),
            ValidationError::Empty { field } => {
                format!("{} minimal harus berisi satu data", field_label(field))
            }
            ValidationError::TooLong { field, max } => {
                format!("{} maksimal {} karakter", field_label(field), max)
            }
            ValidationError::OutOfRange { field, min, max } => format!(
                "{} harus di antara {} dan {}",
                field_label(field),
                min,
                max
            ),
            ValidationError::MustBePositive { field } => {
                format!("{} harus lebih dari nol", field_label(field))
            }
            ValidationError::InvalidFormat { field, reason } => {
                format!("Format {} tidak valid: {}", field_label(field), reason)
            }
        }
    }
}

/// Indonesian label for a wire-level field name.
fn field_label(field: &str) -> &str {
    match field {
        "notes" => "Catatan",
        "opening_cash" => "Kas awal",
        "closing_cash" => "Kas akhir",
        "cashier_id" => "Kasir",
        "supplier" => "Supplier",
        "customer" => "Pelanggan",
        "items" => "Item",
        "product_id" => "Produk",
        "quantity" => "Jumlah",
        "unit_price" => "Harga satuan",
        "discount" => "Diskon",
        "order_discount" => "Diskon pesanan",
        "total_amount" => "Total",
        "paid_amount" => "Jumlah bayar",
        "approved_by" => "Penyetuju",
        "code" => "Kode",
        "name" => "Nama",
        "price" => "Harga jual",
        "cost" => "Harga beli",
        "stock" => "Stok",
        "min_stock" => "Stok minimal",
        other => other,
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: "PRD000001".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for PRD000001: available 3, requested 5"
        );
        assert_eq!(
            err.user_message(),
            "Stok PRD000001 tidak mencukupi: tersedia 3, diminta 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "notes".to_string(),
        };
        assert_eq!(err.to_string(), "notes is required");
        assert_eq!(err.user_message(), "Catatan wajib diisi");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Empty {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_categories() {
        let err = CoreError::IllegalTransition {
            kind: OrderKind::Purchase,
            from: OrderStatus::Received,
            to: OrderStatus::Approved,
        };
        assert_eq!(err.category(), ErrorCategory::IllegalTransition);

        let err = CoreError::OrderNotDeletable {
            order_number: "PO-20260101-0001".to_string(),
            status: OrderStatus::Approved,
        };
        assert_eq!(err.category(), ErrorCategory::Conflict);

        let err: CoreError = ValidationError::Required {
            field: "supplier_id".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
