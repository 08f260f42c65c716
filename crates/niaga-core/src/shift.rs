//! # Shift Cash Reconciliation
//!
//! Opening and closing a cashier's drawer.
//!
//! ## Close-out Math
//! ```text
//!   expected_cash = opening_cash + total_sales
//!   variance      = closing_cash − expected_cash
//!
//!   variance = 0  → Balanced
//!   variance > 0  → Over   (more cash than expected)
//!   variance < 0  → Short  (cash missing)
//! ```
//!
//! A non-zero variance is reported, never enforced: the shift closes anyway.
//! Uniqueness of the open shift per cashier lives in the storage layer.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_monetary_amount, validate_required_text};

// =============================================================================
// Open / Close Requests
// =============================================================================

/// A validated request to open a shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftOpening {
    cashier_id: String,
    opening_cash: Money,
    notes: String,
}

impl ShiftOpening {
    /// Validates an opening: cashier and notes required, cash within bounds.
    ///
    /// ## Example
    /// ```rust
    /// use niaga_core::money::Money;
    /// use niaga_core::shift::ShiftOpening;
    ///
    /// let opening = ShiftOpening::new("kasir-1", Money::from_rupiah(100_000), "Shift pagi").unwrap();
    /// assert_eq!(opening.opening_cash().rupiah(), 100_000);
    ///
    /// assert!(ShiftOpening::new("kasir-1", Money::from_rupiah(100_000), "  ").is_err());
    /// ```
    pub fn new(cashier_id: &str, opening_cash: Money, notes: &str) -> Result<Self, ValidationError> {
        let cashier_id = validate_required_text("cashier_id", cashier_id)?;
        validate_monetary_amount("opening_cash", opening_cash)?;
        let notes = validate_required_text("notes", notes)?;

        Ok(ShiftOpening {
            cashier_id,
            opening_cash,
            notes,
        })
    }

    pub fn cashier_id(&self) -> &str {
        &self.cashier_id
    }

    pub fn opening_cash(&self) -> Money {
        self.opening_cash
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

/// A validated request to close the active shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftClosing {
    closing_cash: Money,
    notes: String,
}

impl ShiftClosing {
    pub fn new(closing_cash: Money, notes: &str) -> Result<Self, ValidationError> {
        validate_monetary_amount("closing_cash", closing_cash)?;
        let notes = validate_required_text("notes", notes)?;

        Ok(ShiftClosing {
            closing_cash,
            notes,
        })
    }

    pub fn closing_cash(&self) -> Money {
        self.closing_cash
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

// =============================================================================
// Statistics & Reconciliation
// =============================================================================

/// Sales aggregated over the transactions of one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ShiftStats {
    pub total_sales: Money,
    /// Portion of `total_sales` paid in cash. Informational.
    pub cash_sales: Money,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VarianceKind {
    Balanced,
    Over,
    Short,
}

/// Result of closing a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reconciliation {
    pub opening_cash: Money,
    pub total_sales: Money,
    pub expected_cash: Money,
    pub closing_cash: Money,
    pub variance: Money,
    pub variance_kind: VarianceKind,
}

/// Cash the drawer should hold: opening balance plus the shift's sales.
pub fn expected_cash(opening_cash: Money, stats: &ShiftStats) -> Money {
    opening_cash + stats.total_sales
}

/// Compares declared closing cash against the expected amount.
///
/// ## Example
/// ```rust
/// use niaga_core::money::Money;
/// use niaga_core::shift::{reconcile, ShiftStats, VarianceKind};
///
/// let stats = ShiftStats {
///     total_sales: Money::from_rupiah(250_000),
///     cash_sales: Money::from_rupiah(250_000),
///     transaction_count: 12,
/// };
/// let r = reconcile(Money::from_rupiah(100_000), &stats, Money::from_rupiah(350_000));
/// assert_eq!(r.expected_cash.rupiah(), 350_000);
/// assert_eq!(r.variance_kind, VarianceKind::Balanced);
/// ```
pub fn reconcile(opening_cash: Money, stats: &ShiftStats, closing_cash: Money) -> Reconciliation {
    let expected_cash = expected_cash(opening_cash, stats);
    let variance = closing_cash - expected_cash;

    let variance_kind = if variance.is_zero() {
        VarianceKind::Balanced
    } else if variance.is_positive() {
        VarianceKind::Over
    } else {
        VarianceKind::Short
    };

    Reconciliation {
        opening_cash,
        total_sales: stats.total_sales,
        expected_cash,
        closing_cash,
        variance,
        variance_kind,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_MONETARY_AMOUNT;

    fn stats(total: i64) -> ShiftStats {
        ShiftStats {
            total_sales: Money::from_rupiah(total),
            cash_sales: Money::from_rupiah(total),
            transaction_count: 1,
        }
    }

    #[test]
    fn test_opening_requires_notes_and_cashier() {
        let err = ShiftOpening::new("kasir-1", Money::zero(), "").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "notes".to_string()
            }
        );
        assert!(ShiftOpening::new("", Money::zero(), "pagi").is_err());
    }

    #[test]
    fn test_opening_cash_bounds() {
        assert!(ShiftOpening::new("k", Money::from_rupiah(MAX_MONETARY_AMOUNT), "ok").is_ok());
        let err = ShiftOpening::new("k", Money::from_rupiah(MAX_MONETARY_AMOUNT + 1), "ok")
            .unwrap_err();
        assert!(err.is_out_of_range());
        assert!(ShiftOpening::new("k", Money::from_rupiah(-1), "ok").is_err());
    }

    #[test]
    fn test_closing_validation() {
        assert!(ShiftClosing::new(Money::from_rupiah(350_000), "tutup").is_ok());
        assert!(ShiftClosing::new(Money::from_rupiah(350_000), " ").is_err());
        assert!(ShiftClosing::new(Money::from_rupiah(-5), "tutup").is_err());
    }

    #[test]
    fn test_balanced_close() {
        let r = reconcile(Money::from_rupiah(100_000), &stats(250_000), Money::from_rupiah(350_000));
        assert_eq!(r.variance, Money::zero());
        assert_eq!(r.variance_kind, VarianceKind::Balanced);
    }

    #[test]
    fn test_over_and_short() {
        let over = reconcile(Money::from_rupiah(100_000), &stats(250_000), Money::from_rupiah(351_000));
        assert_eq!(over.variance, Money::from_rupiah(1_000));
        assert_eq!(over.variance_kind, VarianceKind::Over);

        let short = reconcile(Money::from_rupiah(100_000), &stats(250_000), Money::from_rupiah(340_000));
        assert_eq!(short.variance, Money::from_rupiah(-10_000));
        assert_eq!(short.variance_kind, VarianceKind::Short);
    }

    #[test]
    fn test_empty_shift_expects_opening_cash() {
        let r = reconcile(Money::from_rupiah(50_000), &ShiftStats::default(), Money::from_rupiah(50_000));
        assert_eq!(r.expected_cash, Money::from_rupiah(50_000));
        assert_eq!(r.variance_kind, VarianceKind::Balanced);
    }
}
