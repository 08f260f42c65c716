//! # Order Totals Calculator
//!
//! Per-line totals and order-level subtotal/tax/total for purchase orders,
//! sales orders and POS transactions.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each line                                                          │
//! │    gross    = quantity × unit_price                                     │
//! │    discount = Percentage(p) → gross × p   (rounded half up)             │
//! │               Amount(a)     → a                                         │
//! │               None          → 0                                         │
//! │    total    = max(0, gross − discount)                                  │
//! │                                                                         │
//! │  Order                                                                  │
//! │    subtotal = Σ line.total            (line discounts already folded)   │
//! │    tax      = subtotal × tax_rate     (rounded half up)                 │
//! │    total    = max(0, subtotal + tax − order_discount)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here returns an error: out-of-range inputs are clamped. Rejecting
//! bad input is the job of [`crate::validation`] and
//! [`crate::draft::OrderDraft::validate_for_submission`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percentage};
use crate::{MAX_ITEM_QUANTITY, MAX_MONETARY_AMOUNT};

// =============================================================================
// Discount
// =============================================================================

/// Line discount: either a percentage of the line's gross or a fixed amount.
///
/// Being a single tagged value, setting one kind replaces the other.
///
/// ## Wire Format
/// ```json
/// {"type": "percentage", "value": 1000}   // 10% in basis points
/// {"type": "amount", "value": 2500}       // Rp 2.500
/// {"type": "none"}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum Discount {
    #[default]
    None,
    Percentage(Percentage),
    Amount(Money),
}

impl Discount {
    /// Rebuilds a discount from the two persisted columns.
    ///
    /// A positive percentage wins, matching how the line total is computed.
    pub fn from_parts(percentage: Percentage, amount: Money) -> Self {
        if !percentage.is_zero() {
            Discount::Percentage(percentage)
        } else if amount.is_positive() {
            Discount::Amount(amount)
        } else {
            Discount::None
        }
    }

    /// Splits into `(percentage, amount)`; the inactive side is zero.
    pub fn into_parts(self) -> (Percentage, Money) {
        match self {
            Discount::None => (Percentage::zero(), Money::zero()),
            Discount::Percentage(p) => (p, Money::zero()),
            Discount::Amount(a) => (Percentage::zero(), a),
        }
    }

    /// Brings the value into its legal range (0–100%, amount ≥ 0).
    pub fn clamped(self) -> Self {
        match self {
            Discount::None => Discount::None,
            Discount::Percentage(p) if p.is_zero() => Discount::None,
            Discount::Percentage(p) => Discount::Percentage(p.clamped()),
            Discount::Amount(a) if !a.is_positive() => Discount::None,
            Discount::Amount(a) => Discount::Amount(a.min(Money::from_rupiah(MAX_MONETARY_AMOUNT))),
        }
    }

    /// The discount a line of `gross` value would receive, before capping.
    pub fn effective_amount(&self, gross: Money) -> Money {
        match self.clamped() {
            Discount::None => Money::zero(),
            Discount::Percentage(p) => gross.apply_rate(p),
            Discount::Amount(a) => a,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.clamped(), Discount::None)
    }
}

// =============================================================================
// Line Totals
// =============================================================================

/// Inputs for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInput {
    pub quantity: i64,
    pub unit_price: Money,
    pub discount: Discount,
}

impl LineInput {
    pub fn new(quantity: i64, unit_price: Money, discount: Discount) -> Self {
        LineInput {
            quantity,
            unit_price,
            discount,
        }
    }
}

/// Computed totals of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineTotals {
    /// quantity × unit_price
    pub gross: Money,
    /// Discount actually applied (never more than `gross`).
    pub discount: Money,
    /// gross − discount, never negative.
    pub total: Money,
}

/// Computes a line's totals.
///
/// Quantity below 1 is treated as 1 and a negative unit price as 0.
///
/// ## Example
/// ```rust
/// use niaga_core::money::{Money, Percentage};
/// use niaga_core::totals::{calculate_line, Discount};
///
/// let line = calculate_line(2, Money::from_rupiah(10_000), Discount::Percentage(Percentage::from_percent(10)));
/// assert_eq!(line.gross.rupiah(), 20_000);
/// assert_eq!(line.discount.rupiah(), 2_000);
/// assert_eq!(line.total.rupiah(), 18_000);
/// ```
pub fn calculate_line(quantity: i64, unit_price: Money, discount: Discount) -> LineTotals {
    let quantity = quantity.max(1);
    let unit_price = clamp_unit_price(unit_price);

    let gross = unit_price.multiply_quantity(quantity);
    let discount = discount.effective_amount(gross).min(gross);

    LineTotals {
        gross,
        discount,
        total: (gross - discount).non_negative(),
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Computed totals of a whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderTotals {
    /// Sum of line totals (line discounts already applied).
    pub subtotal: Money,
    /// Sum of line discounts, for display only; never subtracted again.
    pub item_discount_total: Money,
    pub tax_rate: Percentage,
    pub tax_amount: Money,
    /// Order-level discount, subtracted once from the grand total.
    pub discount_amount: Money,
    pub total_amount: Money,
}

/// Computes line and order totals.
///
/// The result does not depend on line order.
pub fn calculate_order(
    lines: &[LineInput],
    tax_rate: Percentage,
    order_discount: Money,
) -> OrderTotals {
    let line_totals: Vec<LineTotals> = lines
        .iter()
        .map(|l| calculate_line(l.quantity, l.unit_price, l.discount))
        .collect();

    let subtotal: Money = line_totals.iter().map(|l| l.total).sum();
    let item_discount_total: Money = line_totals.iter().map(|l| l.discount).sum();
    let tax_amount = subtotal.apply_rate(tax_rate);
    let discount_amount = order_discount.non_negative();

    OrderTotals {
        subtotal,
        item_discount_total,
        tax_rate,
        tax_amount,
        discount_amount,
        total_amount: Money::saturating_from_i128(
            subtotal.rupiah() as i128 + tax_amount.rupiah() as i128 - discount_amount.rupiah() as i128,
        )
        .non_negative(),
    }
}

// =============================================================================
// Input Coercion
// =============================================================================

/// Interprets a quantity typed into a form.
///
/// Non-numeric, zero or negative input falls back to `prior` (or 1 when the
/// prior value is itself invalid). Values above the per-line maximum are capped.
///
/// ## Example
/// ```rust
/// use niaga_core::totals::coerce_quantity;
///
/// assert_eq!(coerce_quantity("5", 2), 5);
/// assert_eq!(coerce_quantity("-3", 2), 2);
/// assert_eq!(coerce_quantity("abc", 0), 1);
/// ```
pub fn coerce_quantity(raw: &str, prior: i64) -> i64 {
    let fallback = if prior >= 1 {
        prior.min(MAX_ITEM_QUANTITY)
    } else {
        1
    };

    match raw.trim().parse::<i64>() {
        Ok(qty) if qty >= 1 => qty.min(MAX_ITEM_QUANTITY),
        _ => fallback,
    }
}

/// Clamps a unit price into `[0, MAX_MONETARY_AMOUNT]`.
pub fn clamp_unit_price(price: Money) -> Money {
    price
        .non_negative()
        .min(Money::from_rupiah(MAX_MONETARY_AMOUNT))
}

// =============================================================================
// Unit Tests
// =============================================================================
