//! # Money Module
//!
//! Provides the `Money` type (whole Rupiah) and the `Percentage` type
//! (basis points) used for tax rates and percentage discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rupiah has no subunit in practice. Every amount in the system is a    │
//! │  whole number of Rupiah held in an i64.                                │
//! │                                                                         │
//! │  Percentages produce fractions (Rp 333 × 10% = Rp 33.3). Those are     │
//! │  rounded half-up exactly once, at the point the percentage applies,    │
//! │  using integer arithmetic in i128. No floats anywhere.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use niaga_core::money::{Money, Percentage};
//!
//! let price = Money::from_rupiah(10_000);
//! let line = price * 2;
//! let tax = line.apply_rate(Percentage::from_bps(1100)); // 11%
//! assert_eq!(tax.rupiah(), 2_200);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values appear transiently (variance, refunds)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: travels as a plain JSON number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole Rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole Rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Converts a wide intermediate back to money, clamping at the `i64` range.
    pub fn saturating_from_i128(value: i128) -> Self {
        Money(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Returns the value, or zero when negative.
    #[inline]
    pub fn non_negative(self) -> Self {
        Money(self.0.max(0))
    }

    /// Applies a percentage and returns that share of the amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds half up (5000/10000 = 0.5). Computed in i128 so
    /// amounts near the monetary bound cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use niaga_core::money::{Money, Percentage};
    ///
    /// let subtotal = Money::from_rupiah(23_000);
    /// let tax = subtotal.apply_rate(Percentage::from_bps(1000));
    /// assert_eq!(tax.rupiah(), 2_300);
    ///
    /// // Rp 333 × 10% = Rp 33.3 → Rp 33
    /// assert_eq!(Money::from_rupiah(333).apply_rate(Percentage::from_bps(1000)).rupiah(), 33);
    /// // Rp 335 × 10% = Rp 33.5 → Rp 34
    /// assert_eq!(Money::from_rupiah(335).apply_rate(Percentage::from_bps(1000)).rupiah(), 34);
    /// ```
    pub fn apply_rate(&self, rate: Percentage) -> Money {
        let share = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::saturating_from_i128(share)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use niaga_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(2_500);
    /// assert_eq!(unit_price.multiply_quantity(3).rupiah(), 7_500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way Indonesian receipts do: `Rp 1.250.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sums in `i128` and saturates, so adding many large lines cannot wrap.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money::saturating_from_i128(iter.map(|m| m.0 as i128).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A percentage in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10% and 10000 bps = 100%.
/// Used for tax rates (PPN) and percentage discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// 100% in basis points.
    pub const FULL_BPS: u32 = 10_000;

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Creates a percentage from a whole percent (10 → 10%).
    #[inline]
    pub const fn from_percent(percent: u32) -> Self {
        Percentage(percent * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Caps the value at 100%.
    #[inline]
    pub fn clamped(self) -> Self {
        Percentage(self.0.min(Self::FULL_BPS))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
