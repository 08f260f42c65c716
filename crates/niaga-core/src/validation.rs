//! # Validation Module
//!
//! Input validators shared by the dashboard forms and the REST service.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Dashboard (TypeScript, advisory)                              │
//! │  ├── Disabled buttons, inline hints                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: niaga-api handlers (authoritative)                            │
//! │  └── THIS MODULE: required fields, monetary bounds, formats             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                        │
//! │  ├── CHECK / UNIQUE / FOREIGN KEY constraints                           │
//! │  └── Conditional updates (stock, version, one open shift)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use niaga_core::money::Money;
//! use niaga_core::validation::{validate_monetary_amount, validate_quantity};
//!
//! assert!(validate_monetary_amount("opening_cash", Money::from_rupiah(100_000)).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::{MAX_ITEM_QUANTITY, MAX_MONETARY_AMOUNT, MAX_ORDER_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for stock counts and reorder thresholds.
pub const MAX_STOCK_QUANTITY: i64 = 999_999_999;

/// Longest accepted free-text field (notes, addresses, terms).
pub const MAX_TEXT_LENGTH: usize = 2000;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount against `[0, MAX_MONETARY_AMOUNT]`.
///
/// ## Example
/// ```rust
/// use niaga_core::money::Money;
/// use niaga_core::validation::validate_monetary_amount;
/// use niaga_core::MAX_MONETARY_AMOUNT;
///
/// assert!(validate_monetary_amount("closing_cash", Money::from_rupiah(MAX_MONETARY_AMOUNT)).is_ok());
/// assert!(validate_monetary_amount("closing_cash", Money::from_rupiah(MAX_MONETARY_AMOUNT + 1)).is_err());
/// assert!(validate_monetary_amount("closing_cash", Money::from_rupiah(-1)).is_err());
/// ```
pub fn validate_monetary_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() || amount.rupiah() > MAX_MONETARY_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_MONETARY_AMOUNT,
        });
    }
    Ok(())
}

/// Validates a line quantity (1 to `MAX_ITEM_QUANTITY`).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a stock count or threshold (never negative).
pub fn validate_stock_count(field: &str, count: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK_QUANTITY).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a percentage (discount or tax) is at most 100%.
pub fn validate_percentage(field: &str, pct: Percentage) -> ValidationResult<()> {
    if pct.bps() > Percentage::FULL_BPS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: Percentage::FULL_BPS as i64,
        });
    }
    Ok(())
}

/// Validates the number of lines on an order or sale.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }
    if count > MAX_ORDER_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        });
    }
    Ok(())
}

/// Validates the gross value of an order, quantity times unit price summed
/// over `lines`, against the monetary bound.
///
/// The sum is taken in `i128`, so any number of in-range lines is safe to
/// check before totals are computed.
pub fn validate_gross_total<I>(lines: I) -> ValidationResult<()>
where
    I: IntoIterator<Item = (i64, Money)>,
{
    let gross: i128 = lines
        .into_iter()
        .map(|(quantity, unit_price)| quantity as i128 * unit_price.rupiah() as i128)
        .sum();
    if gross > MAX_MONETARY_AMOUNT as i128 {
        return Err(ValidationError::OutOfRange {
            field: "total_amount".to_string(),
            min: 0,
            max: MAX_MONETARY_AMOUNT,
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Requires non-blank text and returns it trimmed.
///
/// ## Example
/// ```rust
/// use niaga_core::validation::validate_required_text;
///
/// assert_eq!(validate_required_text("notes", "  shift pagi ").unwrap(), "shift pagi");
/// assert!(validate_required_text("notes", "   ").is_err());
/// ```
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Normalizes optional free text: blank becomes `None`, length is bounded.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.chars().count() > MAX_TEXT_LENGTH => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LENGTH,
        }),
        Some(v) => Ok(Some(v.to_string())),
    }
}

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty, at most 50 characters
/// - Letters, digits, hyphens and underscores only
pub fn validate_product_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "hanya huruf, angka, tanda hubung dan garis bawah".to_string(),
        });
    }

    Ok(code.to_string())
}

/// Validates a display name (product, category, unit), at most 200 characters.
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

/// Validates a UUID string.
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "bukan UUID yang valid".to_string(),
    })?;
    Ok(())
}

// =============================================================================
// Generated Identifiers
// =============================================================================

/// Prefix of system-generated product codes.
pub const PRODUCT_CODE_PREFIX: &str = "PRD";

/// Next system-generated product code after the highest existing one.
///
/// ## Example
/// ```rust
/// use niaga_core::validation::next_product_code;
///
/// assert_eq!(next_product_code(None), "PRD000001");
/// assert_eq!(next_product_code(Some("PRD000041")), "PRD000042");
/// ```
pub fn next_product_code(highest: Option<&str>) -> String {
    let last = highest
        .and_then(|code| code.strip_prefix(PRODUCT_CODE_PREFIX))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0);

    format!("{}{:06}", PRODUCT_CODE_PREFIX, last + 1)
}

/// Formats a daily-sequenced document number: `PO-20260314-0007`.
pub fn format_document_number(prefix: &str, date: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{:04}", prefix, date.format("%Y%m%d"), sequence)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monetary_bounds() {
        assert!(validate_monetary_amount("opening_cash", Money::zero()).is_ok());
        let err = validate_monetary_amount("opening_cash", Money::from_rupiah(10_000_000_000_000))
            .unwrap_err();
        assert!(err.is_out_of_range());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_percentage() {
        assert!(validate_percentage("discount", Percentage::from_percent(100)).is_ok());
        assert!(validate_percentage("discount", Percentage::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_line_count() {
        assert_eq!(
            validate_line_count(0),
            Err(ValidationError::Empty {
                field: "items".to_string()
            })
        );
        assert!(validate_line_count(MAX_ORDER_LINES + 1).is_err());
    }

    #[test]
    fn test_gross_total() {
        let max = Money::from_rupiah(MAX_MONETARY_AMOUNT);
        assert!(validate_gross_total([(1, max)]).is_ok());
        assert!(validate_gross_total([(1, max), (1, Money::from_rupiah(1))]).is_err());

        let worst = std::iter::repeat((MAX_ITEM_QUANTITY, max)).take(MAX_ORDER_LINES);
        assert_eq!(
            validate_gross_total(worst),
            Err(ValidationError::OutOfRange {
                field: "total_amount".to_string(),
                min: 0,
                max: MAX_MONETARY_AMOUNT,
            })
        );
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(validate_optional_text("notes", Some("  ")).unwrap(), None);
        assert_eq!(validate_optional_text("notes", None).unwrap(), None);
        assert_eq!(
            validate_optional_text("notes", Some(" kirim pagi ")).unwrap(),
            Some("kirim pagi".to_string())
        );
        let long = "x".repeat(MAX_TEXT_LENGTH + 1);
        assert!(validate_optional_text("notes", Some(&long)).is_err());
    }

    #[test]
    fn test_product_code() {
        assert_eq!(validate_product_code(" PRD000001 ").unwrap(), "PRD000001");
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("PRD 01").is_err());
    }

    #[test]
    fn test_uuid() {
        assert!(validate_uuid("product_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("product_id", "not-a-uuid").is_err());
    }

    #[test]
    fn test_next_product_code_ignores_foreign_codes() {
        assert_eq!(next_product_code(Some("SKU-77")), "PRD000001");
        assert_eq!(next_product_code(Some("PRD999999")), "PRD1000000");
    }

    #[test]
    fn test_document_number() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(format_document_number("PO", date, 7), "PO-20260314-0007");
    }
}
