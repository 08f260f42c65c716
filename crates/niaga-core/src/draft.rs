//! # Order Draft
//!
//! The editable form state of a purchase or sales order, as an immutable
//! value updated by a pure reducer.
//!
//! ## Data Flow
//! ```text
//!   OrderDraft ──(DraftAction)──► reduce() ──► OrderDraft'
//!        │
//!        ├── totals(tax_rate)           → OrderTotals (live preview)
//!        └── validate_for_submission()  → Ok / ValidationError
//! ```
//!
//! The dashboard replays user edits as actions; the service replays PATCH
//! bodies through the same reducer before persisting, so both ends agree on
//! clamping and on which discount is active.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::status::OrderKind;
use crate::totals::{
    calculate_line, calculate_order, clamp_unit_price, coerce_quantity, Discount, LineInput,
    LineTotals, OrderTotals,
};
use crate::types::Order;
use crate::validation::{
    validate_gross_total, validate_line_count, validate_monetary_amount, validate_optional_text,
    validate_percentage, validate_quantity, ValidationResult,
};
use crate::{MAX_ITEM_QUANTITY, MAX_MONETARY_AMOUNT};

// =============================================================================
// Draft State
// =============================================================================

/// One line being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftLine {
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    #[serde(default)]
    pub discount: Discount,
}

impl DraftLine {
    pub fn input(&self) -> LineInput {
        LineInput::new(self.quantity, self.unit_price, self.discount)
    }

    pub fn totals(&self) -> LineTotals {
        calculate_line(self.quantity, self.unit_price, self.discount)
    }
}

/// The whole order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDraft {
    pub kind: OrderKind,
    pub counterparty_id: Option<String>,
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub expected_date: Option<NaiveDate>,
    pub items: Vec<DraftLine>,
    pub order_discount: Money,
    pub notes: Option<String>,
    pub shipping_address: Option<String>,
    pub terms_conditions: Option<String>,
}

impl OrderDraft {
    /// An empty form.
    pub fn new(kind: OrderKind) -> Self {
        OrderDraft {
            kind,
            counterparty_id: None,
            order_date: None,
            expected_date: None,
            items: Vec::new(),
            order_discount: Money::zero(),
            notes: None,
            shipping_address: None,
            terms_conditions: None,
        }
    }

    /// Loads a stored order back into an editable form.
    pub fn from_order(order: &Order) -> Self {
        OrderDraft {
            kind: order.kind,
            counterparty_id: Some(order.counterparty_id.clone()),
            order_date: Some(order.order_date),
            expected_date: order.expected_date,
            items: order
                .items
                .iter()
                .map(|line| DraftLine {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    product_code: line.product_code.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount: line.discount(),
                })
                .collect(),
            order_discount: order.discount_amount,
            notes: order.notes.clone(),
            shipping_address: order.shipping_address.clone(),
            terms_conditions: order.terms_conditions.clone(),
        }
    }

    /// Applies one action. Shorthand for [`reduce`].
    pub fn apply(self, action: DraftAction) -> Self {
        reduce(self, action)
    }

    /// Live totals of the form at the given tax rate.
    pub fn totals(&self, tax_rate: Percentage) -> OrderTotals {
        let lines: Vec<LineInput> = self.items.iter().map(DraftLine::input).collect();
        calculate_order(&lines, tax_rate, self.order_discount)
    }

    /// Refuses submission of an incomplete or out-of-range form.
    ///
    /// ## Checks
    /// - counterparty chosen (`supplier` / `customer`)
    /// - at least one line, every line has a product
    /// - quantities, prices and discounts within bounds
    /// - gross order value within the monetary bound
    /// - free-text fields within the length bound
    pub fn validate_for_submission(&self) -> ValidationResult<()> {
        let has_counterparty = self
            .counterparty_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false);
        if !has_counterparty {
            return Err(ValidationError::Required {
                field: self.kind.counterparty_field().to_string(),
            });
        }

        validate_line_count(self.items.len())?;

        for line in &self.items {
            if line.product_id.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "product_id".to_string(),
                });
            }
            validate_quantity(line.quantity)?;
            validate_monetary_amount("unit_price", line.unit_price)?;
            match line.discount {
                Discount::None => {}
                Discount::Percentage(p) => validate_percentage("discount", p)?,
                Discount::Amount(a) => validate_monetary_amount("discount", a)?,
            }
        }
        validate_gross_total(self.items.iter().map(|line| (line.quantity, line.unit_price)))?;

        validate_monetary_amount("order_discount", self.order_discount)?;
        validate_optional_text("notes", self.notes.as_deref())?;
        validate_optional_text("shipping_address", self.shipping_address.as_deref())?;
        validate_optional_text("terms_conditions", self.terms_conditions.as_deref())?;
        Ok(())
    }
}

// =============================================================================
// Actions
// =============================================================================

/// A single edit to the form.
///
/// ## Wire Format
/// ```json
/// {"type": "set_quantity", "index": 0, "raw": "3"}
/// {"type": "set_discount_percentage", "index": 1, "percentage": 1000}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum DraftAction {
    SetCounterparty {
        counterparty_id: Option<String>,
    },
    SetOrderDate {
        #[ts(as = "Option<String>")]
        date: Option<NaiveDate>,
    },
    SetExpectedDate {
        #[ts(as = "Option<String>")]
        date: Option<NaiveDate>,
    },
    /// Adds a line, or bumps the quantity of the line already holding `product_id`.
    AddItem {
        product_id: String,
        product_name: String,
        product_code: String,
        unit_price: Money,
        quantity: i64,
    },
    RemoveItem {
        index: usize,
    },
    /// Quantity as typed; invalid text keeps the previous value.
    SetQuantity {
        index: usize,
        raw: String,
    },
    SetUnitPrice {
        index: usize,
        unit_price: Money,
    },
    SetDiscountPercentage {
        index: usize,
        percentage: Percentage,
    },
    SetDiscountAmount {
        index: usize,
        amount: Money,
    },
    ClearDiscount {
        index: usize,
    },
    SetOrderDiscount {
        amount: Money,
    },
    SetNotes {
        notes: Option<String>,
    },
    SetShippingAddress {
        shipping_address: Option<String>,
    },
    SetTermsConditions {
        terms_conditions: Option<String>,
    },
}

// =============================================================================
// Reducer
// =============================================================================

/// Produces the next draft. Never fails: bad input is clamped and actions
/// naming a missing line are ignored.
///
/// ## Example
/// ```rust
/// use niaga_core::draft::{reduce, DraftAction, OrderDraft};
/// use niaga_core::money::{Money, Percentage};
/// use niaga_core::status::OrderKind;
/// use niaga_core::totals::Discount;
///
/// let draft = reduce(
///     OrderDraft::new(OrderKind::Sales),
///     DraftAction::AddItem {
///         product_id: "p-1".into(),
///         product_name: "Gula Pasir 1kg".into(),
///         product_code: "PRD000001".into(),
///         unit_price: Money::from_rupiah(10_000),
///         quantity: 2,
///     },
/// );
/// let draft = reduce(draft, DraftAction::SetDiscountPercentage { index: 0, percentage: Percentage::from_percent(10) });
/// let draft = reduce(draft, DraftAction::SetDiscountAmount { index: 0, amount: Money::from_rupiah(500) });
///
/// // Setting an amount replaced the percentage.
/// assert_eq!(draft.items[0].discount, Discount::Amount(Money::from_rupiah(500)));
/// ```
pub fn reduce(mut draft: OrderDraft, action: DraftAction) -> OrderDraft {
    match action {
        DraftAction::SetCounterparty { counterparty_id } => {
            draft.counterparty_id = blank_to_none(counterparty_id);
        }
        DraftAction::SetOrderDate { date } => draft.order_date = date,
        DraftAction::SetExpectedDate { date } => draft.expected_date = date,
        DraftAction::AddItem {
            product_id,
            product_name,
            product_code,
            unit_price,
            quantity,
        } => {
            let quantity = quantity.clamp(1, MAX_ITEM_QUANTITY);
            match draft.items.iter_mut().find(|l| l.product_id == product_id) {
                Some(existing) => {
                    existing.quantity = (existing.quantity + quantity).min(MAX_ITEM_QUANTITY);
                }
                None => draft.items.push(DraftLine {
                    product_id,
                    product_name,
                    product_code,
                    quantity,
                    unit_price: clamp_unit_price(unit_price),
                    discount: Discount::None,
                }),
            }
        }
        DraftAction::RemoveItem { index } => {
            if index < draft.items.len() {
                draft.items.remove(index);
            }
        }
        DraftAction::SetQuantity { index, raw } => {
            if let Some(line) = draft.items.get_mut(index) {
                line.quantity = coerce_quantity(&raw, line.quantity);
            }
        }
        DraftAction::SetUnitPrice { index, unit_price } => {
            if let Some(line) = draft.items.get_mut(index) {
                line.unit_price = clamp_unit_price(unit_price);
            }
        }
        DraftAction::SetDiscountPercentage { index, percentage } => {
            if let Some(line) = draft.items.get_mut(index) {
                line.discount = Discount::Percentage(percentage).clamped();
            }
        }
        DraftAction::SetDiscountAmount { index, amount } => {
            if let Some(line) = draft.items.get_mut(index) {
                line.discount = Discount::Amount(amount).clamped();
            }
        }
        DraftAction::ClearDiscount { index } => {
            if let Some(line) = draft.items.get_mut(index) {
                line.discount = Discount::None;
            }
        }
        DraftAction::SetOrderDiscount { amount } => {
            draft.order_discount = amount
                .non_negative()
                .min(Money::from_rupiah(MAX_MONETARY_AMOUNT));
        }
        DraftAction::SetNotes { notes } => draft.notes = blank_to_none(notes),
        DraftAction::SetShippingAddress { shipping_address } => {
            draft.shipping_address = blank_to_none(shipping_address);
        }
        DraftAction::SetTermsConditions { terms_conditions } => {
            draft.terms_conditions = blank_to_none(terms_conditions);
        }
    }
    draft
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================
