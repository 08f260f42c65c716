//! # Order Status State Machine
//!
//! One enumerated state machine shared by purchase and sales orders,
//! parameterized by [`OrderKind`].
//!
//! ## Purchase Flow
//! ```text
//!   draft ──► pending_approval ──► approved ──► received ■
//!     │              │   │             │
//!     │              │   └──► rejected ■
//!     ▼              ▼                 ▼
//!  cancelled ■   cancelled ■       cancelled ■
//! ```
//!
//! ## Sales Flow (forward only)
//! ```text
//!   draft(0) ─► confirmed(1) ─► processing(2) ─► shipped(3) ─► delivered(4) ─► completed(5) ■
//!      └──────────────┴─────────────────┴──► cancelled ■   (only before shipped)
//! ```
//!
//! Any later rank may be reached directly (the edit screen offers the whole
//! remaining ladder), but never an earlier one.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Order Kind
// =============================================================================

/// Purchase (to a supplier) or sales (to a customer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderKind {
    Purchase,
    Sales,
}

impl OrderKind {
    /// Prefix of human-readable order numbers (`PO-20260101-0001`).
    pub const fn number_prefix(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "PO",
            OrderKind::Sales => "SO",
        }
    }

    /// Wire name of the counterparty field, used in validation messages.
    pub const fn counterparty_field(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "supplier",
            OrderKind::Sales => "customer",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Purchase => "purchase",
            OrderKind::Sales => "sales",
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Every status an order of either kind can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrderStatus {
    Draft,
    PendingApproval,
    Confirmed,
    Approved,
    Processing,
    Shipped,
    Received,
    Delivered,
    Completed,
    Cancelled,
    Rejected,
}

/// The sales ladder in rank order.
const SALES_LADDER: [OrderStatus; 6] = [
    OrderStatus::Draft,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Completed,
];

impl OrderStatus {
    /// Indonesian label shown in badges and error messages.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::PendingApproval => "Menunggu Persetujuan",
            OrderStatus::Confirmed => "Dikonfirmasi",
            OrderStatus::Approved => "Disetujui",
            OrderStatus::Processing => "Diproses",
            OrderStatus::Shipped => "Dikirim",
            OrderStatus::Received => "Diterima",
            OrderStatus::Delivered => "Terkirim",
            OrderStatus::Completed => "Selesai",
            OrderStatus::Cancelled => "Dibatalkan",
            OrderStatus::Rejected => "Ditolak",
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::PendingApproval => "pending_approval",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Approved => "approved",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Received => "received",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// Position on the sales ladder, `None` for statuses off the ladder.
    pub fn sales_rank(&self) -> Option<usize> {
        SALES_LADDER.iter().position(|s| s == self)
    }

    /// Whether `self` is a status an order of `kind` can hold at all.
    pub fn belongs_to(&self, kind: OrderKind) -> bool {
        match kind {
            OrderKind::Purchase => matches!(
                self,
                OrderStatus::Draft
                    | OrderStatus::PendingApproval
                    | OrderStatus::Approved
                    | OrderStatus::Received
                    | OrderStatus::Rejected
                    | OrderStatus::Cancelled
            ),
            OrderKind::Sales => self.sales_rank().is_some() || *self == OrderStatus::Cancelled,
        }
    }

    /// No transitions leave a terminal status.
    pub fn is_terminal(&self, kind: OrderKind) -> bool {
        available_transitions(*self, kind).is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transition Table
// =============================================================================

/// Legal next statuses of an order of `kind` currently at `current`.
///
/// ## Example
/// ```rust
/// use niaga_core::status::{available_transitions, OrderKind, OrderStatus};
///
/// let next = available_transitions(OrderStatus::PendingApproval, OrderKind::Purchase);
/// assert_eq!(next, vec![OrderStatus::Approved, OrderStatus::Rejected, OrderStatus::Cancelled]);
///
/// assert!(available_transitions(OrderStatus::Received, OrderKind::Purchase).is_empty());
/// ```
pub fn available_transitions(current: OrderStatus, kind: OrderKind) -> Vec<OrderStatus> {
    match kind {
        OrderKind::Purchase => match current {
            OrderStatus::Draft => vec![OrderStatus::PendingApproval, OrderStatus::Cancelled],
            OrderStatus::PendingApproval => vec![
                OrderStatus::Approved,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Approved => vec![OrderStatus::Received, OrderStatus::Cancelled],
            _ => Vec::new(),
        },
        OrderKind::Sales => {
            let Some(rank) = current.sales_rank() else {
                return Vec::new();
            };

            let mut next: Vec<OrderStatus> = SALES_LADDER[rank + 1..].to_vec();
            if rank < shipped_rank() {
                next.push(OrderStatus::Cancelled);
            }
            next
        }
    }
}

/// Statuses an edit screen may offer: the current one plus every legal target.
pub fn selectable_statuses(current: OrderStatus, kind: OrderKind) -> Vec<OrderStatus> {
    let mut statuses = vec![current];
    statuses.extend(available_transitions(current, kind));
    statuses
}

/// Whether `from → to` is in the transition table.
pub fn is_transition_allowed(from: OrderStatus, to: OrderStatus, kind: OrderKind) -> bool {
    available_transitions(from, kind).contains(&to)
}

/// True when a sales order moving `from → to` leaves the warehouse.
///
/// Stock is decremented exactly once, on the first move to rank ≥ shipped.
pub fn crosses_into_shipped(from: OrderStatus, to: OrderStatus) -> bool {
    match (from.sales_rank(), to.sales_rank()) {
        (Some(f), Some(t)) => f < shipped_rank() && t >= shipped_rank(),
        _ => false,
    }
}

const fn shipped_rank() -> usize {
    3
}

// =============================================================================
// Status Policy
// =============================================================================

/// Per-deployment edit/delete permissions.
///
/// `draft` is always editable. Whether a purchase order stays editable while
/// waiting for approval is a configuration point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusPolicy {
    pub purchase_editable_in_pending_approval: bool,
}

impl StatusPolicy {
    pub fn new(purchase_editable_in_pending_approval: bool) -> Self {
        StatusPolicy {
            purchase_editable_in_pending_approval,
        }
    }

    pub fn can_edit(&self, status: OrderStatus, kind: OrderKind) -> bool {
        match status {
            OrderStatus::Draft => true,
            OrderStatus::PendingApproval => {
                kind == OrderKind::Purchase && self.purchase_editable_in_pending_approval
            }
            _ => false,
        }
    }

    pub fn can_delete(&self, status: OrderStatus) -> bool {
        status == OrderStatus::Draft
    }

    /// Rejects transitions outside the table.
    pub fn ensure_transition(
        &self,
        kind: OrderKind,
        from: OrderStatus,
        to: OrderStatus,
    ) -> CoreResult<()> {
        if is_transition_allowed(from, to, kind) {
            Ok(())
        } else {
            Err(CoreError::IllegalTransition { kind, from, to })
        }
    }

    pub fn ensure_editable(
        &self,
        order_number: &str,
        kind: OrderKind,
        status: OrderStatus,
    ) -> CoreResult<()> {
        if self.can_edit(status, kind) {
            Ok(())
        } else {
            Err(CoreError::OrderNotEditable {
                order_number: order_number.to_string(),
                status,
            })
        }
    }

    pub fn ensure_deletable(&self, order_number: &str, status: OrderStatus) -> CoreResult<()> {
        if self.can_delete(status) {
            Ok(())
        } else {
            Err(CoreError::OrderNotDeletable {
                order_number: order_number.to_string(),
                status,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_purchase_table() {
        use OrderStatus::*;
        let k = OrderKind::Purchase;

        assert_eq!(available_transitions(Draft, k), vec![PendingApproval, Cancelled]);
        assert_eq!(available_transitions(Approved, k), vec![Received, Cancelled]);
        assert!(Received.is_terminal(k));
        assert!(Rejected.is_terminal(k));
        assert!(Cancelled.is_terminal(k));
        assert!(!is_transition_allowed(Draft, Approved, k));
    }

    #[test]
    fn test_sales_ladder_is_forward_only() {
        use OrderStatus::*;
        let k = OrderKind::Sales;

        assert_eq!(
            available_transitions(Confirmed, k),
            vec![Processing, Shipped, Delivered, Completed, Cancelled]
        );
        assert_eq!(available_transitions(Shipped, k), vec![Delivered, Completed]);
        assert!(available_transitions(Completed, k).is_empty());
        assert!(!is_transition_allowed(Shipped, Processing, k));
    }

    #[test]
    fn test_sales_cannot_cancel_after_shipping() {
        let next = available_transitions(OrderStatus::Delivered, OrderKind::Sales);
        assert!(!next.contains(&OrderStatus::Cancelled));
    }

    #[test]
    fn test_selectable_includes_current() {
        let statuses = selectable_statuses(OrderStatus::Processing, OrderKind::Sales);
        assert_eq!(statuses[0], OrderStatus::Processing);
        assert!(statuses.contains(&OrderStatus::Shipped));
        assert!(!statuses.contains(&OrderStatus::Confirmed));
    }

    #[test]
    fn test_status_from_other_kind_has_no_transitions() {
        assert!(available_transitions(OrderStatus::Confirmed, OrderKind::Purchase).is_empty());
        assert!(available_transitions(OrderStatus::PendingApproval, OrderKind::Sales).is_empty());
        assert!(!OrderStatus::Shipped.belongs_to(OrderKind::Purchase));
        assert!(OrderStatus::Cancelled.belongs_to(OrderKind::Sales));
    }

    #[test]
    fn test_crosses_into_shipped() {
        use OrderStatus::*;
        assert!(crosses_into_shipped(Processing, Shipped));
        assert!(crosses_into_shipped(Draft, Delivered));
        assert!(!crosses_into_shipped(Shipped, Delivered));
        assert!(!crosses_into_shipped(Confirmed, Cancelled));
    }

    #[test]
    fn test_policy_edit_and_delete() {
        let strict = StatusPolicy::default();
        let lenient = StatusPolicy::new(true);

        assert!(strict.can_edit(OrderStatus::Draft, OrderKind::Sales));
        assert!(!strict.can_edit(OrderStatus::PendingApproval, OrderKind::Purchase));
        assert!(lenient.can_edit(OrderStatus::PendingApproval, OrderKind::Purchase));
        assert!(!lenient.can_edit(OrderStatus::Approved, OrderKind::Purchase));

        assert!(strict.can_delete(OrderStatus::Draft));
        assert!(!strict.can_delete(OrderStatus::Approved));
    }

    #[test]
    fn test_received_to_approved_is_illegal() {
        let err = StatusPolicy::default()
            .ensure_transition(OrderKind::Purchase, OrderStatus::Received, OrderStatus::Approved)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::IllegalTransition);
    }

    #[test]
    fn test_delete_approved_is_conflict() {
        let err = StatusPolicy::default()
            .ensure_deletable("PO-20260101-0001", OrderStatus::Approved)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingApproval).unwrap(),
            r#""pending_approval""#
        );
        let kind: OrderKind = serde_json::from_str(r#""sales""#).unwrap();
        assert_eq!(kind, OrderKind::Sales);
    }
}
