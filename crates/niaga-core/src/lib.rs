//! # niaga-core: Pure Business Logic for Niaga
//!
//! Business rules for the Niaga ERP + point-of-sale backend, written as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Niaga Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Dashboard UI (TypeScript bindings)               │   │
//! │  │    PO form ──► SO form ──► POS cart ──► Shift open/close        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    niaga-api (axum handlers)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ niaga-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ totals  │ │ status  │ │  draft  │ │  shift  │ │  stock  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    niaga-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Rupiah amounts and basis-point percentages
//! - [`totals`] - Line and order totals calculator
//! - [`status`] - Purchase/sales order state machine
//! - [`draft`] - Immutable order draft with a pure reducer
//! - [`shift`] - Cash-drawer open/close reconciliation
//! - [`stock`] - Stock-status label classifier
//! - [`types`] - Persisted domain entities
//! - [`validation`] - Input validators shared by UI and service
//! - [`error`] - Domain error taxonomy
//!
//! ## Example Usage
//!
//! ```rust
//! use niaga_core::money::{Money, Percentage};
//! use niaga_core::totals::{calculate_order, Discount, LineInput};
//!
//! let lines = [
//!     LineInput::new(2, Money::from_rupiah(10_000), Discount::Percentage(Percentage::from_bps(1000))),
//!     LineInput::new(1, Money::from_rupiah(5_000), Discount::None),
//! ];
//! let totals = calculate_order(&lines, Percentage::from_bps(1000), Money::zero());
//!
//! assert_eq!(totals.subtotal.rupiah(), 23_000);
//! assert_eq!(totals.tax_amount.rupiah(), 2_300);
//! assert_eq!(totals.total_amount.rupiah(), 25_300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod shift;
pub mod status;
pub mod stock;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percentage};
pub use status::{OrderKind, OrderStatus, StatusPolicy};
pub use stock::StockStatus;
pub use totals::{Discount, LineTotals, OrderTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest monetary amount accepted anywhere, in Rupiah.
///
/// Mirrors the integral part of the fixed-precision (15,2) money column used
/// by the storage layer. Amounts above this fail with
/// [`ValidationError::OutOfRange`].
pub const MAX_MONETARY_AMOUNT: i64 = 9_999_999_999_999;

/// Maximum quantity on a single order line.
///
/// Prevents accidental over-ordering (typing 10000 instead of 100).
pub const MAX_ITEM_QUANTITY: i64 = 99_999;

/// Maximum number of lines on one order or POS transaction.
pub const MAX_ORDER_LINES: usize = 200;

/// Default tax rate (PPN) in basis points: 10%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1000;
