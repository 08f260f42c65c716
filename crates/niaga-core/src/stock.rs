//! Stock-status label classifier.
//!
//! ```text
//!   stock ≤ 0            → Habis    (out of stock, cannot be added to cart)
//!   0 < stock ≤ minimum  → Menipis  (low, reorder soon)
//!   stock > minimum      → Aman     (ok)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Derived inventory sufficiency label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StockStatus {
    Habis,
    Menipis,
    Aman,
}

impl StockStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Habis => "Habis",
            StockStatus::Menipis => "Menipis",
            StockStatus::Aman => "Aman",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies on-hand stock against its reorder threshold.
pub fn classify(stock: i64, minimum: i64) -> StockStatus {
    if stock <= 0 {
        StockStatus::Habis
    } else if stock <= minimum {
        StockStatus::Menipis
    } else {
        StockStatus::Aman
    }
}

/// Whether the POS may put the product in a cart.
#[inline]
pub fn can_add_to_cart(stock: i64) -> bool {
    stock > 0
}
