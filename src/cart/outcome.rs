//! Line Outcomes
//!
//! Every cart mutation reports what it did. When a requested quantity had to be
//! clamped into `[1, stock]` the outcome carries a [`QuantityNotice`] so callers
//! can tell the shopper.

use std::fmt;

use crate::products::ProductId;

/// A recoverable quantity adjustment made by the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityNotice {
    /// The requested or resulting quantity was above stock and was lowered to it.
    StockExceeded {
        /// Quantity asked for by the caller (for adds, the resulting total).
        requested: i64,

        /// Units available.
        available: u32,
    },

    /// The requested quantity was below one and was raised to one.
    QuantityBelowMinimum {
        /// Quantity asked for by the caller.
        requested: i64,
    },
}

impl fmt::Display for QuantityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityNotice::StockExceeded {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} but only {available} in stock; quantity set to {available}"
            ),
            QuantityNotice::QuantityBelowMinimum { requested } => {
                write!(f, "requested {requested} but the minimum is 1; quantity set to 1")
            }
        }
    }
}

/// Result of a successful cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LineOutcome {
    /// Product whose line changed.
    pub product: ProductId,

    /// Quantity on the line after the mutation.
    pub quantity: u32,

    /// Set when the quantity had to be clamped.
    pub notice: Option<QuantityNotice>,
}

impl LineOutcome {
    /// Returns true if the requested quantity was applied unchanged.
    pub fn is_exact(&self) -> bool {
        self.notice.is_none()
    }
}

/// Clamp a desired total to stock. `desired` is already known to be at least one.
pub(crate) fn clamp_to_stock(desired: u64, stock: u32) -> (u32, Option<QuantityNotice>) {
    if desired > u64::from(stock) {
        let requested = i64::try_from(desired).unwrap_or(i64::MAX);

        (
            stock,
            Some(QuantityNotice::StockExceeded {
                requested,
                available: stock,
            }),
        )
    } else {
        (u32::try_from(desired).map_or(stock, |q| q.min(stock)), None)
    }
}

/// Clamp an arbitrary requested quantity into `[1, stock]`.
pub(crate) fn clamp_to_range(requested: i64, stock: u32) -> (u32, Option<QuantityNotice>) {
    match u64::try_from(requested) {
        Ok(desired) if desired >= 1 => clamp_to_stock(desired, stock),
        _ => (1, Some(QuantityNotice::QuantityBelowMinimum { requested })),
    }
}
