//! Cart
//!
//! The cart ledger for one shopping session: an insertion-ordered set of
//! [`CartLine`]s, at most one per product, each holding between one unit and
//! the product's stock.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, warn};

use crate::products::{Product, ProductError, ProductId};

pub mod line;
pub mod outcome;

pub use line::CartLine;
pub use outcome::{LineOutcome, QuantityNotice};

use outcome::{clamp_to_range, clamp_to_stock};

/// Errors that reject a cart mutation without changing the cart.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Requested quantity to add was not a positive integer.
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    /// Product failed validation.
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),

    /// Product has no stock, so no line can be created or kept.
    #[error("product {0} is out of stock")]
    OutOfStock(ProductId),

    /// No line exists for the product.
    #[error("product {0} is not in the cart")]
    LineNotFound(ProductId),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart priced in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// A new line takes a snapshot of the product. An existing line keeps its
    /// price and tax snapshot but takes the stock figure from `product`, which is
    /// treated as authoritative at the moment of the call. The resulting
    /// quantity is clamped to stock and reported through the outcome.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero or negative.
    /// - [`CartError::InvalidProduct`]: the product has a negative price or tax rate.
    /// - [`CartError::OutOfStock`]: the product has no stock. Any existing line
    ///   for it is removed.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> Result<LineOutcome, CartError> {
        let requested = u64::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CartError::InvalidQuantity(quantity))?;

        product.validate()?;

        if product.stock == 0 {
            // A line never outlives its stock.
            if self.remove_line(product.id).is_some() {
                warn!(product = %product.id, "removed cart line, product is out of stock");
            }

            return Err(CartError::OutOfStock(product.id));
        }

        let outcome = if let Some(line) = self.line_mut(product.id) {
            let desired = u64::from(line.quantity()).saturating_add(requested);
            let (new_quantity, notice) = clamp_to_stock(desired, product.stock);

            line.set_stock(product.stock);
            line.set_quantity(new_quantity);

            LineOutcome {
                product: product.id,
                quantity: new_quantity,
                notice,
            }
        } else {
            let (new_quantity, notice) = clamp_to_stock(requested, product.stock);

            self.lines.push(CartLine::new(product.clone(), new_quantity));

            LineOutcome {
                product: product.id,
                quantity: new_quantity,
                notice,
            }
        };

        log_outcome("add_line", &outcome);

        Ok(outcome)
    }

    /// Set the quantity of an existing line, clamped into `[1, stock]`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the product has no line.
    pub fn update_quantity(
        &mut self,
        product: ProductId,
        quantity: i64,
    ) -> Result<LineOutcome, CartError> {
        let line = self
            .line_mut(product)
            .ok_or(CartError::LineNotFound(product))?;

        let (new_quantity, notice) = clamp_to_range(quantity, line.stock());

        line.set_quantity(new_quantity);

        let outcome = LineOutcome {
            product,
            quantity: new_quantity,
            notice,
        };

        log_outcome("update_quantity", &outcome);

        Ok(outcome)
    }

    /// Remove the line for a product. Removing an absent product does nothing.
    pub fn remove_line(&mut self, product: ProductId) -> Option<CartLine> {
        let idx = self.lines.iter().position(|line| line.product_id() == product)?;

        debug!(product = %product, "removed cart line");

        Some(self.lines.remove(idx))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        debug!(lines = self.lines.len(), "cleared cart");

        self.lines.clear();
    }

    /// Current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Get the line for a product.
    pub fn get_line(&self, product: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn line_mut(&mut self, product: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product)
    }
}

fn log_outcome(operation: &'static str, outcome: &LineOutcome) {
    if let Some(notice) = outcome.notice {
        warn!(
            operation,
            product = %outcome.product,
            quantity = outcome.quantity,
            %notice,
            "cart quantity clamped"
        );
    } else {
        debug!(
            operation,
            product = %outcome.product,
            quantity = outcome.quantity,
            "cart line updated"
        );
    }
}
