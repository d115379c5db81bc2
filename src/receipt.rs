//! Receipt
//!
//! Order summary for a cart: one row per line plus the totals block. Every
//! figure is rounded once from its exact value.

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    Table,
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    pricing::{
        OrderTotals, PresentedTotals, PricingError, line_gross_total, line_tax,
        round_for_presentation,
    },
    products::ProductId,
    shipping::{ShippingMethod, ShippingRates},
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be presented.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing the receipt failed.
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// One printed line of the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Product on the line
    pub product: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price excluding tax
    pub unit_price: Money<'static, Currency>,

    /// Tax per unit
    pub unit_tax: Money<'static, Currency>,

    /// Line total including tax
    pub gross_total: Money<'static, Currency>,
}

impl ReceiptLine {
    fn from_cart_line(line: &CartLine, currency: &'static Currency) -> Result<Self, PricingError> {
        Ok(Self {
            product: line.product_id(),
            name: line.product().name.clone(),
            quantity: line.quantity(),
            unit_price: round_for_presentation(line.unit_price(), currency)?,
            unit_tax: round_for_presentation(line_tax(line), currency)?,
            gross_total: round_for_presentation(line_gross_total(line), currency)?,
        })
    }
}

/// Order summary ready for display.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    shipping_method: ShippingMethod,
    totals: PresentedTotals,
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt for a cart and shipping selection.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Pricing`] if any amount is too large to present.
    pub fn from_cart(
        cart: &Cart,
        rates: &ShippingRates,
        method: ShippingMethod,
    ) -> Result<Self, ReceiptError> {
        let currency = cart.currency();

        let lines = cart
            .iter()
            .map(|line| ReceiptLine::from_cart_line(line, currency))
            .collect::<Result<SmallVec<_>, _>>()?;

        let totals = OrderTotals::calculate(cart, rates, method).present(currency)?;

        Ok(Self {
            lines,
            shipping_method: method,
            totals,
            currency,
        })
    }

    /// Printed lines in cart order.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Shipping method the totals were calculated with.
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Presented totals.
    pub fn totals(&self) -> &PresentedTotals {
        &self.totals
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Prints the receipt: the line table, then the totals block aligned to its
    /// right edge.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let lines = self.lines_table();
        let summary = self.summary_table();
        let indent = lines.total_width().saturating_sub(summary.total_width());

        writeln!(out, "\n{lines}")?;

        for row in summary.to_string().lines() {
            writeln!(out, "{:indent$}{row}", "")?;
        }

        writeln!(out)?;

        Ok(())
    }

    fn lines_table(&self) -> Table {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Unit Tax", "Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.unit_tax.to_string(),
                line.gross_total.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        table
    }

    fn summary_table(&self) -> Table {
        let totals = &self.totals;
        let mut builder = Builder::default();

        builder.push_record(["Subtotal:".to_string(), totals.goods_subtotal.to_string()]);
        builder.push_record([
            format!("Shipping ({}):", self.shipping_method),
            totals.shipping_cost.to_string(),
        ]);
        builder.push_record(["Tax:".to_string(), totals.tax_total.to_string()]);
        builder.push_record(["Total:".to_string(), totals.grand_total.to_string()]);

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::new(0..2), Alignment::right());
        table.modify(Rows::last(), Color::BOLD);

        table
    }
}
