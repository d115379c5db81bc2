//! Cart Lines

use rust_decimal::Decimal;

use crate::products::{Product, ProductId};

/// One product-and-quantity entry in a cart.
///
/// The product is a snapshot taken when the line was created; price and tax
/// never change afterwards. Only the stock bound is refreshed on later adds.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    pub(crate) fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Snapshot of the product on this line.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Identifier of the product on this line.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Units of the product in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Tax-exclusive unit price captured at add-time.
    pub fn unit_price(&self) -> Decimal {
        self.product.unit_price
    }

    /// Tax rate captured at add-time, as a decimal fraction.
    pub fn tax_fraction(&self) -> Decimal {
        self.product.tax_fraction()
    }

    /// Stock bound for this line.
    pub fn stock(&self) -> u32 {
        self.product.stock
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_stock(&mut self, stock: u32) {
        self.product.stock = stock;
    }
}
