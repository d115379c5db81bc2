//! Orders

use std::fmt;

use rand::Rng;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartLine},
    pricing::PresentedTotals,
    products::ProductId,
    shipping::ShippingMethod,
};

use super::customer::{CustomerDetails, CustomerIdentity};

/// Identifier assigned to an order by the order store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Wrap an identifier returned by the order store.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub fn get(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Order lifecycle state. New orders are always pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    /// Awaiting fulfilment
    #[default]
    Pending,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => f.write_str("pending"),
        }
    }
}

/// Invoice number of the form `INV-NNNNNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoiceNumber(u32);

impl InvoiceNumber {
    /// Smallest invoice number.
    pub const MIN: u32 = 100_000;

    /// Largest invoice number.
    pub const MAX: u32 = 999_999;

    /// Draw a random six-digit invoice number.
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    /// The numeric part.
    #[must_use]
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INV-{}", self.0)
    }
}

/// A cart line frozen into an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineSnapshot {
    /// Product identifier
    pub product: ProductId,

    /// Product name
    pub name: String,

    /// Unit price excluding tax, exact
    pub unit_price: Decimal,

    /// Tax rate as a decimal fraction
    pub tax_rate: Decimal,

    /// Units ordered
    pub quantity: u32,
}

impl From<&CartLine> for OrderLineSnapshot {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product_id(),
            name: line.product().name.clone(),
            unit_price: line.unit_price(),
            tax_rate: line.tax_fraction(),
            quantity: line.quantity(),
        }
    }
}

/// Finalized order handed to the order store.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Customer the order belongs to
    pub customer_id: Uuid,

    /// Contact email
    pub email: String,

    /// Ordered lines, in cart order
    pub lines: Vec<OrderLineSnapshot>,

    /// Presented totals, shipping included
    pub totals: PresentedTotals,

    /// Selected shipping method
    pub shipping_method: ShippingMethod,

    /// `address, city, postal code, country`
    pub shipping_address: String,

    /// Order state
    pub status: OrderStatus,
}

impl OrderDraft {
    /// Snapshot a cart for submission.
    #[must_use]
    pub fn new(
        cart: &Cart,
        totals: PresentedTotals,
        shipping_method: ShippingMethod,
        customer: &CustomerDetails,
        identity: &CustomerIdentity,
    ) -> Self {
        Self {
            customer_id: identity.customer_id(),
            email: customer.email.trim().to_string(),
            lines: cart.iter().map(OrderLineSnapshot::from).collect(),
            totals,
            shipping_method,
            shipping_address: customer.shipping_address(),
            status: OrderStatus::Pending,
        }
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    /// Identifier assigned by the order store
    pub order_id: OrderId,

    /// Invoice number, when it could be recorded
    pub invoice_number: Option<InvoiceNumber>,

    /// Guest customer number, for guest checkouts
    pub customer_number: Option<String>,

    /// The submitted order
    pub order: OrderDraft,
}
