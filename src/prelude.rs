//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineOutcome, QuantityNotice},
    catalog::{CatalogError, InMemoryCatalog, ProductCatalog, ProductPage, ProductQuery},
    checkout::{
        CheckoutError, CustomerDetails, CustomerError, CustomerIdentity, InMemoryOrderStore,
        InvoiceNumber, OrderConfirmation, OrderDraft, OrderId, OrderSubmitter, SubmissionError,
        place_order,
    },
    fixtures::{Fixture, FixtureError},
    pricing::{
        OrderTotals, PresentedTotals, PricingError, goods_subtotal, grand_total, line_gross_total,
        line_net_total, line_tax, line_tax_total, round_for_presentation, shipping_cost,
        total_tax,
    },
    products::{Product, ProductError, ProductId},
    receipt::{Receipt, ReceiptError},
    session::{SessionError, ShoppingSession},
    shipping::{ShippingError, ShippingMethod, ShippingRates},
    tags::TagSet,
};
