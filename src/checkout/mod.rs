//! Checkout
//!
//! Turns a cart into a submitted order. Collaborator calls are made strictly in
//! sequence and the cart is only cleared once the order has been accepted.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    pricing::{OrderTotals, PricingError},
    shipping::{ShippingMethod, ShippingRates},
};

pub mod customer;
pub mod order;
pub mod submitter;

pub use customer::{CustomerDetails, CustomerError, CustomerIdentity, CustomerRecord};
pub use order::{
    InvoiceNumber, OrderConfirmation, OrderDraft, OrderId, OrderLineSnapshot, OrderStatus,
};
pub use submitter::{
    InMemoryOrderStore, MockOrderSubmitter, OrderSubmitter, StoredOrder, SubmissionError,
};

/// Errors that stop a checkout. The cart is untouched when one is returned.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cannot check out an empty cart")]
    EmptyCartCheckout,

    /// Customer details failed validation.
    #[error(transparent)]
    InvalidCustomer(#[from] CustomerError),

    /// The order store rejected the customer or the order.
    #[error("order submission failed")]
    Submission(#[from] SubmissionError),

    /// Totals could not be presented.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Submit the cart as an order and clear it.
///
/// Guests are recorded with the order store before the order is inserted. A
/// failure to attach the invoice number is logged and leaves the invoice number
/// off the confirmation, since the order already exists at that point.
///
/// # Errors
///
/// - [`CheckoutError::InvalidCustomer`]: a required customer field is blank or the email is malformed.
/// - [`CheckoutError::EmptyCartCheckout`]: the cart has no lines.
/// - [`CheckoutError::Pricing`]: a total is too large to present.
/// - [`CheckoutError::Submission`]: the order store failed to record the customer or order.
pub async fn place_order<S>(
    cart: &mut Cart,
    rates: &ShippingRates,
    method: ShippingMethod,
    customer: &CustomerDetails,
    identity: &CustomerIdentity,
    submitter: &S,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: OrderSubmitter + ?Sized,
{
    customer.validate()?;

    if cart.is_empty() {
        return Err(CheckoutError::EmptyCartCheckout);
    }

    let totals = OrderTotals::calculate(cart, rates, method).present(cart.currency())?;
    let draft = OrderDraft::new(cart, totals, method, customer, identity);
    let invoice = InvoiceNumber::generate(&mut rand::thread_rng());

    if let CustomerIdentity::Guest {
        id,
        customer_number,
    } = identity
    {
        info!(%customer_number, "recording guest customer");

        submitter
            .upsert_customer(&CustomerRecord {
                id: *id,
                customer_number: customer_number.clone(),
                details: customer.clone(),
            })
            .await?;
    }

    let order_id = submitter.insert_order(&draft).await?;

    info!(
        order = %order_id,
        lines = draft.lines.len(),
        total = %draft.totals.grand_total,
        shipping = %method,
        "order submitted"
    );

    let invoice_number = match submitter.assign_invoice_number(order_id, &invoice).await {
        Ok(()) => Some(invoice),
        Err(err) => {
            warn!(order = %order_id, %invoice, error = %err, "failed to assign invoice number");
            None
        }
    };

    cart.clear();

    Ok(OrderConfirmation {
        order_id,
        invoice_number,
        customer_number: identity.customer_number().map(ToString::to_string),
        order: draft,
    })
}
