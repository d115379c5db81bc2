//! Cart Fixtures

use serde::Deserialize;

use crate::shipping::ShippingMethod;

/// Cart Fixture
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines to add, in order
    pub lines: Vec<CartLineFixture>,

    /// Shipping selection; the cheapest method when omitted
    #[serde(default)]
    pub shipping: Option<ShippingMethod>,
}

/// Cart Line Fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key from the products fixture
    pub product: String,

    /// Requested quantity
    pub quantity: i64,
}
