//! Shipping Fixtures

use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_price},
    shipping::ShippingRates,
};

/// Wrapper for shipping rates in YAML
#[derive(Debug, Deserialize)]
pub struct ShippingFixture {
    /// Rate table
    pub shipping: ShippingRatesFixture,
}

/// Shipping Rates Fixture
#[derive(Debug, Deserialize)]
pub struct ShippingRatesFixture {
    /// Standard delivery cost (e.g., "50.00 SEK")
    pub standard: String,

    /// Express delivery cost (e.g., "100.00 SEK")
    pub express: String,
}

impl ShippingRatesFixture {
    /// Parse both rates, returning them with the currency they share.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed, the two rates use different
    /// currencies, or a rate is negative.
    pub fn parse(&self) -> Result<(ShippingRates, &'static Currency), FixtureError> {
        let (standard, currency) = parse_price(&self.standard)?;
        let (express, express_currency) = parse_price(&self.express)?;

        if express_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                express_currency.iso_alpha_code.to_string(),
            ));
        }

        Ok((ShippingRates::new(standard, express)?, currency))
    }
}
