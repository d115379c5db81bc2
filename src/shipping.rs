//! Shipping

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors related to shipping selection and configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ShippingError {
    /// Selection outside the supported methods.
    #[error("unknown shipping method: {0:?}")]
    UnknownShippingMethod(String),

    /// A configured rate is below zero.
    #[error("shipping rate for {0} must not be negative")]
    NegativeRate(ShippingMethod),
}

/// Delivery option chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Standard delivery
    Standard,

    /// Express delivery
    Express,
}

impl ShippingMethod {
    /// All methods in display order.
    pub const ALL: [ShippingMethod; 2] = [ShippingMethod::Standard, ShippingMethod::Express];

    /// Lower-case name as used in configuration and order records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShippingMethod::Standard => "standard",
            ShippingMethod::Express => "express",
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingMethod {
    type Err = ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        ShippingMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ShippingError::UnknownShippingMethod(s.to_string()))
    }
}

/// Fixed cost for each shipping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRates {
    standard: Decimal,
    express: Decimal,
}

impl ShippingRates {
    /// Create a rate table.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::NegativeRate`] if either rate is below zero.
    pub fn new(standard: Decimal, express: Decimal) -> Result<Self, ShippingError> {
        if standard < Decimal::ZERO {
            return Err(ShippingError::NegativeRate(ShippingMethod::Standard));
        }

        if express < Decimal::ZERO {
            return Err(ShippingError::NegativeRate(ShippingMethod::Express));
        }

        Ok(Self { standard, express })
    }

    /// Cost of shipping with the given method.
    #[must_use]
    pub fn cost(&self, method: ShippingMethod) -> Decimal {
        match method {
            ShippingMethod::Standard => self.standard,
            ShippingMethod::Express => self.express,
        }
    }

    /// The cheapest method. Ties go to standard.
    #[must_use]
    pub fn cheapest(&self) -> ShippingMethod {
        if self.express < self.standard {
            ShippingMethod::Express
        } else {
            ShippingMethod::Standard
        }
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        Self {
            standard: Decimal::new(5000, 2),
            express: Decimal::new(10_000, 2),
        }
    }
}
