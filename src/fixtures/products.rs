//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Findable, iso::Currency};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::{
    fixtures::FixtureError,
    products::{Product, ProductId},
    tags::TagSet,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Catalog identifier
    pub id: i64,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: String,

    /// Unit price excluding tax (e.g., "32.00 SEK")
    pub price: String,

    /// Tax rate (e.g., "12%" or "0.12")
    pub tax_rate: String,

    /// Units in stock
    pub stock: u32,

    /// Image references
    #[serde(default)]
    pub images: Vec<String>,

    /// Ingredient tags
    #[serde(default)]
    pub ingredients: TagSet,

    /// Category tags
    #[serde(default)]
    pub categories: TagSet,
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (unit_price, _currency) = parse_price(&fixture.price)?;

        let product = Product {
            id: ProductId::new(fixture.id)?,
            name: fixture.name,
            description: fixture.description,
            unit_price,
            tax_rate: parse_tax_rate(&fixture.tax_rate)?,
            stock: fixture.stock,
            images: fixture.images.into_iter().collect::<SmallVec<_>>(),
            ingredients: fixture.ingredients,
            categories: fixture.categories,
        };

        product.validate()?;

        Ok(product)
    }
}

/// Parse price string (e.g., "32.50 SEK") into an exact amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code is not a
/// known ISO currency.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = Currency::find(currency_code)
        .ok_or_else(|| FixtureError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}

/// Parse tax rate string (e.g., "25%" or "0.25") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string is not a number or the rate is negative.
pub fn parse_tax_rate(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|points| points / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    }
    .map_err(|_err| FixtureError::InvalidTaxRate(s.to_string()))?;

    if fraction < Decimal::ZERO {
        return Err(FixtureError::InvalidTaxRate(s.to_string()));
    }

    Ok(Percentage::from(fraction))
}
