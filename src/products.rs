//! Products

use std::{fmt, num::NonZeroU64};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::tags::TagSet;

/// Errors raised when a product fails validation.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// Product identifiers are positive integers.
    #[error("product identifier must be a positive integer, got {0}")]
    InvalidId(i64),

    /// Unit price is below zero.
    #[error("product {0} has a negative unit price")]
    NegativePrice(ProductId),

    /// Tax rate is below zero.
    #[error("product {0} has a negative tax rate")]
    NegativeTaxRate(ProductId),
}

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(NonZeroU64);

impl ProductId {
    /// Create a product identifier from a raw catalog value.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InvalidId`] if the value is zero or negative.
    pub fn new(value: i64) -> Result<Self, ProductError> {
        u64::try_from(value)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or(ProductError::InvalidId(value))
    }

    /// The raw identifier value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Catalog identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    pub description: String,

    /// Unit price, excluding tax
    pub unit_price: Decimal,

    /// Tax rate as a fraction of the unit price
    pub tax_rate: Percentage,

    /// Units available for sale
    pub stock: u32,

    /// Image references, first one is the primary image
    pub images: SmallVec<[String; 4]>,

    /// Ingredient tags
    pub ingredients: TagSet,

    /// Category tags
    pub categories: TagSet,
}

impl Product {
    /// Create a product with no description, images, or tags.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: Decimal,
        tax_rate: Percentage,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            unit_price,
            tax_rate,
            stock,
            images: SmallVec::new(),
            ingredients: TagSet::empty(),
            categories: TagSet::empty(),
        }
    }

    /// Tax rate as a plain decimal fraction (0.25 for 25%).
    #[must_use]
    pub fn tax_fraction(&self) -> Decimal {
        // `Percentage` only exposes its value through multiplication.
        self.tax_rate * Decimal::ONE
    }

    /// Check that price and tax rate are non-negative.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.unit_price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.id));
        }

        if self.tax_fraction() < Decimal::ZERO {
            return Err(ProductError::NegativeTaxRate(self.id));
        }

        Ok(())
    }

    /// The primary image, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
