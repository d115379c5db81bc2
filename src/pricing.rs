//! Pricing
//!
//! Order totals are computed in exact decimal arithmetic. Nothing here rounds:
//! amounts are only rounded to the currency's minor unit when they are turned
//! into [`Money`] at the presentation boundary, see [`round_for_presentation`].

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    shipping::{ShippingMethod, ShippingRates},
};

/// Errors raised when presenting an amount.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Amount does not fit in the currency's minor units.
    #[error("amount {amount} is too large to present")]
    AmountOutOfRange {
        /// The exact amount that could not be presented.
        amount: Decimal,
    },
}

/// Tax on a single unit of the line's product.
pub fn line_tax(line: &CartLine) -> Decimal {
    line.unit_price().saturating_mul(line.tax_fraction())
}

/// Tax on all units of the line.
pub fn line_tax_total(line: &CartLine) -> Decimal {
    line_tax(line).saturating_mul(Decimal::from(line.quantity()))
}

/// Line price excluding tax.
pub fn line_net_total(line: &CartLine) -> Decimal {
    line.unit_price().saturating_mul(Decimal::from(line.quantity()))
}

/// Line price including tax.
pub fn line_gross_total(line: &CartLine) -> Decimal {
    line.unit_price()
        .saturating_mul(Decimal::ONE.saturating_add(line.tax_fraction()))
        .saturating_mul(Decimal::from(line.quantity()))
}

/// Sum of line prices excluding tax.
pub fn goods_subtotal(cart: &Cart) -> Decimal {
    cart.iter()
        .map(line_net_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of line taxes.
pub fn total_tax(cart: &Cart) -> Decimal {
    cart.iter()
        .map(line_tax_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Cost of the selected shipping method.
pub fn shipping_cost(rates: &ShippingRates, method: ShippingMethod) -> Decimal {
    rates.cost(method)
}

/// Goods subtotal plus tax plus shipping.
pub fn grand_total(cart: &Cart, rates: &ShippingRates, method: ShippingMethod) -> Decimal {
    OrderTotals::calculate(cart, rates, method).grand_total
}

/// Round an exact amount to the currency's minor unit, half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::AmountOutOfRange`] if the rounded amount does not fit
/// in an `i64` count of minor units.
pub fn round_for_presentation(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let mut rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    // Pad to exactly `exponent` places so the mantissa counts minor units.
    rounded.rescale(currency.exponent);

    let minor = i64::try_from(rounded.mantissa())
        .map_err(|_err| PricingError::AmountOutOfRange { amount })?;

    Ok(Money::from_minor(minor, currency))
}

/// Exact order totals, derived fresh from a cart and shipping selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line prices excluding tax
    pub goods_subtotal: Decimal,

    /// Sum of line taxes
    pub tax_total: Decimal,

    /// Selected shipping cost
    pub shipping_cost: Decimal,

    /// Goods plus tax plus shipping
    pub grand_total: Decimal,
}

impl OrderTotals {
    /// Calculate totals for a cart.
    #[must_use]
    pub fn calculate(cart: &Cart, rates: &ShippingRates, method: ShippingMethod) -> Self {
        let goods_subtotal = goods_subtotal(cart);
        let tax_total = total_tax(cart);
        let shipping_cost = shipping_cost(rates, method);

        Self {
            goods_subtotal,
            tax_total,
            shipping_cost,
            grand_total: goods_subtotal
                .saturating_add(tax_total)
                .saturating_add(shipping_cost),
        }
    }

    /// Round each total independently for display.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountOutOfRange`] if any total is too large.
    pub fn present(&self, currency: &'static Currency) -> Result<PresentedTotals, PricingError> {
        Ok(PresentedTotals {
            goods_subtotal: round_for_presentation(self.goods_subtotal, currency)?,
            tax_total: round_for_presentation(self.tax_total, currency)?,
            shipping_cost: round_for_presentation(self.shipping_cost, currency)?,
            grand_total: round_for_presentation(self.grand_total, currency)?,
        })
    }
}

/// Order totals rounded to the currency's minor unit.
///
/// The figures are rounded independently and are never summed, so the grand
/// total may differ by a minor unit from the sum of the other three.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentedTotals {
    /// Goods subtotal
    pub goods_subtotal: Money<'static, Currency>,

    /// Tax total
    pub tax_total: Money<'static, Currency>,

    /// Shipping cost
    pub shipping_cost: Money<'static, Currency>,

    /// Grand total
    pub grand_total: Money<'static, Currency>,
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use decimal_percentage::Percentage;
    use rusty_money::iso::{JPY, SEK};
    use testresult::TestResult;

    use crate::products::{Product, ProductId};

    use super::*;

    fn cart_with(price: Decimal, tax: Decimal, quantity: i64) -> Result<Cart, Box<dyn Error>> {
        let mut cart = Cart::new(SEK);
        let product = Product::new(
            ProductId::new(1)?,
            "Sourdough",
            price,
            Percentage::from(tax),
            100,
        );

        _ = cart.add_line(&product, quantity)?;

        Ok(cart)
    }

    #[test]
    fn line_figures_for_simple_line() -> TestResult {
        let cart = cart_with(Decimal::new(10_000, 2), Decimal::new(25, 2), 2)?;
        let line = cart.lines().first().ok_or("missing line")?;

        assert_eq!(line_tax(line), Decimal::new(25, 0));
        assert_eq!(line_tax_total(line), Decimal::new(50, 0));
        assert_eq!(line_net_total(line), Decimal::new(200, 0));
        assert_eq!(line_gross_total(line), Decimal::new(250, 0));

        Ok(())
    }

    #[test]
    fn totals_with_standard_and_express_shipping() -> TestResult {
        let cart = cart_with(Decimal::new(10_000, 2), Decimal::new(25, 2), 2)?;
        let rates = ShippingRates::default();

        let standard = OrderTotals::calculate(&cart, &rates, ShippingMethod::Standard);

        assert_eq!(standard.goods_subtotal, Decimal::new(200, 0));
        assert_eq!(standard.tax_total, Decimal::new(50, 0));
        assert_eq!(standard.shipping_cost, Decimal::new(50, 0));
        assert_eq!(standard.grand_total, Decimal::new(300, 0));

        assert_eq!(
            grand_total(&cart, &rates, ShippingMethod::Express),
            Decimal::new(350, 0)
        );

        Ok(())
    }

    #[test]
    fn empty_cart_totals_are_shipping_only() {
        let cart = Cart::new(SEK);
        let rates = ShippingRates::default();

        assert_eq!(goods_subtotal(&cart), Decimal::ZERO);
        assert_eq!(total_tax(&cart), Decimal::ZERO);
        assert_eq!(
            grand_total(&cart, &rates, ShippingMethod::Standard),
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn fractional_prices_stay_exact() -> TestResult {
        let cart = cart_with(Decimal::new(33_333, 3), Decimal::new(25, 2), 3)?;

        assert_eq!(goods_subtotal(&cart), Decimal::new(99_999, 3));
        assert_eq!(total_tax(&cart), Decimal::new(2_499_975, 5));

        Ok(())
    }

    #[test]
    fn rounding_once_differs_from_summing_rounded_units() -> TestResult {
        let cart = cart_with(Decimal::new(33_333, 3), Decimal::new(25, 2), 3)?;
        let rates = ShippingRates::default();

        let totals = OrderTotals::calculate(&cart, &rates, ShippingMethod::Standard);
        let presented = totals.present(SEK)?;

        // 99.999 + 24.99975 + 50 = 174.99875
        assert_eq!(totals.grand_total, Decimal::new(17_499_875, 5));
        assert_eq!(presented.grand_total, Money::from_minor(17_500, SEK));

        // Rounding each unit's gross price first: 41.66625 -> 41.67, times three.
        let line = cart.lines().first().ok_or("missing line")?;
        let unit_gross = round_for_presentation(
            line.unit_price() * (Decimal::ONE + line.tax_fraction()),
            SEK,
        )?;
        let per_unit_sum = unit_gross.to_minor_units() * 3 + 5_000;

        assert_eq!(per_unit_sum, 17_501);
        assert_ne!(presented.grand_total.to_minor_units(), per_unit_sum);

        Ok(())
    }

    #[test]
    fn presented_figures_are_rounded_independently() -> TestResult {
        let cart = cart_with(Decimal::new(33_333, 3), Decimal::new(25, 2), 3)?;
        let rates = ShippingRates::default();
        let totals = OrderTotals::calculate(&cart, &rates, ShippingMethod::Standard);
        let presented = totals.present(SEK)?;

        assert_eq!(presented.goods_subtotal, Money::from_minor(10_000, SEK));
        assert_eq!(presented.tax_total, Money::from_minor(2_500, SEK));
        assert_eq!(presented.shipping_cost, Money::from_minor(5_000, SEK));

        Ok(())
    }

    #[test]
    fn round_for_presentation_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(
            round_for_presentation(Decimal::new(1_005, 3), SEK)?,
            Money::from_minor(101, SEK)
        );
        assert_eq!(
            round_for_presentation(Decimal::new(-1_005, 3), SEK)?,
            Money::from_minor(-101, SEK)
        );
        assert_eq!(
            round_for_presentation(Decimal::new(1_004, 3), SEK)?,
            Money::from_minor(100, SEK)
        );

        Ok(())
    }

    #[test]
    fn round_for_presentation_pads_whole_amounts() -> TestResult {
        assert_eq!(
            round_for_presentation(Decimal::new(7, 0), SEK)?,
            Money::from_minor(700, SEK)
        );

        Ok(())
    }

    #[test]
    fn round_for_presentation_uses_currency_exponent() -> TestResult {
        assert_eq!(
            round_for_presentation(Decimal::new(1_235, 1), JPY)?,
            Money::from_minor(124, JPY)
        );

        Ok(())
    }

    #[test]
    fn round_for_presentation_reports_overflow() {
        assert_eq!(
            round_for_presentation(Decimal::MAX, SEK),
            Err(PricingError::AmountOutOfRange {
                amount: Decimal::MAX
            })
        );
    }
}
