//! Shopping Session
//!
//! One shopper's cart, shipping selection and sign-in state, owned explicitly
//! by whoever drives the session.

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    cart::{Cart, CartError, CartLine, LineOutcome},
    catalog::{CatalogError, ProductCatalog},
    checkout::{
        CheckoutError, CustomerDetails, CustomerIdentity, OrderConfirmation, OrderSubmitter,
        place_order,
    },
    pricing::{OrderTotals, PresentedTotals, PricingError},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError},
    shipping::{ShippingError, ShippingMethod, ShippingRates},
};

/// Errors raised by session operations that touch the catalog.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Product lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The cart rejected the change.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Shopping Session
#[derive(Debug, Clone)]
pub struct ShoppingSession {
    cart: Cart,
    rates: ShippingRates,
    shipping: ShippingMethod,
    user: Option<Uuid>,
}

impl ShoppingSession {
    /// Start a session with an empty cart and the cheapest shipping method.
    #[must_use]
    pub fn new(currency: &'static Currency, rates: ShippingRates) -> Self {
        Self::with_cart(Cart::new(currency), rates)
    }

    /// Start a session around an existing cart.
    #[must_use]
    pub fn with_cart(cart: Cart, rates: ShippingRates) -> Self {
        Self {
            cart,
            shipping: rates.cheapest(),
            rates,
            user: None,
        }
    }

    /// The session's cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current cart lines.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Units in the cart, for the header badge.
    pub fn item_count(&self) -> u64 {
        self.cart.total_quantity()
    }

    /// Shipping rate table.
    pub fn rates(&self) -> &ShippingRates {
        &self.rates
    }

    /// Selected shipping method.
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping
    }

    /// Look a product up in the catalog and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Catalog`]: the product could not be fetched.
    /// - [`SessionError::Cart`]: the cart rejected the quantity or product.
    pub async fn add_product<C>(
        &mut self,
        catalog: &C,
        product: ProductId,
        quantity: i64,
    ) -> Result<LineOutcome, SessionError>
    where
        C: ProductCatalog + ?Sized,
    {
        let product = catalog.get_product(product).await?;

        Ok(self.add_line(&product, quantity)?)
    }

    /// Add an already fetched product to the cart.
    ///
    /// # Errors
    ///
    /// See [`Cart::add_line`].
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> Result<LineOutcome, CartError> {
        self.cart.add_line(product, quantity)
    }

    /// Change the quantity of a line.
    ///
    /// # Errors
    ///
    /// See [`Cart::update_quantity`].
    pub fn update_quantity(
        &mut self,
        product: ProductId,
        quantity: i64,
    ) -> Result<LineOutcome, CartError> {
        self.cart.update_quantity(product, quantity)
    }

    /// Remove a line from the cart.
    pub fn remove_line(&mut self, product: ProductId) -> Option<CartLine> {
        self.cart.remove_line(product)
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Select a shipping method.
    pub fn select_shipping(&mut self, method: ShippingMethod) {
        debug!(%method, "selected shipping method");

        self.shipping = method;
    }

    /// Select a shipping method by name.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::UnknownShippingMethod`] for unsupported names. The
    /// current selection is kept.
    pub fn select_shipping_by_name(&mut self, name: &str) -> Result<ShippingMethod, ShippingError> {
        let method = name.parse::<ShippingMethod>()?;

        self.select_shipping(method);

        Ok(method)
    }

    /// Exact totals for the current cart and shipping selection.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::calculate(&self.cart, &self.rates, self.shipping)
    }

    /// Totals rounded for display.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountOutOfRange`] if a total is too large.
    pub fn presented_totals(&self) -> Result<PresentedTotals, PricingError> {
        self.totals().present(self.cart.currency())
    }

    /// Order summary for the current cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount is too large to present.
    pub fn receipt(&self) -> Result<Receipt, ReceiptError> {
        Receipt::from_cart(&self.cart, &self.rates, self.shipping)
    }

    /// Mark a user as signed in.
    pub fn sign_in(&mut self, user_id: Uuid) {
        self.user = Some(user_id);
    }

    /// Forget the signed-in user.
    pub fn sign_out(&mut self) {
        self.user = None;
    }

    /// Signed-in user, if any.
    pub fn user_id(&self) -> Option<Uuid> {
        self.user
    }

    /// The signed-in user, or a new guest.
    pub fn identity(&self) -> CustomerIdentity {
        CustomerIdentity::resolve(self.user)
    }

    /// Check out the session's cart.
    ///
    /// # Errors
    ///
    /// See [`place_order`].
    pub async fn checkout<S>(
        &mut self,
        customer: &CustomerDetails,
        submitter: &S,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        S: OrderSubmitter + ?Sized,
    {
        let identity = self.identity();

        place_order(
            &mut self.cart,
            &self.rates,
            self.shipping,
            customer,
            &identity,
            submitter,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::SEK};
    use testresult::TestResult;

    use crate::{
        catalog::{InMemoryCatalog, MockProductCatalog},
        checkout::InMemoryOrderStore,
        products::ProductError,
    };

    use super::*;

    fn catalog() -> Result<InMemoryCatalog, ProductError> {
        Ok([
            Product::new(
                ProductId::new(1)?,
                "Kanelbulle",
                Decimal::new(3_200, 2),
                Percentage::from(Decimal::new(12, 2)),
                20,
            ),
            Product::new(
                ProductId::new(2)?,
                "Prinsesstårta",
                Decimal::new(45_000, 2),
                Percentage::from(Decimal::new(12, 2)),
                1,
            ),
        ]
        .into_iter()
        .collect())
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            email: "guest@example.se".to_string(),
            address: "Kungsgatan 2".to_string(),
            city: "Göteborg".to_string(),
            postal_code: "411 19".to_string(),
            country: "Sweden".to_string(),
            ..CustomerDetails::default()
        }
    }

    #[test]
    fn new_session_defaults_to_cheapest_shipping() {
        let session = ShoppingSession::new(SEK, ShippingRates::default());

        assert_eq!(session.shipping_method(), ShippingMethod::Standard);
        assert_eq!(session.item_count(), 0);
        assert!(session.user_id().is_none());
    }

    #[tokio::test]
    async fn add_product_uses_catalog_snapshot() -> TestResult {
        let catalog = catalog()?;
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());

        let outcome = session
            .add_product(&catalog, ProductId::new(1)?, 3)
            .await?;

        assert_eq!(outcome.quantity, 3);
        assert_eq!(session.item_count(), 3);

        let line = session.lines().first().ok_or("missing line")?;
        assert_eq!(line.product().name, "Kanelbulle");

        Ok(())
    }

    #[tokio::test]
    async fn add_product_reports_missing_product() -> TestResult {
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());
        let id = ProductId::new(5)?;

        let mut catalog = MockProductCatalog::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(move |id| Err(CatalogError::NotFound(id)));

        let result = session.add_product(&catalog, id, 1).await;

        assert_eq!(result, Err(SessionError::Catalog(CatalogError::NotFound(id))));
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[test]
    fn select_shipping_by_name_changes_totals() -> TestResult {
        let catalog = catalog()?;
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());
        let cake = catalog.get(ProductId::new(2)?).ok_or("missing cake")?;

        _ = session.add_line(cake, 1)?;

        assert_eq!(session.totals().grand_total, Decimal::new(55_400, 2));

        assert_eq!(
            session.select_shipping_by_name("EXPRESS")?,
            ShippingMethod::Express
        );
        assert_eq!(session.totals().grand_total, Decimal::new(60_400, 2));

        assert!(session.select_shipping_by_name("drone").is_err());
        assert_eq!(session.shipping_method(), ShippingMethod::Express);

        Ok(())
    }

    #[test]
    fn presented_totals_use_cart_currency() -> TestResult {
        let catalog = catalog()?;
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());
        let bun = catalog.get(ProductId::new(1)?).ok_or("missing bun")?;

        _ = session.add_line(bun, 2)?;

        let presented = session.presented_totals()?;

        assert_eq!(presented.goods_subtotal, Money::from_minor(6_400, SEK));
        assert_eq!(presented.tax_total, Money::from_minor(768, SEK));
        assert_eq!(presented.grand_total, Money::from_minor(12_168, SEK));

        Ok(())
    }

    #[test]
    fn identity_follows_sign_in_state() {
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());
        let user_id = Uuid::new_v4();

        assert!(session.identity().is_guest());

        session.sign_in(user_id);
        assert_eq!(
            session.identity(),
            CustomerIdentity::Authenticated { user_id }
        );

        session.sign_out();
        assert!(session.identity().is_guest());
    }

    #[tokio::test]
    async fn checkout_clears_session_cart() -> TestResult {
        let catalog = catalog()?;
        let store = InMemoryOrderStore::new();
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());

        session.sign_in(Uuid::new_v4());
        _ = session.add_product(&catalog, ProductId::new(1)?, 2).await?;

        let confirmation = session.checkout(&customer(), &store).await?;

        assert_eq!(confirmation.customer_number, None);
        assert_eq!(confirmation.order.customer_id, session.user_id().ok_or("no user")?);
        assert!(session.cart().is_empty());
        assert_eq!(store.orders()?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_of_empty_session_fails() -> TestResult {
        let store = InMemoryOrderStore::new();
        let mut session = ShoppingSession::new(SEK, ShippingRates::default());

        let result = session.checkout(&customer(), &store).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCartCheckout)));
        assert!(store.orders()?.is_empty());

        Ok(())
    }
}
