//! Fixtures
//!
//! YAML fixture sets: `products/<set>.yml`, `shipping/<set>.yml` and
//! `carts/<set>.yml` under a base directory.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    catalog::InMemoryCatalog,
    fixtures::{carts::CartFixture, products::ProductsFixture, shipping::ShippingFixture},
    products::{Product, ProductError, ProductId},
    session::ShoppingSession,
    shipping::{ShippingError, ShippingMethod, ShippingRates},
};

pub mod carts;
pub mod products;
pub mod shipping;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid tax rate format or value
    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices in one set
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Two products share an identifier
    #[error("Duplicate product identifier: {0}")]
    DuplicateProductId(ProductId),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Product failed validation
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Shipping rates failed validation
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Cart rejected a fixture line
    #[error("Failed to build cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products by fixture key
    products: FxHashMap<String, Product>,

    /// Shipping rates, if loaded
    rates: Option<ShippingRates>,

    /// Cart definition, if loaded
    cart: Option<CartFixture>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            rates: None,
            cart: None,
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a product is
    /// invalid, identifiers repeat, or prices use more than one currency.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let mut currency = self.currency;
        let mut loaded = FxHashMap::<String, Product>::default();

        for (key, product_fixture) in fixture.products {
            let (_amount, product_currency) = products::parse_price(&product_fixture.price)?;

            currency = Some(matching_currency(currency, product_currency)?);

            let product = Product::try_from(product_fixture)?;

            if self
                .products
                .values()
                .chain(loaded.values())
                .any(|existing| existing.id == product.id)
            {
                return Err(FixtureError::DuplicateProductId(product.id));
            }

            loaded.insert(key, product);
        }

        // Only a fully valid file changes the fixture.
        self.currency = currency;
        self.products.extend(loaded);

        Ok(self)
    }

    /// Load shipping rates from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a rate is invalid,
    /// or the rates use a different currency from the products.
    pub fn load_shipping(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("shipping").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ShippingFixture = serde_norway::from_str(&contents)?;

        let (rates, currency) = fixture.shipping.parse()?;

        self.check_currency(currency)?;
        self.rates = Some(rates);

        Ok(self)
    }

    /// Load a cart definition from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it refers to
    /// a product that has not been loaded.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        for line in &fixture.lines {
            if !self.products.contains_key(&line.product) {
                return Err(FixtureError::ProductNotFound(line.product.clone()));
            }
        }

        self.cart = Some(fixture);

        Ok(self)
    }

    /// Load a complete fixture set (products, shipping, and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_shipping(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Catalog containing every loaded product
    pub fn catalog(&self) -> InMemoryCatalog {
        self.products.values().cloned().collect()
    }

    /// Loaded shipping rates, or the default table
    pub fn shipping_rates(&self) -> ShippingRates {
        self.rates.unwrap_or_default()
    }

    /// Shipping method named by the cart fixture, if any
    pub fn shipping_method(&self) -> Option<ShippingMethod> {
        let cart = self.cart.as_ref()?;

        cart.shipping
    }

    /// Build a cart from the loaded cart definition
    ///
    /// Without a cart definition the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded or the cart rejects a line.
    pub fn cart(&self) -> Result<Cart, FixtureError> {
        let mut cart = Cart::new(self.currency()?);

        for line in self.cart.iter().flat_map(|fixture| &fixture.lines) {
            let product = self.product(&line.product)?;

            _ = cart.add_line(product, line.quantity)?;
        }

        Ok(cart)
    }

    /// Build a session around the fixture cart, with the fixture's shipping selection
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be built.
    pub fn session(&self) -> Result<ShoppingSession, FixtureError> {
        let mut session = ShoppingSession::with_cart(self.cart()?, self.shipping_rates());

        if let Some(method) = self.shipping_method() {
            session.select_shipping(method);
        }

        Ok(session)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        self.currency = Some(matching_currency(self.currency, currency)?);

        Ok(())
    }
}

/// The set's currency once `found` is taken into account.
fn matching_currency(
    expected: Option<&'static Currency>,
    found: &'static Currency,
) -> Result<&'static Currency, FixtureError> {
    match expected {
        Some(existing) if existing != found => Err(FixtureError::CurrencyMismatch(
            existing.iso_alpha_code.to_string(),
            found.iso_alpha_code.to_string(),
        )),
        _ => Ok(found),
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rust_decimal::Decimal;
    use rusty_money::iso::SEK;
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::cart::QuantityNotice;

    use super::*;

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    const PRODUCTS: &str = r#"
products:
  bun:
    id: 1
    name: Bun
    price: "10.00 SEK"
    tax_rate: "25%"
    stock: 3
"#;

    #[test]
    fn fixture_loads_storefront_set() -> TestResult {
        let fixture = Fixture::from_set("storefront")?;

        let bun = fixture.product("kanelbulle")?;

        assert_eq!(bun.name, "Kanelbulle");
        assert_eq!(bun.unit_price, Decimal::new(3200, 2));
        assert_eq!(fixture.currency()?, SEK);
        assert_eq!(fixture.shipping_rates(), ShippingRates::default());
        assert!(!fixture.cart()?.is_empty());

        Ok(())
    }

    #[test]
    fn fixture_catalog_contains_every_product() -> TestResult {
        let fixture = Fixture::from_set("storefront")?;
        let catalog = fixture.catalog();

        assert_eq!(catalog.len(), fixture.products.len());
        assert!(catalog.categories().contains("pastry"));

        Ok(())
    }

    #[test]
    fn fixture_session_applies_shipping_selection() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "shipping",
            "test",
            "shipping:\n  standard: \"5.00 SEK\"\n  express: \"9.00 SEK\"\n",
        )?;
        write_fixture(
            dir.path(),
            "carts",
            "test",
            "lines:\n  - product: bun\n    quantity: 2\nshipping: express\n",
        )?;

        let fixture = Fixture::from_set_in(dir.path(), "test")?;
        let session = fixture.session()?;

        assert_eq!(session.shipping_method(), ShippingMethod::Express);
        assert_eq!(session.item_count(), 2);
        assert_eq!(session.totals().grand_total, Decimal::new(34, 0));

        Ok(())
    }

    #[test]
    fn fixture_cart_clamps_to_stock() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "carts",
            "test",
            "lines:\n  - product: bun\n    quantity: 5\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("test")?.load_cart("test")?;

        let mut cart = fixture.cart()?;

        assert_eq!(cart.total_quantity(), 3);

        let outcome = cart.add_line(fixture.product("bun")?, 1)?;
        assert!(matches!(
            outcome.notice,
            Some(QuantityNotice::StockExceeded { available: 3, .. })
        ));

        Ok(())
    }

    #[test]
    fn fixture_cart_rejects_unknown_product() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "carts",
            "test",
            "lines:\n  - product: croissant\n    quantity: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("test")?;

        let result = fixture.load_cart("test");

        assert!(matches!(result, Err(FixtureError::ProductNotFound(key)) if key == "croissant"));

        Ok(())
    }

    #[test]
    fn fixture_cart_rejects_non_positive_quantity() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "carts",
            "test",
            "lines:\n  - product: bun\n    quantity: 0\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("test")?.load_cart("test")?;

        assert!(matches!(
            fixture.cart(),
            Err(FixtureError::Cart(CartError::InvalidQuantity(0)))
        ));

        Ok(())
    }

    #[test]
    fn fixture_rejects_mixed_currencies() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "shipping",
            "test",
            "shipping:\n  standard: \"5.00 EUR\"\n  express: \"9.00 EUR\"\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("test")?;

        assert!(matches!(
            fixture.load_shipping("test"),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));

        Ok(())
    }

    #[test]
    fn fixture_rejects_duplicate_identifiers() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "products",
            "test",
            "products:\n  a:\n    id: 1\n    name: A\n    price: \"1.00 SEK\"\n    tax_rate: \"0%\"\n    stock: 1\n  b:\n    id: 1\n    name: B\n    price: \"2.00 SEK\"\n    tax_rate: \"0%\"\n    stock: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_products("test"),
            Err(FixtureError::DuplicateProductId(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_rejected_products_file_leaves_fixture_unchanged() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(
            dir.path(),
            "products",
            "test",
            "products:\n  a:\n    id: 1\n    name: A\n    price: \"1.00 SEK\"\n    tax_rate: \"0%\"\n    stock: 1\n  b:\n    id: 2\n    name: B\n    price: \"two SEK\"\n    tax_rate: \"0%\"\n    stock: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_products("test"),
            Err(FixtureError::InvalidPrice(_))
        ));
        assert!(fixture.products.is_empty());
        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));

        Ok(())
    }

    #[test]
    fn fixture_duplicate_in_later_file_keeps_earlier_products() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "first", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "products",
            "second",
            "products:\n  roll:\n    id: 1\n    name: Roll\n    price: \"5.00 SEK\"\n    tax_rate: \"25%\"\n    stock: 4\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());
        fixture.load_products("first")?;

        assert!(matches!(
            fixture.load_products("second"),
            Err(FixtureError::DuplicateProductId(_))
        ));
        assert_eq!(fixture.products.len(), 1);
        assert!(fixture.product("roll").is_err());
        assert_eq!(fixture.product("bun")?.name, "Bun");

        Ok(())
    }

    #[test]
    fn fixture_shipping_method_comes_from_cart() -> TestResult {
        let dir = TempDir::new()?;

        write_fixture(dir.path(), "products", "test", PRODUCTS)?;
        write_fixture(
            dir.path(),
            "carts",
            "test",
            "lines:\n  - product: bun\n    quantity: 1\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert_eq!(fixture.shipping_method(), None);

        fixture.load_products("test")?.load_cart("test")?;

        assert_eq!(fixture.shipping_method(), None);

        Ok(())
    }

    #[test]
    fn fixture_missing_file_is_io_error() {
        let mut fixture = Fixture::with_base_path("./does-not-exist");

        assert!(matches!(
            fixture.load_products("nothing"),
            Err(FixtureError::Io(_))
        ));
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.cart(), Err(FixtureError::NoCurrency)));
    }
}
