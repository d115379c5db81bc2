//! Catalog
//!
//! Product lookup and filtered, paginated browsing. The storefront talks to the
//! catalog through [`ProductCatalog`]; [`InMemoryCatalog`] serves fixtures and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::{
    products::{Product, ProductId},
    tags::TagSet,
};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Catalog errors.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No product with the identifier exists.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// The catalog backend could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Browse filters and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only products in this category
    pub category: Option<String>,

    /// Only products containing this ingredient
    pub ingredient: Option<String>,

    /// 1-based page number
    pub page: u32,

    /// Products per page
    pub per_page: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            ingredient: None,
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQuery {
    /// Restrict to a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to an ingredient.
    #[must_use]
    pub fn with_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredient = Some(ingredient.into());
        self
    }

    /// Select a page. Page numbers start at 1; zero is treated as 1.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Returns true if the product passes the category and ingredient filters.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.categories.contains(category));

        let ingredient_ok = self
            .ingredient
            .as_deref()
            .is_none_or(|ingredient| product.ingredients.contains(ingredient));

        category_ok && ingredient_ok
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    /// Products on this page, in identifier order
    pub products: Vec<Product>,

    /// 1-based page number
    pub page: u32,

    /// Products per page
    pub per_page: u32,

    /// Products matching the filters across all pages
    pub total: usize,
}

impl ProductPage {
    /// Number of pages needed for all matching products.
    pub fn total_pages(&self) -> usize {
        let per_page = usize::try_from(self.per_page).unwrap_or(usize::MAX).max(1);

        self.total.div_ceil(per_page)
    }
}

/// Source of products for the storefront.
#[automock]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Retrieve a single product.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// List products matching a query.
    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError>;
}

/// Catalog held in memory, ordered by product identifier.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: BTreeMap<ProductId, Product>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        self.products.insert(product.id, product)
    }

    /// Look up a product without going through the async seam.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Iterate over products in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Every category used by any product, sorted.
    pub fn categories(&self) -> TagSet {
        self.products
            .values()
            .flat_map(|product| product.categories.iter())
            .collect()
    }

    /// Every ingredient used by any product, sorted.
    pub fn ingredients(&self) -> TagSet {
        self.products
            .values()
            .flat_map(|product| product.ingredients.iter())
            .collect()
    }

    fn page(&self, query: &ProductQuery) -> ProductPage {
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);

        let matching: Vec<&Product> = self
            .products
            .values()
            .filter(|product| query.matches(product))
            .collect();

        let total = matching.len();
        let skip = usize::try_from(u64::from(page - 1) * u64::from(per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);

        ProductPage {
            products: matching.into_iter().skip(skip).take(take).cloned().collect(),
            page,
            per_page,
            total,
        }
    }
}

impl FromIterator<Product> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|product| (product.id, product)).collect(),
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        Ok(self.page(query))
    }
}
