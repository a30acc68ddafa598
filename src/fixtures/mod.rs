//! Fixtures

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    coupons::CouponCode,
    fixtures::{coupons::CouponsFixture, products::ProductsFixture},
};

pub mod coupons;
pub mod products;

pub use products::FixtureProduct;

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

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

/// Fixture
///
/// Coupons and catalogue products read from `<base>/coupons/<name>.yml` and
/// `<base>/products/<name>.yml`.
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Product id -> product
    products: FxHashMap<String, FixtureProduct>,

    /// Document id -> coupon
    coupons: FxHashMap<String, CouponCode>,

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
            coupons: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for (id, product_fixture) in fixture.products {
            let (price, currency) = products::parse_price(&product_fixture.price)?;

            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            self.products.insert(
                id,
                FixtureProduct {
                    name: product_fixture.name,
                    price,
                },
            );
        }

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// A coupon without an `id` takes its map key.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for (id, mut coupon) in fixture.coupons {
            if coupon.id.is_empty() {
                coupon.id.clone_from(&id);
            }

            self.coupons.insert(id, coupon);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products and coupons with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_products(name)?.load_coupons(name)?;

        Ok(fixture)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &str) -> Result<&FixtureProduct, FixtureError> {
        self.products
            .get(id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// Products sorted by id
    pub fn products(&self) -> Vec<(&str, &FixtureProduct)> {
        let mut products: Vec<_> = self
            .products
            .iter()
            .map(|(id, product)| (id.as_str(), product))
            .collect();

        products.sort_by_key(|(id, _)| *id);

        products
    }

    /// Find a coupon by the code a shopper types. Codes are exact-match.
    pub fn coupon_by_code(&self, code: &str) -> Option<&CouponCode> {
        self.coupons.values().find(|coupon| coupon.code == code)
    }

    /// Coupons sorted by code
    pub fn coupons(&self) -> Vec<&CouponCode> {
        let mut coupons: Vec<_> = self.coupons.values().collect();

        coupons.sort_by(|a, b| a.code.cmp(&b.code));

        coupons
    }

    /// Get the currency of the fixture set
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
