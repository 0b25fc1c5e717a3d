//! Fixtures
//!
//! Named YAML fixture sets for the catalog and negotiated rates, used by
//! the integration tests and the demo. A set is a pair of files with the
//! same name under `fixtures/catalog/` and `fixtures/rates/`.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, ProductKey, RestaurantKey},
    engine::PricingEngine,
    rates::InMemoryRateSource,
};

pub mod catalog;
pub mod rates;

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

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between fixture entries
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Restaurant not found
    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Rejected pricing configuration
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A loaded fixture set: catalog, restaurants and negotiated rates.
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog built from the fixture's products
    catalog: Catalog<'a>,

    /// Restaurant display names keyed by generated key
    restaurant_meta: SlotMap<RestaurantKey, String>,

    /// String key -> generated key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,
    restaurant_keys: FxHashMap<String, RestaurantKey>,

    /// Negotiated rates built from the fixture
    rates: InMemoryRateSource<'a>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            restaurant_meta: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            restaurant_keys: FxHashMap::default(),
            rates: InMemoryRateSource::new(),
            currency: None,
        }
    }

    /// Load a complete fixture set (catalog and rates with the same name).
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_rates(name)?;

        Ok(fixture)
    }

    /// Load products from a YAML catalog fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// malformed, currencies disagree, or a pricing configuration is
    /// rejected by validation.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: catalog::CatalogFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            let (_, currency) = catalog::parse_price(&product_fixture.base_price)?;

            if let Some(existing) = self.currency {
                if existing != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            let pricing = product_fixture.try_into_pricing()?;
            let product_key = self.catalog.insert(pricing);

            self.product_keys.insert(key, product_key);
        }

        Ok(self)
    }

    /// Load restaurants and negotiated rates from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a rate
    /// references an unknown product or restaurant.
    pub fn load_rates(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rates").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: rates::RatesFixture = serde_norway::from_str(&contents)?;

        for restaurant in fixture.restaurants {
            let key = self.restaurant_meta.insert(restaurant.clone());
            self.restaurant_keys.insert(restaurant, key);
        }

        for rate_fixture in fixture.rates {
            let restaurant = self.restaurant_key(&rate_fixture.restaurant)?;
            let product = self.product_key(&rate_fixture.product)?;

            self.rates
                .add(rate_fixture.try_into_rate(restaurant, product)?);
        }

        Ok(self)
    }

    /// Get a product key by its fixture string key.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a restaurant key by its fixture string key.
    ///
    /// # Errors
    ///
    /// Returns an error if the restaurant is not found.
    pub fn restaurant_key(&self, key: &str) -> Result<RestaurantKey, FixtureError> {
        self.restaurant_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::RestaurantNotFound(key.to_string()))
    }

    /// Get a restaurant display name by key.
    pub fn restaurant_name(&self, key: RestaurantKey) -> Option<&str> {
        self.restaurant_meta.get(key).map(String::as_str)
    }

    /// Return the currency of the fixture set.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoCurrency`] before any products are loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Consume the fixture into a ready-to-quote engine.
    #[must_use]
    pub fn into_engine(self) -> PricingEngine<'a, InMemoryRateSource<'a>> {
        PricingEngine::new(self.catalog, self.rates)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
