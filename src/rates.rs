//! Negotiated Rates
//!
//! A negotiated rate is a customer-specific, time-bounded override price
//! for a single restaurant and product pair. An eligible rate supersedes
//! tier and discount logic entirely. Rates are read through a
//! [`RateSource`], an injected lookup capability, so the calculation core
//! never touches storage directly and tests can substitute a fake.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::catalog::{ProductKey, RestaurantKey};

/// Errors surfaced by a rate lookup backend.
///
/// The pricing engine treats any of these as "no rate found" (fail open to
/// standard pricing) after logging; they never abort a quote.
#[derive(Debug, Error)]
pub enum RateLookupError {
    /// The backend did not answer within its deadline.
    #[error("rate lookup timed out: {0}")]
    Timeout(String),

    /// The backend failed outright.
    #[error("rate lookup failed: {0}")]
    Backend(String),
}

/// A customer-specific negotiated price for one restaurant and product.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatedRate<'a> {
    restaurant: RestaurantKey,
    product: ProductKey,
    price_per_unit: Money<'a, Currency>,
    min_quantity: u32,
    valid_from: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    negotiated_by: String,
    created_at: DateTime<Utc>,
}

impl<'a> NegotiatedRate<'a> {
    /// Create a new negotiated rate.
    #[expect(clippy::too_many_arguments, reason = "plain record constructor")]
    pub fn new(
        restaurant: RestaurantKey,
        product: ProductKey,
        price_per_unit: Money<'a, Currency>,
        min_quantity: u32,
        valid_from: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        negotiated_by: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            restaurant,
            product,
            price_per_unit,
            min_quantity,
            valid_from,
            valid_until,
            negotiated_by: negotiated_by.into(),
            created_at,
        }
    }

    /// Return the restaurant this rate is scoped to.
    pub fn restaurant(&self) -> RestaurantKey {
        self.restaurant
    }

    /// Return the product this rate is scoped to.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Return the negotiated per-unit price.
    pub fn price_per_unit(&self) -> &Money<'a, Currency> {
        &self.price_per_unit
    }

    /// Return the minimum quantity required for this rate to apply.
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// Return the start of the validity window (inclusive).
    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    /// Return the end of the validity window (inclusive).
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    /// Return who negotiated this rate.
    pub fn negotiated_by(&self) -> &str {
        &self.negotiated_by
    }

    /// Return when this rate was recorded.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return whether this rate is eligible for the quantity at `now`.
    ///
    /// A rate outside its validity window, or below its quantity threshold,
    /// must never be applied; an ineligible rate is indistinguishable from
    /// no rate at all.
    pub fn covers(&self, quantity: u32, now: DateTime<Utc>) -> bool {
        quantity >= self.min_quantity && now >= self.valid_from && now <= self.valid_until
    }
}

/// Select the most favorable eligible rate: the lowest per-unit price.
pub fn best_rate<'a, 'b>(
    rates: &'b [NegotiatedRate<'a>],
    quantity: u32,
    now: DateTime<Utc>,
) -> Option<&'b NegotiatedRate<'a>> {
    rates
        .iter()
        .filter(|rate| rate.covers(quantity, now))
        .min_by_key(|rate| rate.price_per_unit.to_minor_units())
}

/// A read-only lookup capability for negotiated rates.
///
/// Implementations filter on the restaurant+product pair, the validity
/// window and the quantity threshold, returning the lowest-priced eligible
/// rate. A real backend would run this as a storage query; the engine only
/// requires these semantics.
pub trait RateSource<'a> {
    /// Find the most favorable eligible rate, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`RateLookupError`] when the backend fails or times out.
    /// Callers must treat an error as "no rate found", never as success.
    fn find_rate(
        &self,
        restaurant: RestaurantKey,
        product: ProductKey,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<NegotiatedRate<'a>>, RateLookupError>;
}

/// An in-memory [`RateSource`] backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryRateSource<'a> {
    rates: FxHashMap<(RestaurantKey, ProductKey), Vec<NegotiatedRate<'a>>>,
}

impl<'a> InMemoryRateSource<'a> {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate to the source.
    pub fn add(&mut self, rate: NegotiatedRate<'a>) {
        self.rates
            .entry((rate.restaurant, rate.product))
            .or_default()
            .push(rate);
    }

    /// Return the number of stored rates across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.values().map(Vec::len).sum()
    }

    /// Check whether the source holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<'a> RateSource<'a> for InMemoryRateSource<'a> {
    fn find_rate(
        &self,
        restaurant: RestaurantKey,
        product: ProductKey,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<NegotiatedRate<'a>>, RateLookupError> {
        let rates = self.rates.get(&(restaurant, product));

        Ok(rates.and_then(|rates| best_rate(rates, quantity, now).cloned()))
    }
}
