//! Negotiated Rate Fixtures

use chrono::{DateTime, Utc};
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    catalog::{ProductKey, RestaurantKey},
    fixtures::{FixtureError, catalog::parse_price},
    rates::NegotiatedRate,
};

/// Wrapper for a rates fixture file.
#[derive(Debug, Deserialize)]
pub struct RatesFixture {
    /// Restaurant fixture keys
    #[serde(default)]
    pub restaurants: Vec<String>,

    /// Negotiated rates
    #[serde(default)]
    pub rates: Vec<RateFixture>,
}

/// One negotiated rate as written in YAML.
#[derive(Debug, Deserialize)]
pub struct RateFixture {
    /// Restaurant fixture key
    pub restaurant: String,

    /// Product fixture key
    pub product: String,

    /// Negotiated per-unit price, e.g. `"35.00 GEL"`
    pub price_per_unit: String,

    /// Minimum quantity for the rate to apply
    pub min_quantity: u32,

    /// Start of the validity window (inclusive)
    pub valid_from: DateTime<Utc>,

    /// End of the validity window (inclusive)
    pub valid_until: DateTime<Utc>,

    /// Who negotiated the rate
    pub negotiated_by: String,

    /// When the rate was recorded; defaults to `valid_from`
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RateFixture {
    /// Convert to a [`NegotiatedRate`] using already-resolved keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the price string is malformed.
    pub fn try_into_rate(
        self,
        restaurant: RestaurantKey,
        product: ProductKey,
    ) -> Result<NegotiatedRate<'static>, FixtureError> {
        let (price_minor, currency) = parse_price(&self.price_per_unit)?;

        Ok(NegotiatedRate::new(
            restaurant,
            product,
            Money::from_minor(price_minor, currency),
            self.min_quantity,
            self.valid_from,
            self.valid_until,
            self.negotiated_by,
            self.created_at.unwrap_or(self.valid_from),
        ))
    }
}
