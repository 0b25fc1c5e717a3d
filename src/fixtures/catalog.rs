//! Catalog Fixtures

use std::str::FromStr;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{
    catalog::VariantPricing, discounts::DiscountRule, fixtures::FixtureError, tiers::PriceTier,
};

/// Wrapper for a catalog fixture file.
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// One product's pricing configuration as written in YAML.
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Reference unit price, e.g. `"50.00 GEL"`
    pub base_price: String,

    /// Per-unit cost of goods
    pub unit_cost: String,

    /// Minimum-margin floor percentage, e.g. `15`
    pub margin_floor: f64,

    /// Volume price tiers
    pub tiers: Vec<TierFixture>,

    /// Bulk discount rules
    #[serde(default)]
    pub discount_rules: Vec<RuleFixture>,
}

/// One tier as written in YAML.
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Tier name
    pub name: String,

    /// Lower bound of the band (inclusive)
    pub min_quantity: u32,

    /// Upper bound of the band (inclusive), open-ended when absent
    #[serde(default)]
    pub max_quantity: Option<u32>,

    /// Per-unit price for the band
    pub price_per_unit: String,
}

/// One discount rule as written in YAML.
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Quantity threshold
    pub min_quantity: u32,

    /// Fractional percentage off, e.g. `0.10` for 10%
    pub percent_off: f64,
}

impl ProductFixture {
    /// Convert to a validated [`VariantPricing`].
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage is malformed, or the
    /// resulting configuration is rejected by validation.
    pub fn try_into_pricing(self) -> Result<VariantPricing<'static>, FixtureError> {
        let (base_minor, currency) = parse_price(&self.base_price)?;
        let (cost_minor, cost_currency) = parse_price(&self.unit_cost)?;

        if cost_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                cost_currency.iso_alpha_code.to_string(),
            ));
        }

        let tiers = self
            .tiers
            .into_iter()
            .map(|tier| {
                let (price_minor, tier_currency) = parse_price(&tier.price_per_unit)?;

                if tier_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        tier_currency.iso_alpha_code.to_string(),
                    ));
                }

                Ok(PriceTier::new(
                    tier.name,
                    tier.min_quantity,
                    tier.max_quantity,
                    Money::from_minor(price_minor, currency),
                ))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let discount_rules = self
            .discount_rules
            .into_iter()
            .map(|rule| {
                if !rule.percent_off.is_finite() {
                    return Err(FixtureError::InvalidPercentage(rule.percent_off.to_string()));
                }

                Ok(DiscountRule::new(
                    rule.min_quantity,
                    Percentage::from(rule.percent_off),
                ))
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let Some(margin_floor) = Decimal::from_f64(self.margin_floor) else {
            return Err(FixtureError::InvalidPercentage(self.margin_floor.to_string()));
        };

        let pricing = VariantPricing::new(
            Money::from_minor(base_minor, currency),
            Money::from_minor(cost_minor, currency),
            tiers,
            discount_rules,
            margin_floor,
        )?;

        Ok(pricing)
    }
}

/// Parse a fixture price string of the form `"50.00 GEL"` into minor units
/// and its currency.
///
/// # Errors
///
/// Returns an error if the string is not `amount CODE`, the amount is not
/// a decimal number, or the currency code is unknown.
pub fn parse_price(value: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = value.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(value.to_string()));
    };

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let Ok(amount) = Decimal::from_str(amount) else {
        return Err(FixtureError::InvalidPrice(value.to_string()));
    };

    let factor = Decimal::from(10_i64.pow(currency.exponent));

    amount
        .checked_mul(factor)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .map(|minor| (minor, currency))
        .ok_or_else(|| FixtureError::InvalidPrice(value.to_string()))
}
