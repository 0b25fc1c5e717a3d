//! Volume Price Tiers
//!
//! A tier is a quantity band with its own per-unit price. Pricing is
//! all-units: the entire quantity is charged at the rate of the band it
//! lands in. Lookup selects, among tiers whose band contains the requested
//! quantity, the one with the highest minimum (closest-below match).

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors from tier resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TierError {
    /// No configured tier's band contains the requested quantity.
    #[error("no price tier covers quantity {0}")]
    NoTierMatch(u32),
}

/// A volume price tier: a named quantity band with a per-unit price.
///
/// The band is `min_quantity..=max_quantity`, open-ended when
/// `max_quantity` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTier<'a> {
    name: String,
    min_quantity: u32,
    max_quantity: Option<u32>,
    price_per_unit: Money<'a, Currency>,
}

impl<'a> PriceTier<'a> {
    /// Create a new tier covering `min_quantity..=max_quantity`.
    pub fn new(
        name: impl Into<String>,
        min_quantity: u32,
        max_quantity: Option<u32>,
        price_per_unit: Money<'a, Currency>,
    ) -> Self {
        Self {
            name: name.into(),
            min_quantity,
            max_quantity,
            price_per_unit,
        }
    }

    /// Return the tier name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the lower bound of the band (inclusive).
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// Return the upper bound of the band (inclusive), if bounded.
    pub fn max_quantity(&self) -> Option<u32> {
        self.max_quantity
    }

    /// Return the per-unit price for quantities in this band.
    pub fn price_per_unit(&self) -> &Money<'a, Currency> {
        &self.price_per_unit
    }

    /// Return whether this tier's band contains the quantity.
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity && self.max_quantity.is_none_or(|max| quantity <= max)
    }
}

/// Select the applicable tier for a quantity.
///
/// Among tiers whose band contains `quantity`, the one with the highest
/// `min_quantity` wins. Overlapping bands with distinct minimums are legal;
/// duplicate minimums are rejected when the pricing configuration is built,
/// so resolution here is deterministic.
///
/// # Errors
///
/// Returns [`TierError::NoTierMatch`] when no band contains the quantity.
/// Callers must treat this as a hard failure and never substitute a default
/// tier.
pub fn resolve_tier<'a, 'b>(
    quantity: u32,
    tiers: &'b [PriceTier<'a>],
) -> Result<&'b PriceTier<'a>, TierError> {
    tiers
        .iter()
        .filter(|tier| tier.contains(quantity))
        .max_by_key(|tier| tier.min_quantity)
        .ok_or(TierError::NoTierMatch(quantity))
}
