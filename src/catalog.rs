//! Catalog
//!
//! Per-product pricing configuration and the read-only store the engine
//! consults at calculation time. Configurations are validated eagerly at
//! construction; a malformed tier set is rejected here, never discovered
//! mid-calculation.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{discounts::DiscountRule, tiers::PriceTier};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Restaurant Key
    pub struct RestaurantKey;
}

/// Errors from building or reading pricing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A pricing configuration must define at least one tier.
    #[error("pricing configuration has no tiers")]
    EmptyTiers,

    /// Every tier price must be strictly positive.
    #[error("tier '{0}' has a non-positive per-unit price")]
    NonPositiveTierPrice(String),

    /// A tier's upper bound is below its lower bound.
    #[error("tier '{0}' has an inverted quantity band")]
    InvertedTierBand(String),

    /// Two tiers share a minimum quantity, making closest-below resolution
    /// ambiguous.
    #[error("two tiers share the minimum quantity {0}")]
    DuplicateTierMinimum(u32),

    /// Unit cost must be non-negative.
    #[error("unit cost is negative")]
    NegativeCost,

    /// The margin floor must lie in `[0, 100)`.
    #[error("margin floor {0}% is outside [0, 100)")]
    InvalidMarginFloor(Decimal),

    /// A monetary field uses a different currency than the rest of the
    /// configuration.
    #[error("currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The catalog holds no configuration for the product.
    #[error("no pricing configuration for product")]
    ProductNotFound,
}

/// Pricing configuration for one product variant.
///
/// Administered externally and read-only to the engine: a calculation
/// reads one of these plus at most one negotiated rate.
#[derive(Debug, Clone)]
pub struct VariantPricing<'a> {
    base_price: Money<'a, Currency>,
    unit_cost: Money<'a, Currency>,
    tiers: Vec<PriceTier<'a>>,
    discount_rules: Vec<DiscountRule>,
    margin_floor: Decimal,
}

impl<'a> VariantPricing<'a> {
    /// Build a validated pricing configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the tier set is empty, a tier price is
    /// non-positive, a tier band is inverted, two tiers share a minimum,
    /// the unit cost is negative, the margin floor is outside `[0, 100)`,
    /// or any monetary field disagrees on currency.
    pub fn new(
        base_price: Money<'a, Currency>,
        unit_cost: Money<'a, Currency>,
        tiers: Vec<PriceTier<'a>>,
        discount_rules: Vec<DiscountRule>,
        margin_floor: Decimal,
    ) -> Result<Self, CatalogError> {
        if tiers.is_empty() {
            return Err(CatalogError::EmptyTiers);
        }

        let currency = base_price.currency();

        for tier in &tiers {
            if tier.price_per_unit().to_minor_units() <= 0 {
                return Err(CatalogError::NonPositiveTierPrice(tier.name().to_string()));
            }

            if tier.max_quantity().is_some_and(|max| max < tier.min_quantity()) {
                return Err(CatalogError::InvertedTierBand(tier.name().to_string()));
            }

            let tier_currency = tier.price_per_unit().currency();
            if tier_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    currency.iso_alpha_code,
                    tier_currency.iso_alpha_code,
                ));
            }
        }

        let mut minimums: Vec<u32> = tiers.iter().map(PriceTier::min_quantity).collect();
        minimums.sort_unstable();

        let duplicate = minimums.windows(2).find_map(|pair| match pair {
            [a, b] if a == b => Some(*a),
            _ => None,
        });

        if let Some(minimum) = duplicate {
            return Err(CatalogError::DuplicateTierMinimum(minimum));
        }

        if unit_cost.to_minor_units() < 0 {
            return Err(CatalogError::NegativeCost);
        }

        let cost_currency = unit_cost.currency();
        if cost_currency != currency {
            return Err(CatalogError::CurrencyMismatch(
                currency.iso_alpha_code,
                cost_currency.iso_alpha_code,
            ));
        }

        if margin_floor < Decimal::ZERO || margin_floor >= Decimal::ONE_HUNDRED {
            return Err(CatalogError::InvalidMarginFloor(margin_floor));
        }

        Ok(Self {
            base_price,
            unit_cost,
            tiers,
            discount_rules,
            margin_floor,
        })
    }

    /// Return the reference unit price (informational).
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Return the per-unit cost of goods.
    pub fn unit_cost(&self) -> &Money<'a, Currency> {
        &self.unit_cost
    }

    /// Return the volume price tiers.
    pub fn tiers(&self) -> &[PriceTier<'a>] {
        &self.tiers
    }

    /// Return the bulk discount rules.
    pub fn discount_rules(&self) -> &[DiscountRule] {
        &self.discount_rules
    }

    /// Return the minimum-margin floor percentage.
    pub fn margin_floor(&self) -> Decimal {
        self.margin_floor
    }

    /// Return the currency all monetary fields share.
    pub fn currency(&self) -> &'a Currency {
        self.base_price.currency()
    }
}

/// The read-only store of pricing configurations, keyed by product.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, VariantPricing<'a>>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pricing configuration, returning its key.
    pub fn insert(&mut self, pricing: VariantPricing<'a>) -> ProductKey {
        self.products.insert(pricing)
    }

    /// Look up the pricing configuration for a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for an unknown key.
    pub fn get(&self, product: ProductKey) -> Result<&VariantPricing<'a>, CatalogError> {
        self.products
            .get(product)
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Return the number of configured products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GEL, USD};
    use testresult::TestResult;

    use super::*;

    fn carton_tiers<'a>() -> Vec<PriceTier<'a>> {
        vec![
            PriceTier::new("1-10", 1, Some(10), Money::from_minor(5000, GEL)),
            PriceTier::new("11-30", 11, Some(30), Money::from_minor(4500, GEL)),
            PriceTier::new("31+", 31, None, Money::from_minor(4000, GEL)),
        ]
    }

    #[test]
    fn valid_configuration_builds() -> TestResult {
        let pricing = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            carton_tiers(),
            Vec::new(),
            Decimal::from(15),
        )?;

        assert_eq!(pricing.tiers().len(), 3);
        assert_eq!(pricing.margin_floor(), Decimal::from(15));
        assert_eq!(pricing.currency(), GEL);

        Ok(())
    }

    #[test]
    fn empty_tier_set_is_rejected() {
        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            Vec::new(),
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(result.err(), Some(CatalogError::EmptyTiers));
    }

    #[test]
    fn zero_price_tier_is_rejected() {
        let tiers = vec![PriceTier::new("free", 1, None, Money::from_minor(0, GEL))];

        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            tiers,
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(
            result.err(),
            Some(CatalogError::NonPositiveTierPrice("free".to_string()))
        );
    }

    #[test]
    fn inverted_band_is_rejected() {
        let tiers = vec![PriceTier::new(
            "backwards",
            10,
            Some(5),
            Money::from_minor(5000, GEL),
        )];

        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            tiers,
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(
            result.err(),
            Some(CatalogError::InvertedTierBand("backwards".to_string()))
        );
    }

    #[test]
    fn duplicate_tier_minimum_is_rejected() {
        let tiers = vec![
            PriceTier::new("a", 1, Some(10), Money::from_minor(5000, GEL)),
            PriceTier::new("b", 1, None, Money::from_minor(4500, GEL)),
        ];

        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            tiers,
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(result.err(), Some(CatalogError::DuplicateTierMinimum(1)));
    }

    #[test]
    fn negative_cost_is_rejected() {
        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(-1, GEL),
            carton_tiers(),
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(result.err(), Some(CatalogError::NegativeCost));
    }

    #[test]
    fn margin_floor_of_one_hundred_is_rejected() {
        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            carton_tiers(),
            Vec::new(),
            Decimal::ONE_HUNDRED,
        );

        assert_eq!(
            result.err(),
            Some(CatalogError::InvalidMarginFloor(Decimal::ONE_HUNDRED))
        );
    }

    #[test]
    fn mixed_currency_configuration_is_rejected() {
        let result = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, USD),
            carton_tiers(),
            Vec::new(),
            Decimal::from(15),
        );

        assert_eq!(
            result.err(),
            Some(CatalogError::CurrencyMismatch(
                GEL.iso_alpha_code,
                USD.iso_alpha_code
            ))
        );
    }

    #[test]
    fn catalog_lookup_round_trips() -> TestResult {
        let mut catalog = Catalog::new();

        let pricing = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            carton_tiers(),
            Vec::new(),
            Decimal::from(15),
        )?;

        let key = catalog.insert(pricing);

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(key)?.tiers().len(), 3);

        Ok(())
    }

    #[test]
    fn unknown_product_is_an_error() {
        let catalog = Catalog::new();

        assert_eq!(
            catalog.get(ProductKey::default()).err(),
            Some(CatalogError::ProductNotFound)
        );
    }
}
