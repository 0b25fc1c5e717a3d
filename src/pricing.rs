//! Pricing Pipeline
//!
//! The one-shot calculation for a single order line: quantity validation,
//! negotiated-rate short-circuit, tier resolution, the single best-matching
//! discount rule, then margin assessment. Pure and synchronous — the
//! negotiated rate is fetched by the caller beforehand, and `now` is an
//! explicit argument, so identical inputs always produce identical quotes.

use chrono::{DateTime, Utc};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::VariantPricing,
    discounts::{self, DiscountError},
    margin,
    quote::{AppliedPricing, LineQuote},
    rates::NegotiatedRate,
    tiers::{self, TierError},
};

/// Errors from pricing a single line.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Quantity must be a positive integer.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(u32),

    /// Minor-unit arithmetic overflowed while scaling a price.
    #[error("line amount overflowed minor-unit arithmetic")]
    AmountOverflow,

    /// No tier covers the quantity; a configuration defect, not a
    /// transient condition.
    #[error(transparent)]
    Tier(#[from] TierError),

    /// Percentage arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Multiply a per-unit price by a quantity, in minor units.
fn scale<'a>(
    price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, price.currency()))
        .ok_or(PricingError::AmountOverflow)
}

/// Price one order line.
///
/// Evaluation order is fixed: an eligible negotiated rate overrides
/// everything; otherwise tier selection precedes discount-rule application
/// and at most one discount rule applies. An ineligible rate (expired or
/// below its quantity threshold) is treated exactly like no rate. The
/// margin assessment runs on every line, negotiated or not; a shortfall
/// yields a non-viable quote rather than an error.
///
/// # Errors
///
/// - [`PricingError::InvalidQuantity`] for a zero quantity, before any
///   tier lookup.
/// - [`PricingError::Tier`] when no tier covers the quantity; callers must
///   surface this, never substitute a fallback price.
/// - [`PricingError::Discount`] / [`PricingError::AmountOverflow`] when
///   minor-unit arithmetic cannot be represented.
pub fn price_line<'a>(
    quantity: u32,
    pricing: &VariantPricing<'a>,
    rate: Option<&NegotiatedRate<'a>>,
    now: DateTime<Utc>,
) -> Result<LineQuote<'a>, PricingError> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity(quantity));
    }

    if let Some(rate) = rate.filter(|rate| rate.covers(quantity, now)) {
        return negotiated_line(quantity, pricing, rate);
    }

    standard_line(quantity, pricing)
}

/// Price a line at a negotiated rate, bypassing tiers and discounts.
fn negotiated_line<'a>(
    quantity: u32,
    pricing: &VariantPricing<'a>,
    rate: &NegotiatedRate<'a>,
) -> Result<LineQuote<'a>, PricingError> {
    let unit_price = *rate.price_per_unit();
    let subtotal = scale(&unit_price, quantity)?;

    let applied = AppliedPricing::NegotiatedRate;
    let assessment = margin::assess(&subtotal, quantity, pricing.unit_cost(), pricing.margin_floor());
    let reason = assessment.describe(&applied.to_string());

    Ok(LineQuote::new(
        quantity,
        unit_price,
        applied,
        subtotal,
        Money::from_minor(0, unit_price.currency()),
        None,
        subtotal,
        assessment,
        reason,
    ))
}

/// Price a line through tier resolution and the best-matching discount.
fn standard_line<'a>(
    quantity: u32,
    pricing: &VariantPricing<'a>,
) -> Result<LineQuote<'a>, PricingError> {
    let tier = tiers::resolve_tier(quantity, pricing.tiers())?;
    let unit_price = *tier.price_per_unit();
    let subtotal = scale(&unit_price, quantity)?;

    let rule = discounts::best_rule(quantity, pricing.discount_rules());

    let (discount_minor, discount_percent) = match rule {
        Some(rule) => {
            let percent = rule.percent_off();
            let minor = discounts::percent_of_minor(&percent, subtotal.to_minor_units())?;

            (minor, Some(percent))
        }
        None => (0, None),
    };

    let currency = unit_price.currency();
    let total_minor = 0.max(subtotal.to_minor_units() - discount_minor);
    let total = Money::from_minor(total_minor, currency);

    let applied = AppliedPricing::Tier(tier.name().to_string());
    let assessment = margin::assess(&total, quantity, pricing.unit_cost(), pricing.margin_floor());
    let reason = assessment.describe(&applied.to_string());

    Ok(LineQuote::new(
        quantity,
        unit_price,
        applied,
        subtotal,
        Money::from_minor(discount_minor, currency),
        discount_percent,
        total,
        assessment,
        reason,
    ))
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use rusty_money::iso::GEL;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{
        catalog::{ProductKey, RestaurantKey},
        discounts::DiscountRule,
        tiers::PriceTier,
    };

    use super::*;

    fn timestamp(offset_days: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_780_000_000 + offset_days * 86_400, 0)
            .expect("timestamp in range")
    }

    fn carton_pricing<'a>() -> VariantPricing<'a> {
        VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            vec![
                PriceTier::new("1-10", 1, Some(10), Money::from_minor(5000, GEL)),
                PriceTier::new("11-30", 11, Some(30), Money::from_minor(4500, GEL)),
                PriceTier::new("31+", 31, None, Money::from_minor(4000, GEL)),
            ],
            vec![DiscountRule::new(30, Percentage::from(0.10))],
            Decimal::from(15),
        )
        .expect("valid test pricing")
    }

    fn negotiated<'a>(price_minor: i64, min_quantity: u32) -> NegotiatedRate<'a> {
        let mut restaurants = SlotMap::<RestaurantKey, ()>::with_key();
        let mut products = SlotMap::<ProductKey, ()>::with_key();

        NegotiatedRate::new(
            restaurants.insert(()),
            products.insert(()),
            Money::from_minor(price_minor, GEL),
            min_quantity,
            timestamp(-10),
            timestamp(10),
            "account-manager",
            timestamp(-10),
        )
    }

    #[test]
    fn zero_quantity_is_rejected_before_tier_lookup() {
        let pricing = carton_pricing();

        let result = price_line(0, &pricing, None, timestamp(0));

        assert!(matches!(result, Err(PricingError::InvalidQuantity(0))));
    }

    #[test]
    fn standard_line_without_discount() -> TestResult {
        let pricing = carton_pricing();

        let quote = price_line(25, &pricing, None, timestamp(0))?;

        assert_eq!(quote.subtotal(), &Money::from_minor(112_500, GEL));
        assert_eq!(quote.discount(), &Money::from_minor(0, GEL));
        assert_eq!(quote.total(), &Money::from_minor(112_500, GEL));
        assert_eq!(quote.applied().tier_name(), Some("11-30"));
        assert!(quote.discount_percent().is_none());

        Ok(())
    }

    #[test]
    fn standard_line_with_discount_rule() -> TestResult {
        let pricing = carton_pricing();

        let quote = price_line(35, &pricing, None, timestamp(0))?;

        assert_eq!(quote.subtotal(), &Money::from_minor(140_000, GEL));
        assert_eq!(quote.discount(), &Money::from_minor(14_000, GEL));
        assert_eq!(quote.total(), &Money::from_minor(126_000, GEL));
        assert_eq!(quote.discount_percent(), Some(Percentage::from(0.10)));

        Ok(())
    }

    #[test]
    fn negotiated_rate_overrides_tiers_and_discounts() -> TestResult {
        let pricing = carton_pricing();
        let rate = negotiated(3500, 20);

        let quote = price_line(25, &pricing, Some(&rate), timestamp(0))?;

        assert_eq!(quote.total(), &Money::from_minor(87_500, GEL));
        assert_eq!(quote.discount(), &Money::from_minor(0, GEL));
        assert_eq!(quote.applied(), &AppliedPricing::NegotiatedRate);
        assert!(quote.reason().contains("negotiated_rate"));

        Ok(())
    }

    #[test]
    fn rate_below_its_quantity_threshold_falls_back_to_tiers() -> TestResult {
        let pricing = carton_pricing();
        let rate = negotiated(3500, 50);

        let quote = price_line(25, &pricing, Some(&rate), timestamp(0))?;

        assert_eq!(quote.applied().tier_name(), Some("11-30"));
        assert_eq!(quote.total(), &Money::from_minor(112_500, GEL));

        Ok(())
    }

    #[test]
    fn expired_rate_falls_back_to_tiers() -> TestResult {
        let pricing = carton_pricing();
        let rate = negotiated(3500, 1);

        let quote = price_line(25, &pricing, Some(&rate), timestamp(30))?;

        assert_eq!(quote.applied().tier_name(), Some("11-30"));

        Ok(())
    }

    #[test]
    fn uncovered_quantity_is_a_hard_failure() {
        let pricing = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(3800, GEL),
            vec![PriceTier::new(
                "1-10",
                1,
                Some(10),
                Money::from_minor(5000, GEL),
            )],
            Vec::new(),
            Decimal::from(15),
        )
        .expect("valid test pricing");

        let result = price_line(11, &pricing, None, timestamp(0));

        assert!(matches!(
            result,
            Err(PricingError::Tier(TierError::NoTierMatch(11)))
        ));
    }

    #[test]
    fn margin_shortfall_is_a_quote_not_an_error() -> TestResult {
        let pricing = VariantPricing::new(
            Money::from_minor(5000, GEL),
            Money::from_minor(4400, GEL),
            vec![PriceTier::new("11-30", 11, Some(30), Money::from_minor(4500, GEL))],
            Vec::new(),
            Decimal::from(15),
        )
        .expect("valid test pricing");

        let quote = price_line(25, &pricing, None, timestamp(0))?;

        assert!(!quote.viable());
        assert!(quote.reason().contains("2.2%"), "reason: {}", quote.reason());
        assert!(quote.reason().contains("15%"), "reason: {}", quote.reason());

        Ok(())
    }

    #[test]
    fn identical_inputs_yield_identical_quotes() -> TestResult {
        let pricing = carton_pricing();
        let rate = negotiated(3500, 20);
        let now = timestamp(0);

        let first = price_line(25, &pricing, Some(&rate), now)?;
        let second = price_line(25, &pricing, Some(&rate), now)?;

        assert_eq!(first, second);

        Ok(())
    }
}
