//! Line Quotes
//!
//! The immutable result of pricing one order line: the full breakdown from
//! unit price to margin assessment, plus a human-readable rationale kept
//! for audit. A quote is produced fresh per calculation and never mutated.

use std::fmt;

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};

use crate::margin::MarginAssessment;

/// The pricing that produced a line's unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedPricing {
    /// Standard pricing through a named volume tier.
    Tier(String),

    /// A customer-specific negotiated rate, bypassing tiers and discounts.
    NegotiatedRate,
}

impl AppliedPricing {
    /// Return the tier name, if standard pricing applied.
    pub fn tier_name(&self) -> Option<&str> {
        match self {
            AppliedPricing::Tier(name) => Some(name),
            AppliedPricing::NegotiatedRate => None,
        }
    }
}

impl fmt::Display for AppliedPricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppliedPricing::Tier(name) => write!(f, "tier '{name}'"),
            AppliedPricing::NegotiatedRate => write!(f, "negotiated_rate"),
        }
    }
}

/// The priced breakdown of a single order line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineQuote<'a> {
    quantity: u32,
    unit_price: Money<'a, Currency>,
    applied: AppliedPricing,
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    discount_percent: Option<Percentage>,
    total: Money<'a, Currency>,
    margin: MarginAssessment,
    reason: String,
}

impl<'a> LineQuote<'a> {
    #[expect(clippy::too_many_arguments, reason = "plain record constructor")]
    pub(crate) fn new(
        quantity: u32,
        unit_price: Money<'a, Currency>,
        applied: AppliedPricing,
        subtotal: Money<'a, Currency>,
        discount: Money<'a, Currency>,
        discount_percent: Option<Percentage>,
        total: Money<'a, Currency>,
        margin: MarginAssessment,
        reason: String,
    ) -> Self {
        Self {
            quantity,
            unit_price,
            applied,
            subtotal,
            discount,
            discount_percent,
            total,
            margin,
            reason,
        }
    }

    /// Return the quantity priced.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Return the per-unit price the line was charged at.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Return which pricing produced the unit price.
    pub fn applied(&self) -> &AppliedPricing {
        &self.applied
    }

    /// Return the pre-discount subtotal.
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Return the discount amount taken off the subtotal.
    pub fn discount(&self) -> &Money<'a, Currency> {
        &self.discount
    }

    /// Return the applied discount percentage, if a rule matched.
    pub fn discount_percent(&self) -> Option<Percentage> {
        self.discount_percent
    }

    /// Return the line total after discount.
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Return the margin assessment for this line.
    pub fn margin(&self) -> &MarginAssessment {
        &self.margin
    }

    /// Return whether the line may be charged at this price.
    ///
    /// Callers must not charge a non-viable line; the fallback policy
    /// (re-quote or reject) is theirs.
    pub fn viable(&self) -> bool {
        self.margin.viable()
    }

    /// Return the human-readable rationale, kept on the order for audit.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_label_names_the_tier() {
        let applied = AppliedPricing::Tier("11-30".to_string());

        assert_eq!(applied.to_string(), "tier '11-30'");
        assert_eq!(applied.tier_name(), Some("11-30"));
    }

    #[test]
    fn negotiated_rate_label_is_stable() {
        let applied = AppliedPricing::NegotiatedRate;

        assert_eq!(applied.to_string(), "negotiated_rate");
        assert_eq!(applied.tier_name(), None);
    }
}
