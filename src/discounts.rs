//! Bulk Discount Rules
//!
//! A discount rule grants a percentage off the tier subtotal once the
//! ordered quantity reaches its threshold. Rules do not stack: the single
//! rule with the highest threshold not exceeding the quantity applies, or
//! none at all.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// A bulk discount rule: a quantity threshold and a percentage off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountRule {
    min_quantity: u32,
    percent_off: Percentage,
}

impl DiscountRule {
    /// Create a rule granting `percent_off` at and above `min_quantity`.
    pub fn new(min_quantity: u32, percent_off: Percentage) -> Self {
        Self {
            min_quantity,
            percent_off,
        }
    }

    /// Return the quantity threshold.
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// Return the percentage off.
    pub fn percent_off(&self) -> Percentage {
        self.percent_off
    }

    /// Return whether the quantity meets this rule's threshold.
    pub fn qualifies(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity
    }
}

/// Select the single best-matching rule for a quantity.
///
/// The rule with the highest threshold not exceeding `quantity` wins;
/// `None` when no rule qualifies. At most one rule ever applies to a
/// calculation.
pub fn best_rule(quantity: u32, rules: &[DiscountRule]) -> Option<&DiscountRule> {
    rules
        .iter()
        .filter(|rule| rule.qualifies(quantity))
        .max_by_key(|rule| rule.min_quantity)
}

/// Calculate a percentage of an amount in minor units.
///
/// Rounds to whole minor units, midpoint away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the multiplication
/// overflows or the result cannot be represented in minor units.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn volume_rules() -> Vec<DiscountRule> {
        vec![
            DiscountRule::new(10, Percentage::from(0.05)),
            DiscountRule::new(30, Percentage::from(0.10)),
            DiscountRule::new(100, Percentage::from(0.15)),
        ]
    }

    #[test]
    fn best_rule_picks_highest_qualifying_threshold() {
        let rules = volume_rules();

        let rule = best_rule(35, &rules);

        assert_eq!(rule.map(DiscountRule::min_quantity), Some(30));
        assert_eq!(
            rule.map(DiscountRule::percent_off),
            Some(Percentage::from(0.10))
        );
    }

    #[test]
    fn best_rule_threshold_is_inclusive() {
        let rules = volume_rules();

        assert_eq!(
            best_rule(30, &rules).map(DiscountRule::min_quantity),
            Some(30)
        );
        assert_eq!(
            best_rule(29, &rules).map(DiscountRule::min_quantity),
            Some(10)
        );
    }

    #[test]
    fn best_rule_returns_none_below_all_thresholds() {
        let rules = volume_rules();

        assert!(best_rule(5, &rules).is_none());
    }

    #[test]
    fn best_rule_returns_none_for_empty_rule_set() {
        assert!(best_rule(50, &[]).is_none());
    }

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        let percent = Percentage::from(0.10);
        let result = percent_of_minor(&percent, 140_000)?;

        assert_eq!(result, 14_000);

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_midpoint_away_from_zero() -> TestResult {
        let percent = Percentage::from(0.05);
        let result = percent_of_minor(&percent, 30)?;

        // 5% of 30 is 1.5, which rounds to 2.
        assert_eq!(result, 2);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MAX);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }

    #[test]
    fn percent_of_minor_underflow_returns_error() {
        let percent = Percentage::from(2.0);
        let result = percent_of_minor(&percent, i64::MIN);

        assert!(matches!(result, Err(DiscountError::PercentConversion)));
    }
}
