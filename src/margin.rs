//! Margin Assessment
//!
//! Checks a calculated line total against a minimum-margin floor. A margin
//! shortfall is a normal business outcome, not an error: the assessment is
//! a pure predicate plus diagnostics, and the caller owns any fallback
//! policy (re-quote, reject). No retries happen here.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

/// The outcome of checking a line total against a margin floor.
///
/// `margin_percent` is `None` for a zero-total line, where margin is
/// undefined; such lines are never viable.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginAssessment {
    margin_percent: Option<Decimal>,
    floor: Decimal,
    viable: bool,
}

impl MarginAssessment {
    /// Return the realised margin as a percentage, if defined.
    pub fn margin_percent(&self) -> Option<Decimal> {
        self.margin_percent
    }

    /// Return the configured minimum-margin floor percentage.
    pub fn floor(&self) -> Decimal {
        self.floor
    }

    /// Return whether the line may be charged at this price.
    pub fn viable(&self) -> bool {
        self.viable
    }

    /// Render a human-readable rationale for this assessment.
    ///
    /// `applied` names the pricing that produced the total (a tier name or
    /// the negotiated-rate label). The margin percentage is rounded to one
    /// decimal place, midpoint away from zero.
    pub fn describe(&self, applied: &str) -> String {
        match self.margin_percent {
            None => format!("zero-total order; margin undefined (priced via {applied})"),
            Some(margin) => {
                let margin = margin.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

                if self.viable {
                    format!(
                        "priced via {applied}; margin {margin}% meets the {floor}% floor",
                        floor = self.floor
                    )
                } else {
                    format!(
                        "priced via {applied}; margin {margin}% is below the {floor}% floor",
                        floor = self.floor
                    )
                }
            }
        }
    }
}

/// Assess the realised margin of a line total against a floor.
///
/// The margin is `(total - quantity x unit_cost) / total`, as a percentage,
/// computed exactly in decimal arithmetic over minor units. A zero total
/// yields an undefined margin and a non-viable assessment.
pub fn assess(
    total: &Money<'_, Currency>,
    quantity: u32,
    unit_cost: &Money<'_, Currency>,
    floor: Decimal,
) -> MarginAssessment {
    let total = Decimal::from(total.to_minor_units());

    let margin_percent = if total.is_zero() {
        None
    } else {
        let cost = Decimal::from(unit_cost.to_minor_units()) * Decimal::from(quantity);

        (total - cost)
            .checked_div(total)
            .map(|fraction| fraction * Decimal::ONE_HUNDRED)
    };

    let viable = margin_percent.is_some_and(|margin| margin >= floor);

    MarginAssessment {
        margin_percent,
        floor,
        viable,
    }
}
