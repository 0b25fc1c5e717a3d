//! Order Aggregation
//!
//! Collects independently priced line quotes into one order-level quote:
//! summed subtotal, discount and total, plus the indexes of non-viable
//! lines so the checkout flow can reject or re-quote them. Lines carry no
//! cross-line invariants; their order never affects any line's result.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::quote::LineQuote;

/// Errors related to order aggregation.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A line's currency differs from the order currency (index, line
    /// currency, order currency).
    #[error("line {0} has currency {1}, but the order has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line index was out of range.
    #[error("line {0} not found")]
    LineNotFound(usize),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// An order-level quote aggregating per-line quotes for one restaurant.
#[derive(Debug, Clone)]
pub struct OrderQuote<'a> {
    lines: Vec<LineQuote<'a>>,

    /// Indexes of lines the margin assessment rejected
    non_viable_lines: SmallVec<[usize; 10]>,

    /// Sum of line subtotals before discounts
    subtotal: Money<'a, Currency>,

    /// Sum of line discounts
    discount: Money<'a, Currency>,

    /// Sum of line totals
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> OrderQuote<'a> {
    /// Aggregate line quotes into an order quote.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if a line's currency differs from the
    /// order currency or money arithmetic fails.
    pub fn from_lines(
        lines: impl Into<Vec<LineQuote<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, OrderError> {
        let lines = lines.into();

        lines.iter().enumerate().try_for_each(|(i, line)| {
            let line_currency = line.total().currency();

            if line_currency == currency {
                Ok(())
            } else {
                Err(OrderError::CurrencyMismatch(
                    i,
                    line_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        let zero = Money::from_minor(0, currency);

        let subtotal = lines
            .iter()
            .try_fold(zero, |acc, line| acc.add(*line.subtotal()))?;

        let discount = lines
            .iter()
            .try_fold(zero, |acc, line| acc.add(*line.discount()))?;

        let total = lines
            .iter()
            .try_fold(zero, |acc, line| acc.add(*line.total()))?;

        let non_viable_lines = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.viable())
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            lines,
            non_viable_lines,
            subtotal,
            discount,
            total,
            currency,
        })
    }

    /// Return the priced lines.
    pub fn lines(&self) -> &[LineQuote<'a>] {
        &self.lines
    }

    /// Get a line by index.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::LineNotFound`] if the index is out of range.
    pub fn line(&self, index: usize) -> Result<&LineQuote<'a>, OrderError> {
        self.lines.get(index).ok_or(OrderError::LineNotFound(index))
    }

    /// Return the sum of line subtotals before discounts.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Return the sum of line discounts.
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Return the sum of line totals.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Return the indexes of lines the margin assessment rejected.
    pub fn non_viable_lines(&self) -> &[usize] {
        &self.non_viable_lines
    }

    /// Return whether every line may be charged as quoted.
    ///
    /// Checkout must not proceed at these prices unless this holds; the
    /// per-line reasons say which lines fell short and why.
    #[must_use]
    pub fn all_viable(&self) -> bool {
        self.non_viable_lines.is_empty()
    }

    /// Return the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the order has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Return the currency of the order.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
