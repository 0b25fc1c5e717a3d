//! Pricing Engine
//!
//! The orchestration layer wiring the catalog and the negotiated-rate
//! source to the pure pipeline. The engine holds no locks and no mutable
//! state; concurrent quoting for different lines or orders needs no
//! coordination. Checkout-time atomicity ("lock pricing during checkout")
//! belongs to the storage layer, not here.

use chrono::{DateTime, Utc};
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError, ProductKey, RestaurantKey},
    orders::{OrderError, OrderQuote},
    pricing::{PricingError, price_line},
    quote::LineQuote,
    rates::RateSource,
};

/// Errors from quoting through the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Catalog lookup or configuration error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Line pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Order aggregation error.
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// A quoting facade over a catalog and a negotiated-rate source.
///
/// The rate source is an injected capability; a failed or timed-out lookup
/// fails open to standard pricing with a warning, never a silent success
/// and never a failed quote.
#[derive(Debug)]
pub struct PricingEngine<'a, R> {
    catalog: Catalog<'a>,
    rates: R,
}

impl<'a, R: RateSource<'a>> PricingEngine<'a, R> {
    /// Create an engine over a catalog and a rate source.
    pub fn new(catalog: Catalog<'a>, rates: R) -> Self {
        Self { catalog, rates }
    }

    /// Return the catalog.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Quote a single order line for a restaurant.
    ///
    /// Looks up the most favorable eligible negotiated rate, then runs the
    /// pure pipeline. A non-viable quote is returned as-is; the caller
    /// decides whether to reject the line or re-quote.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] for an unknown product or a pricing
    /// failure (zero quantity, uncovered quantity, arithmetic overflow).
    /// Rate-lookup failures are not errors: they degrade to standard
    /// pricing.
    pub fn quote_line(
        &self,
        restaurant: RestaurantKey,
        product: ProductKey,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<LineQuote<'a>, EngineError> {
        let pricing = self.catalog.get(product)?;

        let rate = match self.rates.find_rate(restaurant, product, quantity, now) {
            Ok(rate) => rate,
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "negotiated-rate lookup failed; falling back to standard pricing"
                );
                None
            }
        };

        let quote = price_line(quantity, pricing, rate.as_ref(), now)?;

        if !quote.viable() {
            tracing::debug!(reason = quote.reason(), "line not viable at quoted price");
        }

        Ok(quote)
    }

    /// Quote a whole order for a restaurant.
    ///
    /// Each `(product, quantity)` line is priced independently; evaluation
    /// order across lines cannot affect any line's result.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if any line fails to price or the
    /// aggregate cannot be summed.
    pub fn quote_order(
        &self,
        restaurant: RestaurantKey,
        currency: &'static Currency,
        lines: &[(ProductKey, u32)],
        now: DateTime<Utc>,
    ) -> Result<OrderQuote<'a>, EngineError> {
        let quotes = lines
            .iter()
            .map(|&(product, quantity)| self.quote_line(restaurant, product, quantity, now))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderQuote::from_lines(quotes, currency)?)
    }
}
