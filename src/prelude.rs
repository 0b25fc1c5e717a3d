//! Provender prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, ProductKey, RestaurantKey, VariantPricing},
    discounts::{DiscountError, DiscountRule},
    engine::{EngineError, PricingEngine},
    fixtures::{Fixture, FixtureError},
    margin::MarginAssessment,
    orders::{OrderError, OrderQuote},
    pricing::{PricingError, price_line},
    quote::{AppliedPricing, LineQuote},
    rates::{InMemoryRateSource, NegotiatedRate, RateLookupError, RateSource},
    render::order_table,
    tiers::{PriceTier, TierError},
};
