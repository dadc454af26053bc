//! Parcel Costs prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    categories::CostingCategory,
    costing::{CostingError, OrderCalculator},
    discounts::{DiscountError, DiscountRule, RuleMatch, best_discounts},
    fixtures::{Fixture, FixtureError},
    line_items::LineItem,
    orders::Order,
    parcels::{Parcel, ParcelError},
    pricing::{PricingError, TierQuote, cheapest_tier, total_cost},
    receipt::{OrderResult, ReceiptError},
    tiers::{TierParameters, TierTable, TierTableError},
};
