//! Pricing
//!
//! Per-parcel tier selection and money totals.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::trace;

use crate::{
    categories::CostingCategory, line_items::LineItem, parcels::Parcel, tiers::TierTable,
};

/// Errors that can occur while pricing a single parcel.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// No tier in the table accepts the parcel's dimensions.
    #[error("no eligible costing tier")]
    NoEligibleTier,

    /// The cost in the given tier does not fit in minor units.
    #[error("cost in tier {0} overflowed")]
    Overflow(CostingCategory),
}

/// The tier a parcel was assigned and what it costs there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TierQuote<'a> {
    /// Tier the parcel is priced in
    pub category: CostingCategory,

    /// Cost of the parcel in that tier
    pub cost: Money<'a, Currency>,
}

/// Selects the cheapest tier that accepts `parcel`.
///
/// Every eligible tier is priced, not just the smallest bracket the parcel
/// fits, so a flat heavy tier can undercut an overweight size bracket. Ties
/// keep the tier that appears first in the table.
///
/// # Errors
///
/// - [`PricingError::NoEligibleTier`]: no tier accepts the parcel.
/// - [`PricingError::Overflow`]: a tier cost could not be represented.
pub fn cheapest_tier<'a>(
    tiers: &TierTable<'a>,
    parcel: &Parcel,
) -> Result<TierQuote<'a>, PricingError> {
    let mut best: Option<TierQuote<'a>> = None;

    for tier in tiers.iter().filter(|tier| tier.accepts(parcel)) {
        let cost = tier.cost_for(parcel)?;

        trace!(category = %tier.category(), %cost, "eligible tier");

        if best.is_none_or(|best| cost.to_minor_units() < best.cost.to_minor_units()) {
            best = Some(TierQuote {
                category: tier.category(),
                cost,
            });
        }
    }

    best.ok_or(PricingError::NoEligibleTier)
}

/// Calculates the total cost of a list of line items.
///
/// An empty list totals to zero in `currency`.
///
/// # Errors
///
/// Returns a [`MoneyError`] if an item is in a different currency.
pub fn total_cost<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError> {
    items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            acc.add(*item.cost())
        })
}
