//! Costing Tiers
//!
//! A [`TierTable`] is an ordered list of [`TierParameters`]. Tiers are always
//! evaluated in table order, and that order is the tie-break when two tiers
//! price a parcel identically: the earlier tier wins.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{categories::CostingCategory, parcels::Parcel, pricing::PricingError};

/// Errors related to tier table construction.
#[derive(Debug, Error, PartialEq)]
pub enum TierTableError {
    /// The table has no tiers.
    #[error("tier table has no tiers")]
    Empty,

    /// A tier was tagged with a category that cannot price a parcel.
    #[error("tier {0} is tagged {1}, which is not a parcel tier")]
    NotATier(usize, CostingCategory),

    /// A tier amount is in a different currency to the table (index, tier currency, table currency).
    #[error("tier {0} has currency {1}, but table has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Base cost must be greater than zero.
    #[error("tier {0} base cost must be positive")]
    NonPositiveBaseCost(usize),

    /// The per-kg overage rate must not be negative.
    #[error("tier {0} cost per extra kg must not be negative")]
    NegativeRate(usize),

    /// The weight allowance must not be negative.
    #[error("tier {0} max weight must not be negative")]
    NegativeMaxWeight(usize),

    /// A dimension threshold must be greater than zero.
    #[error("tier {0} max dimension must be positive")]
    NonPositiveMaxDimension(usize),
}

/// Parameters of a single costing tier.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TierParameters<'a> {
    category: CostingCategory,
    base_cost: Money<'a, Currency>,
    max_weight: Decimal,
    cost_per_extra_kg: Money<'a, Currency>,
    max_dimension: Option<Decimal>,
}

impl<'a> TierParameters<'a> {
    /// Create a tier with no dimension threshold.
    pub fn new(
        category: CostingCategory,
        base_cost: Money<'a, Currency>,
        max_weight: Decimal,
        cost_per_extra_kg: Money<'a, Currency>,
    ) -> Self {
        Self {
            category,
            base_cost,
            max_weight,
            cost_per_extra_kg,
            max_dimension: None,
        }
    }

    /// Limit the tier to parcels whose dimensions are all below `max_dimension`.
    #[must_use]
    pub fn with_max_dimension(mut self, max_dimension: Decimal) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// Category a parcel priced by this tier is tagged with
    pub fn category(&self) -> CostingCategory {
        self.category
    }

    /// Flat cost before any overweight surcharge
    pub fn base_cost(&self) -> &Money<'a, Currency> {
        &self.base_cost
    }

    /// Weight allowance before the overweight surcharge applies
    pub fn max_weight(&self) -> Decimal {
        self.max_weight
    }

    /// Surcharge per started kilogram over the allowance
    pub fn cost_per_extra_kg(&self) -> &Money<'a, Currency> {
        &self.cost_per_extra_kg
    }

    /// Dimension threshold, if the tier is size-bounded
    pub fn max_dimension(&self) -> Option<Decimal> {
        self.max_dimension
    }

    /// Returns true if the parcel is eligible for this tier.
    pub fn accepts(&self, parcel: &Parcel) -> bool {
        self.max_dimension
            .is_none_or(|max_dimension| parcel.fits_within(max_dimension))
    }

    /// Cost of shipping `parcel` in this tier, ignoring eligibility.
    ///
    /// Weight over the allowance is rounded up to whole kilograms.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the surcharge cannot be represented.
    pub fn cost_for(&self, parcel: &Parcel) -> Result<Money<'a, Currency>, PricingError> {
        let overflow = PricingError::Overflow(self.category);

        let extra_kg = (parcel.weight() - self.max_weight)
            .max(Decimal::ZERO)
            .ceil()
            .to_i64()
            .ok_or(overflow)?;

        let surcharge = self
            .cost_per_extra_kg
            .to_minor_units()
            .checked_mul(extra_kg)
            .ok_or(overflow)?;

        let cost = self
            .base_cost
            .to_minor_units()
            .checked_add(surcharge)
            .ok_or(overflow)?;

        Ok(Money::from_minor(cost, self.base_cost.currency()))
    }
}

/// Ordered, immutable list of costing tiers sharing one currency.
#[derive(Clone, Debug, PartialEq)]
pub struct TierTable<'a> {
    tiers: SmallVec<[TierParameters<'a>; 5]>,
    currency: &'a Currency,
}

impl<'a> TierTable<'a> {
    /// Create a tier table, validating every tier.
    ///
    /// # Errors
    ///
    /// Returns a [`TierTableError`] if the table is empty or any tier is misconfigured.
    pub fn new(
        tiers: impl IntoIterator<Item = TierParameters<'a>>,
        currency: &'a Currency,
    ) -> Result<Self, TierTableError> {
        let tiers: SmallVec<[TierParameters<'a>; 5]> = tiers.into_iter().collect();

        if tiers.is_empty() {
            return Err(TierTableError::Empty);
        }

        tiers
            .iter()
            .enumerate()
            .try_for_each(|(i, tier)| validate_tier(i, tier, currency))?;

        Ok(TierTable { tiers, currency })
    }

    /// Iterate over the tiers in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &TierParameters<'a>> {
        self.tiers.iter()
    }

    /// Get the number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false; a validated table has at least one tier.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Currency every tier amount is expressed in
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

impl TierTable<'static> {
    /// The standard USD tier table.
    ///
    /// | tier        | base | allowance | per extra kg | dimensions |
    /// |-------------|------|-----------|--------------|------------|
    /// | small       | $3   | 1 kg      | $2           | < 10       |
    /// | medium      | $8   | 3 kg      | $2           | < 50       |
    /// | large       | $15  | 6 kg      | $2           | < 100      |
    /// | extra-large | $25  | 10 kg     | $2           | any        |
    /// | heavy       | $50  | 50 kg     | $1           | any        |
    pub fn standard() -> Self {
        let usd = |minor| Money::from_minor(minor, iso::USD);

        TierTable {
            tiers: SmallVec::from_buf([
                TierParameters::new(CostingCategory::Small, usd(300), Decimal::ONE, usd(200))
                    .with_max_dimension(Decimal::TEN),
                TierParameters::new(
                    CostingCategory::Medium,
                    usd(800),
                    Decimal::from(3),
                    usd(200),
                )
                .with_max_dimension(Decimal::from(50)),
                TierParameters::new(
                    CostingCategory::Large,
                    usd(1500),
                    Decimal::from(6),
                    usd(200),
                )
                .with_max_dimension(Decimal::ONE_HUNDRED),
                TierParameters::new(CostingCategory::ExtraLarge, usd(2500), Decimal::TEN, usd(200)),
                TierParameters::new(CostingCategory::Heavy, usd(5000), Decimal::from(50), usd(100)),
            ]),
            currency: iso::USD,
        }
    }
}

fn validate_tier(
    i: usize,
    tier: &TierParameters<'_>,
    currency: &Currency,
) -> Result<(), TierTableError> {
    if !tier.category.is_tier() {
        return Err(TierTableError::NotATier(i, tier.category));
    }

    for amount in [&tier.base_cost, &tier.cost_per_extra_kg] {
        if amount.currency() != currency {
            return Err(TierTableError::CurrencyMismatch(
                i,
                amount.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }
    }

    if tier.base_cost.to_minor_units() <= 0 {
        return Err(TierTableError::NonPositiveBaseCost(i));
    }

    if tier.cost_per_extra_kg.to_minor_units() < 0 {
        return Err(TierTableError::NegativeRate(i));
    }

    if tier.max_weight < Decimal::ZERO {
        return Err(TierTableError::NegativeMaxWeight(i));
    }

    if tier.max_dimension.is_some_and(|max| max <= Decimal::ZERO) {
        return Err(TierTableError::NonPositiveMaxDimension(i));
    }

    Ok(())
}
