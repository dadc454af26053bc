//! Order Costing
//!
//! [`OrderCalculator`] prices every parcel in an order, applies the best
//! combination of bulk discounts and adds the expedite surcharge when asked.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    discounts::{DiscountError, DiscountRule, best_discounts},
    line_items::LineItem,
    orders::Order,
    parcels::Parcel,
    pricing::{PricingError, cheapest_tier, total_cost},
    receipt::OrderResult,
    tiers::TierTable,
};

/// Errors that can occur while costing an order.
#[derive(Debug, Error, PartialEq)]
pub enum CostingError {
    /// A parcel could not be priced.
    #[error("parcel {parcel_idx}: {source}")]
    Pricing {
        /// Position of the parcel in the order
        parcel_idx: usize,

        /// Why the parcel could not be priced
        source: PricingError,
    },

    /// Wrapped discount configuration or search error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Prices orders against a tier table and a set of discount rules.
///
/// The calculator holds only read-only configuration, so one instance can be
/// shared between callers.
#[derive(Clone, Debug)]
pub struct OrderCalculator<'a> {
    tiers: TierTable<'a>,
    rules: SmallVec<[DiscountRule; 3]>,
}

impl OrderCalculator<'static> {
    /// Calculator using the standard tier table and discount rules.
    pub fn standard() -> Self {
        Self {
            tiers: TierTable::standard(),
            rules: SmallVec::from_buf(DiscountRule::standard()),
        }
    }
}

impl<'a> OrderCalculator<'a> {
    /// Create a calculator with a custom tier table and discount rules.
    ///
    /// Rules are tried in the order given, which decides between discount
    /// combinations that save the same amount.
    pub fn new(tiers: TierTable<'a>, rules: impl IntoIterator<Item = DiscountRule>) -> Self {
        Self {
            tiers,
            rules: rules.into_iter().collect(),
        }
    }

    /// The tier table parcels are priced against
    pub fn tiers(&self) -> &TierTable<'a> {
        &self.tiers
    }

    /// The discount rules, in evaluation order
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Currency of every amount this calculator produces
    pub fn currency(&self) -> &'a Currency {
        self.tiers.currency()
    }

    /// Price a single parcel as the line item at `parcel_idx`.
    ///
    /// # Errors
    ///
    /// Returns [`CostingError::Pricing`] if no tier accepts the parcel or its
    /// cost overflows.
    pub fn price_parcel(
        &self,
        parcel_idx: usize,
        parcel: &Parcel,
    ) -> Result<LineItem<'a>, CostingError> {
        let quote = cheapest_tier(&self.tiers, parcel)
            .map_err(|source| CostingError::Pricing { parcel_idx, source })?;

        debug!(
            parcel_idx,
            category = %quote.category,
            cost = %quote.cost,
            "priced parcel"
        );

        Ok(LineItem::parcel(parcel_idx, quote.category, quote.cost))
    }

    /// Cost an order.
    ///
    /// An absent order, or one without parcels, costs nothing. If expedited
    /// handling is requested, a surcharge equal to everything costed so far
    /// (parcels less discounts) is added as the final line item.
    ///
    /// # Errors
    ///
    /// - [`CostingError::Pricing`]: a parcel could not be priced.
    /// - [`CostingError::Discount`]: the discount search failed.
    /// - [`CostingError::Money`]: money arithmetic failed.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            parcels = order.map_or(0, Order::len),
            expedite = order.is_some_and(Order::is_expedited)
        )
    )]
    pub fn calculate(&self, order: Option<&Order>) -> Result<OrderResult<'a>, CostingError> {
        let currency = self.currency();

        let Some(order) = order else {
            return Ok(OrderResult::new(smallvec![], Money::from_minor(0, currency)));
        };

        let mut line_items = order
            .parcels()
            .iter()
            .enumerate()
            .map(|(parcel_idx, parcel)| self.price_parcel(parcel_idx, parcel))
            .collect::<Result<SmallVec<[LineItem<'a>; 10]>, _>>()?;

        let discounts = best_discounts(&self.rules, &line_items, currency)?;
        line_items.extend(discounts);

        if order.is_expedited() {
            let surcharge = total_cost(&line_items, currency)?;

            debug!(%surcharge, "expedite surcharge");

            line_items.push(LineItem::expedite(surcharge));
        }

        let total = total_cost(&line_items, currency)?;

        debug!(%total, line_items = line_items.len(), "costed order");

        Ok(OrderResult::new(line_items, total))
    }
}

impl Default for OrderCalculator<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{categories::CostingCategory, parcels::ParcelError, tiers::TierParameters};

    use super::*;

    fn cube(side: i64, weight: Decimal) -> Result<Parcel, ParcelError> {
        Parcel::cube(Decimal::from(side), weight)
    }

    fn categories(result: &OrderResult<'_>) -> Vec<CostingCategory> {
        result.line_items().iter().map(LineItem::category).collect()
    }

    #[test]
    fn absent_order_costs_nothing() -> TestResult {
        let result = OrderCalculator::standard().calculate(None)?;

        assert_eq!(result.total(), Money::from_minor(0, USD));
        assert!(result.line_items().is_empty());

        Ok(())
    }

    #[test]
    fn order_without_parcels_costs_nothing() -> TestResult {
        let calculator = OrderCalculator::standard();

        let absent = calculator.calculate(Some(&Order::new(None, false)))?;
        let empty = calculator.calculate(Some(&Order::with_parcels(Vec::new())))?;

        assert_eq!(absent.total(), Money::from_minor(0, USD));
        assert!(absent.line_items().is_empty());
        assert_eq!(empty.total(), Money::from_minor(0, USD));
        assert!(empty.line_items().is_empty());

        Ok(())
    }

    #[test]
    fn expedited_empty_order_has_zero_surcharge() -> TestResult {
        let result = OrderCalculator::standard().calculate(Some(&Order::new(None, true)))?;

        assert_eq!(result.total(), Money::from_minor(0, USD));
        assert_eq!(categories(&result), vec![CostingCategory::ExpediteSurcharge]);
        assert_eq!(
            result.expedite_surcharge(),
            Some(Money::from_minor(0, USD))
        );

        Ok(())
    }

    #[test]
    fn each_parcel_gets_one_line_item_in_order() -> TestResult {
        let order = Order::with_parcels([
            cube(75, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(25, Decimal::ZERO)?,
        ]);

        let result = OrderCalculator::standard().calculate(Some(&order))?;

        let parcel_refs: Vec<Option<usize>> = result
            .line_items()
            .iter()
            .map(LineItem::parcel_idx)
            .collect();

        assert_eq!(parcel_refs, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(
            categories(&result),
            vec![
                CostingCategory::Large,
                CostingCategory::Small,
                CostingCategory::Medium,
            ]
        );
        assert_eq!(result.total(), Money::from_minor(2600, USD));

        Ok(())
    }

    #[test]
    fn expedite_doubles_the_subtotal() -> TestResult {
        let order = Order::with_parcels([
            cube(5, Decimal::ZERO)?,
            cube(25, Decimal::ZERO)?,
            cube(75, Decimal::ZERO)?,
            cube(125, Decimal::ZERO)?,
        ])
        .expedited();

        let result = OrderCalculator::standard().calculate(Some(&order))?;

        assert_eq!(
            result.expedite_surcharge(),
            Some(Money::from_minor(5100, USD))
        );
        assert_eq!(result.total(), Money::from_minor(10200, USD));

        Ok(())
    }

    #[test]
    fn expedite_surcharge_is_charged_after_discounts() -> TestResult {
        let order = Order::with_parcels([
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
        ])
        .expedited();

        let result = OrderCalculator::standard().calculate(Some(&order))?;

        assert_eq!(
            categories(&result),
            vec![
                CostingCategory::Small,
                CostingCategory::Small,
                CostingCategory::Small,
                CostingCategory::Small,
                CostingCategory::SmallMania,
                CostingCategory::ExpediteSurcharge,
            ]
        );
        assert_eq!(
            result.expedite_surcharge(),
            Some(Money::from_minor(900, USD))
        );
        assert_eq!(result.total(), Money::from_minor(1800, USD));

        Ok(())
    }

    #[test]
    fn price_parcel_reports_parcel_position() -> TestResult {
        let tiers = TierTable::new(
            [TierParameters::new(
                CostingCategory::Small,
                Money::from_minor(300, USD),
                Decimal::ONE,
                Money::from_minor(200, USD),
            )
            .with_max_dimension(Decimal::TEN)],
            USD,
        )?;

        let calculator = OrderCalculator::new(tiers, DiscountRule::standard());
        let order = Order::with_parcels([cube(5, Decimal::ZERO)?, cube(50, Decimal::ZERO)?]);

        let result = calculator.calculate(Some(&order));

        assert_eq!(
            result.err(),
            Some(CostingError::Pricing {
                parcel_idx: 1,
                source: PricingError::NoEligibleTier,
            })
        );

        Ok(())
    }

    #[test]
    fn no_rules_means_no_discounts() -> TestResult {
        let calculator = OrderCalculator::new(TierTable::standard(), Vec::<DiscountRule>::new());
        let order = Order::with_parcels(vec![cube(5, Decimal::ZERO)?; 8]);

        let result = calculator.calculate(Some(&order))?;

        assert_eq!(result.total(), Money::from_minor(2400, USD));
        assert_eq!(result.line_items().len(), 8);

        Ok(())
    }

    #[test]
    fn repeated_costing_is_identical() -> TestResult {
        let calculator = OrderCalculator::default();
        let order = Order::with_parcels([
            cube(5, Decimal::new(15, 1))?,
            cube(5, Decimal::ZERO)?,
            cube(25, Decimal::from(4))?,
            cube(125, Decimal::from(30))?,
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
        ])
        .expedited();

        let first = calculator.calculate(Some(&order))?;
        let second = calculator.calculate(Some(&order))?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn total_is_sum_of_line_items_and_discounts_are_negative() -> TestResult {
        let order = Order::with_parcels([
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(5, Decimal::ZERO)?,
            cube(25, Decimal::from(4))?,
            cube(25, Decimal::ZERO)?,
            cube(25, Decimal::ZERO)?,
            cube(75, Decimal::ZERO)?,
        ])
        .expedited();

        let result = OrderCalculator::standard().calculate(Some(&order))?;

        assert_eq!(result.total(), total_cost(result.line_items(), USD)?);
        assert!(result.discounts().next().is_some());
        assert!(
            result
                .discounts()
                .all(|item| item.cost().to_minor_units() < 0),
            "discounts should reduce the total"
        );

        Ok(())
    }
}
