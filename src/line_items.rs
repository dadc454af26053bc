//! Line Items

use rusty_money::{Money, iso::Currency};

use crate::categories::CostingCategory;

/// One entry in a costed order: a priced parcel, a discount or the expedite surcharge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    parcel_idx: Option<usize>,
    cost: Money<'a, Currency>,
    category: CostingCategory,
}

impl<'a> LineItem<'a> {
    /// Creates a line item for the parcel at `parcel_idx` in the order.
    pub fn parcel(parcel_idx: usize, category: CostingCategory, cost: Money<'a, Currency>) -> Self {
        Self {
            parcel_idx: Some(parcel_idx),
            cost,
            category,
        }
    }

    /// Creates a discount line item; `cost` is expected to be negative.
    pub(crate) fn discount(category: CostingCategory, cost: Money<'a, Currency>) -> Self {
        Self {
            parcel_idx: None,
            cost,
            category,
        }
    }

    /// Creates the expedite surcharge line item.
    pub(crate) fn expedite(cost: Money<'a, Currency>) -> Self {
        Self {
            parcel_idx: None,
            cost,
            category: CostingCategory::ExpediteSurcharge,
        }
    }

    /// Index of the parcel this item prices, if any.
    pub fn parcel_idx(&self) -> Option<usize> {
        self.parcel_idx
    }

    /// Signed cost of the item
    pub fn cost(&self) -> &Money<'a, Currency> {
        &self.cost
    }

    /// Category tag of the item
    pub fn category(&self) -> CostingCategory {
        self.category
    }

    /// Returns true if this item prices a parcel.
    pub fn is_parcel(&self) -> bool {
        self.parcel_idx.is_some()
    }

    /// Returns true if this item is a bulk discount.
    pub fn is_discount(&self) -> bool {
        self.category.is_discount()
    }
}
