//! Discounts
//!
//! Bulk "mania" discounts: when enough qualifying parcels appear in one order,
//! the cheapest of them ships free.

use rusty_money::MoneyError;
use thiserror::Error;

use crate::{categories::CostingCategory, line_items::LineItem};

mod search;

pub use search::best_discounts;

/// Errors specific to discount rules and the discount search.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// A rule must consume at least one item per application.
    #[error("discount rule {0} requires zero items")]
    ZeroRequirement(CostingCategory),

    /// A rule must be tagged with a discount category.
    #[error("discount rule tagged {0}, which is not a discount category")]
    InvalidCategory(CostingCategory),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Which line items a discount rule counts towards its requirement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RuleMatch {
    /// Only items priced in this tier
    Category(CostingCategory),

    /// Any priced parcel
    Any,
}

impl RuleMatch {
    /// Returns true if `item` counts towards the rule.
    pub fn matches(&self, item: &LineItem<'_>) -> bool {
        match self {
            RuleMatch::Category(category) => item.category() == *category,
            RuleMatch::Any => true,
        }
    }
}

/// A bulk discount: every `required` matching items, the cheapest is free.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiscountRule {
    category: CostingCategory,
    matcher: RuleMatch,
    required: usize,
}

impl DiscountRule {
    /// Create a new discount rule.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::InvalidCategory`]: `category` is not a discount category.
    /// - [`DiscountError::ZeroRequirement`]: `required` is zero.
    pub fn new(
        category: CostingCategory,
        matcher: RuleMatch,
        required: usize,
    ) -> Result<Self, DiscountError> {
        if !category.is_discount() {
            return Err(DiscountError::InvalidCategory(category));
        }

        if required == 0 {
            return Err(DiscountError::ZeroRequirement(category));
        }

        Ok(Self {
            category,
            matcher,
            required,
        })
    }

    /// Every fourth small parcel is free.
    pub const fn small_mania() -> Self {
        Self {
            category: CostingCategory::SmallMania,
            matcher: RuleMatch::Category(CostingCategory::Small),
            required: 4,
        }
    }

    /// Every third medium parcel is free.
    pub const fn medium_mania() -> Self {
        Self {
            category: CostingCategory::MediumMania,
            matcher: RuleMatch::Category(CostingCategory::Medium),
            required: 3,
        }
    }

    /// Every fifth parcel of any kind is free.
    pub const fn mixed_mania() -> Self {
        Self {
            category: CostingCategory::MixedMania,
            matcher: RuleMatch::Any,
            required: 5,
        }
    }

    /// The standard rules, in evaluation order.
    pub const fn standard() -> [Self; 3] {
        [Self::small_mania(), Self::medium_mania(), Self::mixed_mania()]
    }

    /// Category of the discount line items this rule emits
    pub fn category(&self) -> CostingCategory {
        self.category
    }

    /// Which items count towards the rule
    pub fn matcher(&self) -> RuleMatch {
        self.matcher
    }

    /// Number of items consumed by one application
    pub fn required(&self) -> usize {
        self.required
    }

    /// Returns true if `item` counts towards the rule.
    pub fn matches(&self, item: &LineItem<'_>) -> bool {
        self.matcher.matches(item)
    }
}
