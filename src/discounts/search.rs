//! Discount Search
//!
//! Finds the combination of discount rule applications that minimises the
//! cost of an order.
//!
//! Each level of the search tries every applicable rule against the items
//! still unclaimed. Applying a rule claims the `required` cheapest matching
//! items, which leaves the costlier ones for later applications where they can
//! be the cheapest item of a better-paying bundle. Rules overlap (mixed-mania
//! matches everything the other rules match), so every rule gets its own
//! branch at every level.
//!
//! Results are cached by the set of unclaimed items for the lifetime of a
//! single search, so each distinct sub-problem is solved once.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    discounts::{DiscountError, DiscountRule},
    line_items::LineItem,
};

type ItemIndexList = SmallVec<[usize; 16]>;
type DiscountItems<'a> = SmallVec<[LineItem<'a>; 4]>;

/// Finds the discount line items that minimise the total cost of `items`.
///
/// Only parcel-backed items take part; existing discount or surcharge items are
/// ignored. Each discount is worth the cost of the cheapest item it claims.
/// When two combinations save the same amount, the one reached by trying rules
/// in the order given wins.
///
/// # Errors
///
/// Returns a [`DiscountError::Money`] if the items are not all in `currency`.
pub fn best_discounts<'a>(
    rules: &[DiscountRule],
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<DiscountItems<'a>, DiscountError> {
    let remaining: ItemIndexList = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_parcel())
        .map(|(idx, _)| idx)
        .collect();

    let mut search = DiscountSearch {
        rules,
        items,
        currency,
        solved: FxHashMap::default(),
    };

    let best = search.solve(&remaining)?;

    debug!(
        items = remaining.len(),
        discounts = best.discounts.len(),
        savings = %best.total,
        sub_problems = search.solved.len(),
        "discount search complete"
    );

    Ok(best.discounts)
}

/// Best discounts for one set of unclaimed items.
#[derive(Clone, Debug)]
struct Branch<'a> {
    discounts: DiscountItems<'a>,
    total: Money<'a, Currency>,
}

impl<'a> Branch<'a> {
    fn empty(currency: &'a Currency) -> Self {
        Branch {
            discounts: SmallVec::new(),
            total: Money::from_minor(0, currency),
        }
    }
}

/// A discount and the items left unclaimed after it.
struct Application<'a> {
    discount: LineItem<'a>,
    remaining: ItemIndexList,
}

struct DiscountSearch<'s, 'a> {
    rules: &'s [DiscountRule],
    items: &'s [LineItem<'a>],
    currency: &'a Currency,
    solved: FxHashMap<ItemIndexList, Branch<'a>>,
}

impl<'a> DiscountSearch<'_, 'a> {
    fn solve(&mut self, remaining: &ItemIndexList) -> Result<Branch<'a>, DiscountError> {
        if let Some(branch) = self.solved.get(remaining) {
            return Ok(branch.clone());
        }

        let mut best: Option<Branch<'a>> = None;

        for rule in self.rules {
            let Some(application) = self.apply(rule, remaining)? else {
                continue;
            };

            let rest = self.solve(&application.remaining)?;
            let total = rest.total.add(*application.discount.cost())?;

            trace!(
                rule = %rule.category(),
                unclaimed = remaining.len(),
                %total,
                "candidate branch"
            );

            if best
                .as_ref()
                .is_none_or(|best| total.to_minor_units() < best.total.to_minor_units())
            {
                let mut discounts = DiscountItems::with_capacity(rest.discounts.len() + 1);

                discounts.push(application.discount);
                discounts.extend(rest.discounts);

                best = Some(Branch { discounts, total });
            }
        }

        let best = best.unwrap_or_else(|| Branch::empty(self.currency));

        self.solved.insert(remaining.clone(), best.clone());

        Ok(best)
    }

    /// Claims the cheapest `required` items matching `rule`, if there are enough.
    fn apply(
        &self,
        rule: &DiscountRule,
        remaining: &ItemIndexList,
    ) -> Result<Option<Application<'a>>, DiscountError> {
        let mut matching: SmallVec<[(i64, usize); 16]> = remaining
            .iter()
            .filter_map(|&idx| {
                self.items
                    .get(idx)
                    .filter(|item| rule.matches(item))
                    .map(|item| (item.cost().to_minor_units(), idx))
            })
            .collect();

        if matching.len() < rule.required() {
            return Ok(None);
        }

        // Stable, so equally priced items are claimed in order position.
        matching.sort_by_key(|&(cost, _)| cost);
        matching.truncate(rule.required());

        let Some(cheapest) = matching
            .first()
            .and_then(|&(_, idx)| self.items.get(idx))
        else {
            return Ok(None);
        };

        let amount = Money::from_minor(0, self.currency).sub(*cheapest.cost())?;

        let remaining = remaining
            .iter()
            .copied()
            .filter(|idx| !matching.iter().any(|&(_, claimed)| claimed == *idx))
            .collect();

        Ok(Some(Application {
            discount: LineItem::discount(rule.category(), amount),
            remaining,
        }))
    }
}
