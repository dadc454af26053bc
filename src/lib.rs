//! Parcel Costs
//!
//! Prices orders of parcels: each parcel is assigned its cheapest size/weight
//! tier, the combination of bulk discounts that saves the most is applied
//! across the order, and expedited handling doubles what is left.

pub mod categories;
pub mod costing;
pub mod discounts;
pub mod fixtures;
pub mod line_items;
pub mod orders;
pub mod parcels;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod tiers;
