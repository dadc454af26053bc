//! Costing Categories

use std::fmt;

use serde::Deserialize;

/// Tag carried by every line item in an order costing.
///
/// The first five variants are size/weight tiers a parcel can be priced at,
/// the three mania variants tag bulk discounts and the last one tags the
/// expedite surcharge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostingCategory {
    /// Small parcel tier
    Small,

    /// Medium parcel tier
    Medium,

    /// Large parcel tier
    Large,

    /// Extra-large parcel tier
    ExtraLarge,

    /// Flat-rate heavy parcel tier
    Heavy,

    /// Every fourth small parcel free
    SmallMania,

    /// Every third medium parcel free
    MediumMania,

    /// Every fifth parcel of any kind free
    MixedMania,

    /// Expedited handling surcharge
    ExpediteSurcharge,
}

impl CostingCategory {
    /// Returns true if a parcel can be priced in this category.
    pub const fn is_tier(self) -> bool {
        matches!(
            self,
            Self::Small | Self::Medium | Self::Large | Self::ExtraLarge | Self::Heavy
        )
    }

    /// Returns true if this category tags a bulk discount.
    pub const fn is_discount(self) -> bool {
        matches!(self, Self::SmallMania | Self::MediumMania | Self::MixedMania)
    }

    /// Kebab-case name of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
            Self::Heavy => "heavy",
            Self::SmallMania => "small-mania",
            Self::MediumMania => "medium-mania",
            Self::MixedMania => "mixed-mania",
            Self::ExpediteSurcharge => "expedite-surcharge",
        }
    }
}

impl fmt::Display for CostingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn tier_and_discount_sets_are_disjoint() {
        let all = [
            CostingCategory::Small,
            CostingCategory::Medium,
            CostingCategory::Large,
            CostingCategory::ExtraLarge,
            CostingCategory::Heavy,
            CostingCategory::SmallMania,
            CostingCategory::MediumMania,
            CostingCategory::MixedMania,
            CostingCategory::ExpediteSurcharge,
        ];

        for category in all {
            assert!(
                !(category.is_tier() && category.is_discount()),
                "{category} is both a tier and a discount"
            );
        }

        assert!(!CostingCategory::ExpediteSurcharge.is_tier());
        assert!(!CostingCategory::ExpediteSurcharge.is_discount());
    }

    #[test]
    fn display_uses_kebab_case() {
        assert_eq!(CostingCategory::ExtraLarge.to_string(), "extra-large");
        assert_eq!(CostingCategory::MixedMania.to_string(), "mixed-mania");
    }

    #[test]
    fn deserializes_from_kebab_case() -> TestResult {
        let category: CostingCategory = serde_norway::from_str("extra-large")?;

        assert_eq!(category, CostingCategory::ExtraLarge);

        Ok(())
    }
}
