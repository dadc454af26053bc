//! Tier Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    categories::CostingCategory,
    discounts::{DiscountRule, RuleMatch},
    fixtures::FixtureError,
    tiers::TierParameters,
};

/// Tier table and optional discount rules in YAML
#[derive(Debug, Deserialize)]
pub struct TiersFixture {
    /// Tiers, in table order
    pub tiers: Vec<TierFixture>,

    /// Discount rules, in evaluation order; the standard rules when absent
    #[serde(default)]
    pub discounts: Option<Vec<RuleFixture>>,
}

/// Tier Fixture
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Tier category (e.g. `small`)
    pub category: CostingCategory,

    /// Base cost (e.g. "3.00 USD")
    pub base_cost: String,

    /// Included weight allowance in kg (e.g. "1")
    pub max_weight: String,

    /// Cost per started kg over the allowance (e.g. "2.00 USD")
    pub cost_per_extra_kg: String,

    /// Exclusive dimension limit; unbounded when absent
    #[serde(default)]
    pub max_dimension: Option<String>,
}

impl TryFrom<TierFixture> for TierParameters<'static> {
    type Error = FixtureError;

    fn try_from(fixture: TierFixture) -> Result<Self, Self::Error> {
        let (base_minor, base_currency) = parse_price(&fixture.base_cost)?;
        let (rate_minor, rate_currency) = parse_price(&fixture.cost_per_extra_kg)?;

        let tier = TierParameters::new(
            fixture.category,
            Money::from_minor(base_minor, base_currency),
            parse_measurement(&fixture.max_weight)?,
            Money::from_minor(rate_minor, rate_currency),
        );

        match fixture.max_dimension {
            Some(limit) => Ok(tier.with_max_dimension(parse_measurement(&limit)?)),
            None => Ok(tier),
        }
    }
}

/// Discount rule fixture
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// Category of the emitted discount (e.g. `small-mania`)
    pub category: CostingCategory,

    /// Tier the rule counts; any parcel when absent
    #[serde(default)]
    pub tier: Option<CostingCategory>,

    /// Items consumed per application
    pub required: usize,
}

impl TryFrom<RuleFixture> for DiscountRule {
    type Error = FixtureError;

    fn try_from(fixture: RuleFixture) -> Result<Self, Self::Error> {
        let matcher = fixture.tier.map_or(RuleMatch::Any, RuleMatch::Category);

        Ok(DiscountRule::new(fixture.category, matcher, fixture.required)?)
    }
}

/// Parse price string (e.g., "3.00 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a whole number of minor units, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .ok()
        .and_then(|amount| amount.checked_mul(Decimal::ONE_HUNDRED))
        .filter(|scaled| scaled.fract().is_zero())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse a measurement string (e.g. "2.5") as an exact decimal.
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_measurement(s: &str) -> Result<Decimal, FixtureError> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidMeasurement(s.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::discounts::DiscountError;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("3.00USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_trailing_parts() {
        let result = parse_price("3.00 USD extra");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_fractional_minor_units() {
        let result = parse_price("2.995 USD");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("3.00 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_known_currencies() -> TestResult {
        let (usd_minor, usd) = parse_price("3.00 USD")?;
        let (gbp_minor, gbp) = parse_price("2.5 GBP")?;

        assert_eq!(usd_minor, 300);
        assert_eq!(usd, USD);
        assert_eq!(gbp_minor, 250);
        assert_eq!(gbp, GBP);

        Ok(())
    }

    #[test]
    fn parse_measurement_is_exact() -> TestResult {
        assert_eq!(parse_measurement("24.5")?, Decimal::new(245, 1));
        assert!(matches!(
            parse_measurement("heavy"),
            Err(FixtureError::InvalidMeasurement(_))
        ));

        Ok(())
    }

    #[test]
    fn tier_fixture_converts_to_parameters() -> TestResult {
        let fixture: TierFixture = serde_norway::from_str(
            "category: extra-large\nbase_cost: \"25.00 USD\"\nmax_weight: \"10\"\ncost_per_extra_kg: \"2.00 USD\"\n",
        )?;

        let tier = TierParameters::try_from(fixture)?;

        assert_eq!(tier.category(), CostingCategory::ExtraLarge);
        assert_eq!(tier.base_cost(), &Money::from_minor(2500, USD));
        assert_eq!(tier.max_weight(), Decimal::TEN);
        assert_eq!(tier.max_dimension(), None);

        Ok(())
    }

    #[test]
    fn rule_fixture_without_tier_matches_any_parcel() -> TestResult {
        let fixture: RuleFixture =
            serde_norway::from_str("category: mixed-mania\nrequired: 5\n")?;

        assert_eq!(DiscountRule::try_from(fixture)?, DiscountRule::mixed_mania());

        Ok(())
    }

    #[test]
    fn rule_fixture_is_validated() -> TestResult {
        let fixture: RuleFixture =
            serde_norway::from_str("category: small-mania\ntier: small\nrequired: 0\n")?;

        assert!(matches!(
            DiscountRule::try_from(fixture),
            Err(FixtureError::Discount(DiscountError::ZeroRequirement(
                CostingCategory::SmallMania
            )))
        ));

        Ok(())
    }
}
