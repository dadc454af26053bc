//! Order Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, tiers::parse_measurement},
    orders::Order,
    parcels::Parcel,
};

/// Order in YAML
#[derive(Debug, Deserialize)]
pub struct OrderFixture {
    /// Parcels in the order, if any
    #[serde(default)]
    pub parcels: Option<Vec<ParcelFixture>>,

    /// Whether expedited handling is requested
    #[serde(default)]
    pub expedite: bool,
}

/// Parcel Fixture
///
/// Measurements are quoted decimal strings (e.g. "24.5").
#[derive(Debug, Deserialize)]
pub struct ParcelFixture {
    /// Height
    pub height: String,

    /// Width
    pub width: String,

    /// Depth
    pub depth: String,

    /// Weight in kg
    pub weight: String,
}

impl TryFrom<ParcelFixture> for Parcel {
    type Error = FixtureError;

    fn try_from(fixture: ParcelFixture) -> Result<Self, Self::Error> {
        Ok(Parcel::new(
            parse_measurement(&fixture.height)?,
            parse_measurement(&fixture.width)?,
            parse_measurement(&fixture.depth)?,
            parse_measurement(&fixture.weight)?,
        )?)
    }
}

impl TryFrom<OrderFixture> for Order {
    type Error = FixtureError;

    fn try_from(fixture: OrderFixture) -> Result<Self, Self::Error> {
        let parcels = fixture
            .parcels
            .map(|parcels| {
                parcels
                    .into_iter()
                    .map(Parcel::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(Order::new(parcels, fixture.expedite))
    }
}
