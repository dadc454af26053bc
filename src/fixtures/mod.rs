//! Fixtures

use std::{fs, path::PathBuf};

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    costing::OrderCalculator,
    discounts::{DiscountError, DiscountRule},
    fixtures::{orders::OrderFixture, tiers::TiersFixture},
    orders::Order,
    parcels::ParcelError,
    tiers::{TierParameters, TierTable, TierTableError},
};

pub mod orders;
pub mod tiers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid measurement format
    #[error("Invalid measurement format: {0}")]
    InvalidMeasurement(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// No tier table loaded
    #[error("No tier table loaded; cannot create calculator")]
    NoTiers,

    /// No order loaded
    #[error("No order loaded")]
    NoOrder,

    /// Parcel rejected its measurements
    #[error(transparent)]
    Parcel(#[from] ParcelError),

    /// Tier table rejected its tiers
    #[error(transparent)]
    TierTable(#[from] TierTableError),

    /// Discount rule rejected its configuration
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded tier table
    tiers: Option<TierTable<'static>>,

    /// Loaded discount rules; the standard rules apply when none were given
    rules: Option<SmallVec<[DiscountRule; 3]>>,

    /// Loaded order
    order: Option<Order>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            tiers: None,
            rules: None,
            order: None,
        }
    }

    /// Load a tier table, and any discount rules, from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the tiers
    /// or rules fail validation.
    pub fn load_tiers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("tiers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: TiersFixture = serde_norway::from_str(&contents)?;

        let tiers = fixture
            .tiers
            .into_iter()
            .map(TierParameters::try_from)
            .collect::<Result<SmallVec<[TierParameters<'static>; 5]>, _>>()?;

        let currency = tiers
            .first()
            .map(|tier| tier.base_cost().currency())
            .ok_or(TierTableError::Empty)?;

        self.tiers = Some(TierTable::new(tiers, currency)?);

        self.rules = fixture
            .discounts
            .map(|rules| rules.into_iter().map(DiscountRule::try_from).collect())
            .transpose()?;

        Ok(self)
    }

    /// Load an order from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a parcel
    /// has an invalid measurement.
    pub fn load_order(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("orders").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OrderFixture = serde_norway::from_str(&contents)?;

        self.order = Some(Order::try_from(fixture)?);

        Ok(self)
    }

    /// Load a tier table and an order from the default fixture directory
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(tiers: &str, order: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_tiers(tiers)?.load_order(order)?;

        Ok(fixture)
    }

    /// Get the loaded tier table
    ///
    /// # Errors
    ///
    /// Returns an error if no tier table has been loaded.
    pub fn tiers(&self) -> Result<&TierTable<'static>, FixtureError> {
        self.tiers.as_ref().ok_or(FixtureError::NoTiers)
    }

    /// Get the discount rules, the standard ones unless the tier fixture listed its own
    pub fn rules(&self) -> SmallVec<[DiscountRule; 3]> {
        self.rules
            .clone()
            .unwrap_or_else(|| SmallVec::from_buf(DiscountRule::standard()))
    }

    /// Get the loaded order
    ///
    /// # Errors
    ///
    /// Returns an error if no order has been loaded.
    pub fn order(&self) -> Result<&Order, FixtureError> {
        self.order.as_ref().ok_or(FixtureError::NoOrder)
    }

    /// Create a calculator from the loaded tier table and rules
    ///
    /// # Errors
    ///
    /// Returns an error if no tier table has been loaded.
    pub fn calculator(&self) -> Result<OrderCalculator<'static>, FixtureError> {
        Ok(OrderCalculator::new(self.tiers()?.clone(), self.rules()))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
