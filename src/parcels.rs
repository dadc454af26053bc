//! Parcels

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors related to parcel construction.
#[derive(Debug, Error, PartialEq)]
pub enum ParcelError {
    /// A measurement was negative.
    #[error("invalid parcel measurement: {measurement} is {value}")]
    InvalidMeasurement {
        /// Name of the offending measurement
        measurement: &'static str,

        /// Value that was rejected
        value: Decimal,
    },
}

/// A parcel to be shipped, with its outer dimensions and weight in kilograms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Parcel {
    height: Decimal,
    width: Decimal,
    depth: Decimal,
    weight: Decimal,
}

impl Parcel {
    /// Create a new parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError::InvalidMeasurement`] if any measurement is negative.
    pub fn new(
        height: Decimal,
        width: Decimal,
        depth: Decimal,
        weight: Decimal,
    ) -> Result<Self, ParcelError> {
        [
            ("height", height),
            ("width", width),
            ("depth", depth),
            ("weight", weight),
        ]
        .into_iter()
        .try_for_each(|(measurement, value)| {
            if value.is_sign_negative() && !value.is_zero() {
                Err(ParcelError::InvalidMeasurement { measurement, value })
            } else {
                Ok(())
            }
        })?;

        Ok(Self {
            height,
            width,
            depth,
            weight,
        })
    }

    /// Create a cube-shaped parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelError::InvalidMeasurement`] if any measurement is negative.
    pub fn cube(side: Decimal, weight: Decimal) -> Result<Self, ParcelError> {
        Self::new(side, side, side, weight)
    }

    /// Parcel height
    pub fn height(&self) -> Decimal {
        self.height
    }

    /// Parcel width
    pub fn width(&self) -> Decimal {
        self.width
    }

    /// Parcel depth
    pub fn depth(&self) -> Decimal {
        self.depth
    }

    /// Parcel weight in kilograms
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Returns true if every dimension is strictly less than `limit`.
    pub fn fits_within(&self, limit: Decimal) -> bool {
        self.height < limit && self.width < limit && self.depth < limit
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_keeps_measurements() -> TestResult {
        let parcel = Parcel::new(
            Decimal::from(1),
            Decimal::from(2),
            Decimal::from(3),
            Decimal::new(45, 1),
        )?;

        assert_eq!(parcel.height(), Decimal::from(1));
        assert_eq!(parcel.width(), Decimal::from(2));
        assert_eq!(parcel.depth(), Decimal::from(3));
        assert_eq!(parcel.weight(), Decimal::new(45, 1));

        Ok(())
    }

    #[test]
    fn zero_measurements_are_valid() -> TestResult {
        let parcel = Parcel::cube(Decimal::ZERO, Decimal::ZERO)?;

        assert_eq!(parcel.weight(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn negative_measurement_is_rejected() {
        let result = Parcel::new(
            Decimal::from(1),
            Decimal::from(-2),
            Decimal::from(3),
            Decimal::ZERO,
        );

        assert_eq!(
            result,
            Err(ParcelError::InvalidMeasurement {
                measurement: "width",
                value: Decimal::from(-2),
            })
        );
    }

    #[test]
    fn negative_weight_is_rejected() {
        let result = Parcel::cube(Decimal::from(5), Decimal::new(-1, 1));

        assert!(matches!(
            result,
            Err(ParcelError::InvalidMeasurement {
                measurement: "weight",
                ..
            })
        ));
    }

    #[test]
    fn fits_within_is_strict() -> TestResult {
        let parcel = Parcel::new(
            Decimal::new(999, 2),
            Decimal::from(5),
            Decimal::from(10),
            Decimal::ZERO,
        )?;

        assert!(!parcel.fits_within(Decimal::from(10)));
        assert!(parcel.fits_within(Decimal::new(1001, 2)));

        Ok(())
    }
}
