//! Orders

use crate::parcels::Parcel;

/// An order of parcels to be costed.
///
/// The parcel collection may be absent, which is treated the same as an
/// empty collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Order {
    parcels: Option<Vec<Parcel>>,
    expedite: bool,
}

impl Order {
    /// Create a new order with an optional parcel collection.
    pub fn new(parcels: Option<Vec<Parcel>>, expedite: bool) -> Self {
        Order { parcels, expedite }
    }

    /// Create a standard-speed order with the given parcels.
    pub fn with_parcels(parcels: impl Into<Vec<Parcel>>) -> Self {
        Order {
            parcels: Some(parcels.into()),
            expedite: false,
        }
    }

    /// Request expedited handling for this order.
    #[must_use]
    pub fn expedited(mut self) -> Self {
        self.expedite = true;
        self
    }

    /// Get the parcels in the order; empty if the collection is absent.
    pub fn parcels(&self) -> &[Parcel] {
        self.parcels.as_deref().unwrap_or_default()
    }

    /// Get a parcel by its position in the order.
    pub fn get_parcel(&self, parcel_idx: usize) -> Option<&Parcel> {
        self.parcels().get(parcel_idx)
    }

    /// Get the number of parcels in the order.
    pub fn len(&self) -> usize {
        self.parcels().len()
    }

    /// Check if the order has no parcels.
    pub fn is_empty(&self) -> bool {
        self.parcels().is_empty()
    }

    /// Check if expedited handling was requested.
    pub fn is_expedited(&self) -> bool {
        self.expedite
    }
}
