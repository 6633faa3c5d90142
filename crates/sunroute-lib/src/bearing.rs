//! Discretized street orientation.
//!
//! Streets are undirected axes, so a bearing only needs to cover `[0°, 180°)`.
//! The domain is split into 180 one-degree buckets and every per-orientation
//! table in the crate is keyed by [`Bearing`] rather than by a raw angle, which
//! keeps lookups independent of floating-point rounding.

use std::f64::consts::PI;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of one-degree buckets in the bearing domain.
pub const BEARING_BUCKETS: usize = 180;

/// One-degree bucket of a street orientation, `0..180`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct Bearing(u8);

impl Bearing {
    /// Construct a bearing from a whole-degree value in `0..180`.
    pub fn new(degrees: u16) -> Result<Self> {
        if (degrees as usize) < BEARING_BUCKETS {
            Ok(Self(degrees as u8))
        } else {
            Err(Error::invalid_input(format!(
                "bearing {degrees} outside 0..{BEARING_BUCKETS}"
            )))
        }
    }

    /// Reduce an arbitrary compass angle (degrees) to its bucket.
    ///
    /// The angle is rounded to the nearest degree and folded modulo 180, so
    /// `270.4°` and `90.0°` land in the same bucket.
    pub fn from_degrees(degrees: f64) -> Result<Self> {
        if !degrees.is_finite() {
            return Err(Error::invalid_input(format!(
                "bearing {degrees} is not a finite angle"
            )));
        }
        let folded = (degrees.round() as i64).rem_euclid(BEARING_BUCKETS as i64);
        Ok(Self(folded as u8))
    }

    /// Iterate every bucket in ascending order.
    pub fn all() -> impl Iterator<Item = Bearing> + Clone {
        (0..BEARING_BUCKETS as u8).map(Bearing)
    }

    pub fn degrees(self) -> u16 {
        u16::from(self.0)
    }

    /// Orientation in radians, measured clockwise from north.
    pub fn radians(self) -> f64 {
        PI / 180.0 * f64::from(self.0)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl TryFrom<u16> for Bearing {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Bearing::new(value)
    }
}

impl From<Bearing> for u16 {
    fn from(value: Bearing) -> Self {
        value.degrees()
    }
}

/// Dense table holding one value per bearing bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BearingTable<T> {
    values: Vec<T>,
}

impl<T> BearingTable<T> {
    /// Build a table by evaluating `f` once per bucket.
    pub fn from_fn(f: impl FnMut(Bearing) -> T) -> Self {
        Self {
            values: Bearing::all().map(f).collect(),
        }
    }

    pub fn get(&self, bearing: Bearing) -> &T {
        &self.values[bearing.index()]
    }

    /// Iterate `(bearing, value)` pairs in ascending bearing order.
    pub fn iter(&self) -> impl Iterator<Item = (Bearing, &T)> {
        Bearing::all().zip(self.values.iter())
    }
}

impl<T> Index<Bearing> for BearingTable<T> {
    type Output = T;

    fn index(&self, bearing: Bearing) -> &T {
        self.get(bearing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_angles_modulo_half_turn() {
        assert_eq!(Bearing::from_degrees(270.4).unwrap(), Bearing::new(90).unwrap());
        assert_eq!(Bearing::from_degrees(-1.0).unwrap(), Bearing::new(179).unwrap());
        assert_eq!(Bearing::from_degrees(179.6).unwrap(), Bearing::new(0).unwrap());
    }

    #[test]
    fn rejects_out_of_domain_values() {
        assert!(Bearing::new(180).is_err());
        assert!(Bearing::from_degrees(f64::NAN).is_err());
    }

    #[test]
    fn table_has_one_entry_per_bucket() {
        let table = BearingTable::from_fn(|b| b.degrees() * 2);
        assert_eq!(table.iter().count(), BEARING_BUCKETS);
        assert_eq!(table[Bearing::new(45).unwrap()], 90);
    }
}
