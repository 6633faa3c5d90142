use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic position in degrees.
///
/// The model itself works with signed latitude and longitude. Input
/// boundaries that only accept part of the globe apply a [`CoordinatePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting values outside the globe.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::invalid_input(format!(
                "latitude {lat} outside -90..=90"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::invalid_input(format!(
                "longitude {lon} outside -180..=180"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Position on the unit sphere (x towards 0°E, z towards the north pole).
    pub fn unit_vector(&self) -> [f64; 3] {
        let (lat, lon) = (self.lat.to_radians(), self.lon.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_m(&self, other: &GeoCoordinate) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

/// Range accepted at an input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatePolicy {
    /// Any coordinate on the globe.
    #[default]
    Global,
    /// Latitude in `0..=90` and longitude in `0..=180`.
    NorthEastQuadrant,
}

impl CoordinatePolicy {
    /// Validate a raw `(lat, lon)` pair and build a coordinate from it.
    pub fn coordinate(self, lat: f64, lon: f64) -> Result<GeoCoordinate> {
        let coordinate = GeoCoordinate::new(lat, lon)?;
        match self {
            CoordinatePolicy::Global => Ok(coordinate),
            CoordinatePolicy::NorthEastQuadrant => {
                if lat < 0.0 || lon < 0.0 {
                    Err(Error::invalid_input(format!(
                        "coordinate ({lat}, {lon}) outside the accepted range lat 0..=90, lon 0..=180"
                    )))
                } else {
                    Ok(coordinate)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_policy_rejects_southern_latitudes() {
        assert!(CoordinatePolicy::NorthEastQuadrant
            .coordinate(-33.9, 151.2)
            .is_err());
        assert!(CoordinatePolicy::Global.coordinate(-33.9, 151.2).is_ok());
    }

    #[test]
    fn rejects_off_globe_values() {
        assert!(GeoCoordinate::new(91.0, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, 181.0).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoCoordinate::new(33.0, 130.0).unwrap();
        let b = GeoCoordinate::new(34.0, 130.0).unwrap();
        let distance = a.distance_m(&b);
        assert!((distance - 111_195.0).abs() < 100.0, "{distance}");
    }
}
