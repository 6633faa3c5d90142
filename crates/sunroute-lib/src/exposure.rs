//! Building-shadow exposure model.
//!
//! A street is modelled as a canyon lined by buildings of a fixed height set
//! back a fixed distance from where a pedestrian walks. For each street
//! orientation the shadow cast by the building face is projected across the
//! street, and the part of a standing person that remains in direct sun is
//! reported as a fraction of body height.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::bearing::{Bearing, BearingTable};
use crate::error::{Error, Result};
use crate::solar::DaylightPosition;

/// Fixed street-canyon geometry, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposureParams {
    pub building_height: f64,
    /// Distance between the building face and the pedestrian.
    pub setback: f64,
    pub person_height: f64,
}

impl Default for ExposureParams {
    fn default() -> Self {
        Self {
            building_height: 6.0,
            setback: 3.0,
            person_height: 1.7,
        }
    }
}

impl ExposureParams {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("building_height", self.building_height),
            ("setback", self.setback),
            ("person_height", self.person_height),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_input(format!(
                    "exposure parameter {name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Fraction of a pedestrian's height in direct sun, per street bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureTable {
    fractions: BearingTable<f64>,
}

impl ExposureTable {
    /// Build a table from externally computed fractions.
    pub fn from_fn(mut f: impl FnMut(Bearing) -> f64) -> Result<Self> {
        let fractions = BearingTable::from_fn(&mut f);
        if let Some((bearing, value)) = fractions
            .iter()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(Error::invalid_input(format!(
                "exposure fraction {value} at {bearing} outside 0..=1"
            )));
        }
        Ok(Self { fractions })
    }

    pub fn get(&self, bearing: Bearing) -> f64 {
        *self.fractions.get(bearing)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bearing, f64)> + '_ {
        self.fractions.iter().map(|(b, v)| (b, *v))
    }
}

/// Planar offset `(x, y)` of the shadow tip from the building base, meters.
/// `x` points east and `y` north; the shadow falls away from the sun.
pub fn shadow_tip(sun: &DaylightPosition, params: &ExposureParams) -> (f64, f64) {
    let length = params.building_height / sun.altitude().tan();
    (
        -length * sun.azimuth().sin(),
        -length * sun.azimuth().cos(),
    )
}

/// Distance from the building face to the shadow edge, measured
/// perpendicular to a street of the given bearing. Negative when the shadow
/// falls behind the building.
pub fn shadow_reach(sun: &DaylightPosition, params: &ExposureParams, bearing: Bearing) -> f64 {
    let (x, y) = shadow_tip(sun, params);
    let length = x.hypot(y);
    let azimuth = if sun.azimuth() > PI {
        sun.azimuth()
    } else {
        sun.azimuth() - PI
    };
    length * ((azimuth - bearing.radians()).abs() - FRAC_PI_2).cos()
}

fn exposed_fraction(reach: f64, params: &ExposureParams) -> f64 {
    if reach <= params.setback {
        return 1.0;
    }
    let covered = params.building_height * (reach - params.setback) / reach;
    if covered < params.person_height {
        (params.person_height - covered) / params.person_height
    } else {
        0.0
    }
}

/// Compute the exposure fraction for every bearing bucket.
///
/// Only defined while the sun is up, which the [`DaylightPosition`] argument
/// guarantees.
pub fn exposure_table(sun: &DaylightPosition, params: &ExposureParams) -> ExposureTable {
    let fractions = BearingTable::from_fn(|bearing| {
        exposed_fraction(shadow_reach(sun, params, bearing), params).clamp(0.0, 1.0)
    });
    ExposureTable { fractions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::SolarPosition;

    fn sun(altitude_deg: f64, azimuth_deg: f64) -> DaylightPosition {
        SolarPosition {
            altitude: altitude_deg.to_radians(),
            azimuth: azimuth_deg.to_radians(),
        }
        .daylight()
        .expect("sun above horizon")
    }

    fn bearing(deg: u16) -> Bearing {
        Bearing::new(deg).unwrap()
    }

    #[test]
    fn street_parallel_to_sun_is_fully_lit() {
        let table = exposure_table(&sun(30.0, 180.0), &ExposureParams::default());
        assert!((table.get(bearing(0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn low_sun_across_street_leaves_pedestrian_in_shade() {
        let table = exposure_table(&sun(30.0, 180.0), &ExposureParams::default());
        assert_eq!(table.get(bearing(90)), 0.0);
    }

    #[test]
    fn high_sun_across_street_partially_lights_pedestrian() {
        // L = 6 / tan 60° = 3.464; covered = 6 (L - 3) / L = 0.8038
        let table = exposure_table(&sun(60.0, 180.0), &ExposureParams::default());
        let expected = (1.7 - 6.0 * (3.0f64.sqrt() * 2.0 - 3.0) / (3.0f64.sqrt() * 2.0)) / 1.7;
        assert!((table.get(bearing(90)) - expected).abs() < 1e-9);
    }

    #[test]
    fn shadow_shorter_than_setback_never_reaches_pedestrian() {
        let table = exposure_table(&sun(70.0, 180.0), &ExposureParams::default());
        assert!(table.iter().all(|(_, v)| v == 1.0));
    }

    #[test]
    fn shadow_tip_points_away_from_sun() {
        let (x, y) = shadow_tip(&sun(45.0, 180.0), &ExposureParams::default());
        assert!(x.abs() < 1e-9);
        assert!((y - 6.0).abs() < 1e-9);
    }

    #[test]
    fn external_tables_are_range_checked() {
        assert!(ExposureTable::from_fn(|_| 1.5).is_err());
        assert!(ExposureTable::from_fn(|_| 0.5).is_ok());
    }

    #[test]
    fn zero_heights_are_rejected() {
        let params = ExposureParams {
            person_height: 0.0,
            ..ExposureParams::default()
        };
        assert!(params.validate().is_err());
    }
}
