//! Direct solar radiation reaching a pedestrian.
//!
//! Normal-incidence direct insolation follows Bouguer's formula with a
//! monthly atmospheric transmittance. It is then projected onto the vertical
//! plane of whichever side of the body (front or back) faces the sun while
//! walking a street of a given bearing.

use std::f64::consts::{FRAC_PI_2, PI};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::bearing::{Bearing, BearingTable};
use crate::error::{Error, Result};
use crate::solar::SolarPosition;

/// Solar constant in W/m².
pub const SOLAR_CONSTANT: f64 = 1370.0;

/// Monthly atmospheric transmittance, January first (Fukuoka).
pub const FUKUOKA_TRANSMITTANCE: [f64; 12] = [
    0.72, 0.69, 0.64, 0.61, 0.60, 0.59, 0.60, 0.61, 0.64, 0.67, 0.69, 0.71,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsolationParams {
    pub solar_constant: f64,
    pub monthly_transmittance: [f64; 12],
}

impl Default for InsolationParams {
    fn default() -> Self {
        Self {
            solar_constant: SOLAR_CONSTANT,
            monthly_transmittance: FUKUOKA_TRANSMITTANCE,
        }
    }
}

impl InsolationParams {
    pub fn validate(&self) -> Result<()> {
        if !self.solar_constant.is_finite() || self.solar_constant <= 0.0 {
            return Err(Error::invalid_input(format!(
                "solar constant must be positive, got {}",
                self.solar_constant
            )));
        }
        if let Some(p) = self
            .monthly_transmittance
            .iter()
            .find(|p| !(**p > 0.0 && **p <= 1.0))
        {
            return Err(Error::invalid_input(format!(
                "atmospheric transmittance {p} outside (0, 1]"
            )));
        }
        Ok(())
    }

    pub fn transmittance(&self, date: NaiveDate) -> f64 {
        self.monthly_transmittance[date.month0() as usize]
    }
}

/// Direct insolation on a vertical surface, W/m², per street bearing.
///
/// Values can be zero or negative; see
/// [`ColdnessPolicy`](crate::coldness::ColdnessPolicy) for how edge weighting
/// deals with them.
#[derive(Debug, Clone, PartialEq)]
pub struct InsolationTable {
    intensities: BearingTable<f64>,
}

impl InsolationTable {
    /// Build a table from externally computed intensities.
    pub fn from_fn(f: impl FnMut(Bearing) -> f64) -> Self {
        Self {
            intensities: BearingTable::from_fn(f),
        }
    }

    pub fn get(&self, bearing: Bearing) -> f64 {
        *self.intensities.get(bearing)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Bearing, f64)> + '_ {
        self.intensities.iter().map(|(b, v)| (b, *v))
    }
}

/// Normal-incidence direct insolation `Jd = I₀ · P^(1 / sin h)`.
///
/// Zero whenever the sun is not above the horizon.
pub fn normal_direct_insolation(
    date: NaiveDate,
    sun: &SolarPosition,
    params: &InsolationParams,
) -> f64 {
    if sun.altitude <= 0.0 {
        return 0.0;
    }
    let cosec_h = 1.0 / sun.altitude.sin();
    params.solar_constant * params.transmittance(date).powf(cosec_h)
}

/// Azimuth of the body surface facing the sun on a street of this bearing.
///
/// When the sun is behind the walker (angular gap strictly between 90° and
/// 270°) the exposed side is the back, i.e. the reversed bearing.
pub fn exposed_surface_azimuth(sun: &SolarPosition, bearing: Bearing) -> f64 {
    let street = bearing.radians();
    let gap = (sun.azimuth - street).abs();
    if FRAC_PI_2 < gap && gap < 3.0 * FRAC_PI_2 {
        street + PI
    } else {
        street
    }
}

/// Vertical-plane insolation `Jv = Jd · cos h · cos(A − surface)`.
pub fn vertical_direct_insolation(sun: &SolarPosition, normal: f64, bearing: Bearing) -> f64 {
    let surface = exposed_surface_azimuth(sun, bearing);
    normal * sun.altitude.cos() * (sun.azimuth - surface).cos()
}

/// Compute the vertical-plane insolation for every bearing bucket.
pub fn insolation_table(
    date: NaiveDate,
    sun: &SolarPosition,
    params: &InsolationParams,
) -> InsolationTable {
    let normal = normal_direct_insolation(date, sun, params);
    InsolationTable::from_fn(|bearing| vertical_direct_insolation(sun, normal, bearing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn december() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 21).unwrap()
    }

    fn sun(altitude_deg: f64, azimuth_deg: f64) -> SolarPosition {
        SolarPosition {
            altitude: altitude_deg.to_radians(),
            azimuth: azimuth_deg.to_radians(),
        }
    }

    #[test]
    fn normal_insolation_follows_bouguer() {
        // sin 30° = 0.5, so Jd = 1370 · 0.71²
        let jd = normal_direct_insolation(december(), &sun(30.0, 180.0), &InsolationParams::default());
        assert!((jd - 1370.0 * 0.71 * 0.71).abs() < 1e-6, "{jd}");
    }

    #[test]
    fn night_has_no_direct_insolation() {
        let params = InsolationParams::default();
        assert_eq!(normal_direct_insolation(december(), &sun(-5.0, 0.0), &params), 0.0);
        assert_eq!(normal_direct_insolation(december(), &sun(0.0, 90.0), &params), 0.0);
        let table = insolation_table(december(), &sun(-5.0, 0.0), &params);
        assert!(table.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn back_faces_sun_when_walking_away_from_it() {
        let north_south = Bearing::new(0).unwrap();
        let surface = exposed_surface_azimuth(&sun(30.0, 180.0), north_south);
        assert!((surface - PI).abs() < 1e-12);
    }

    #[test]
    fn street_towards_sun_gets_full_vertical_component() {
        let params = InsolationParams::default();
        let s = sun(30.0, 180.0);
        let table = insolation_table(december(), &s, &params);
        let expected = 1370.0 * 0.71 * 0.71 * 30f64.to_radians().cos();
        assert!((table.get(Bearing::new(0).unwrap()) - expected).abs() < 1e-6);
    }

    #[test]
    fn street_perpendicular_to_sun_receives_almost_nothing() {
        let table = insolation_table(december(), &sun(30.0, 180.0), &InsolationParams::default());
        assert!(table.get(Bearing::new(90).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn transmittance_is_range_checked() {
        let mut params = InsolationParams::default();
        params.monthly_transmittance[3] = 1.2;
        assert!(params.validate().is_err());
    }
}
