//! Solar position model.
//!
//! Computes the sun's altitude and azimuth for a local civil date and time at
//! a geographic coordinate, using a truncated Fourier approximation for the
//! solar declination and the equation of time. Local time is referenced to
//! the 135°E meridian (JST), matching the monthly transmittance data used by
//! [`crate::insolation`].

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::GeoCoordinate;

/// Empirical coefficients of the position approximation.
pub mod constants {
    /// Longitude (degrees east) of the standard-time meridian.
    pub const STANDARD_MERIDIAN_DEG: f64 = 135.0;

    /// Declination (degrees): constant term followed by the `cos kθ` and
    /// `sin kθ` coefficients for `k = 1..=3`.
    pub const DECLINATION_BIAS: f64 = 0.33281;
    pub const DECLINATION_COS: [f64; 3] = [-22.984, -0.34990, -0.13980];
    pub const DECLINATION_SIN: [f64; 3] = [3.7872, 0.03250, 0.07187];

    /// Equation of time (hours): `cos kθ` and `sin kθ` coefficients.
    pub const EQUATION_OF_TIME_COS: [f64; 3] = [0.0072, -0.0528, -0.0012];
    pub const EQUATION_OF_TIME_SIN: [f64; 3] = [-0.1229, -0.1565, -0.0041];

    /// Below this `cos h` the azimuth is treated as undefined.
    pub const ZENITH_EPSILON: f64 = 1e-12;
}

use constants::*;

/// Sun position as seen from a point on the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    /// Angle above the horizon in radians, `(-π/2, π/2]`.
    pub altitude: f64,
    /// Compass direction in radians, `[0, 2π)`, clockwise from north.
    pub azimuth: f64,
}

impl SolarPosition {
    /// Return the position only if the sun is strictly above the horizon.
    pub fn daylight(self) -> Option<DaylightPosition> {
        (self.altitude > 0.0).then_some(DaylightPosition(self))
    }

    pub fn altitude_deg(&self) -> f64 {
        self.altitude.to_degrees()
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth.to_degrees()
    }
}

/// A [`SolarPosition`] known to have `altitude > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DaylightPosition(SolarPosition);

impl DaylightPosition {
    pub fn position(&self) -> SolarPosition {
        self.0
    }

    pub fn altitude(&self) -> f64 {
        self.0.altitude
    }

    pub fn azimuth(&self) -> f64 {
        self.0.azimuth
    }
}

/// Parse the `YYYY-MM-DD` / `HH:MM` pair accepted at the input boundary.
pub fn parse_local_date_time(date: &str, time: &str) -> Result<(NaiveDate, NaiveTime)> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|err| Error::invalid_input(format!("date '{date}' is not YYYY-MM-DD: {err}")))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|err| Error::invalid_input(format!("time '{time}' is not HH:MM: {err}")))?;
    Ok((date, time))
}

/// Angular parameter of the year, `θ = 2π (d + 0.5) / 365`, with `d` the
/// number of days since 1 January.
fn year_angle(date: NaiveDate) -> f64 {
    let days = f64::from(date.ordinal0());
    TAU * (days + 0.5) / 365.0
}

fn harmonic_series(theta: f64, cos: &[f64; 3], sin: &[f64; 3]) -> f64 {
    (1..=3)
        .zip(cos.iter().zip(sin.iter()))
        .map(|(k, (c, s))| {
            let angle = theta * f64::from(k);
            c * angle.cos() + s * angle.sin()
        })
        .sum()
}

/// Solar declination in degrees.
pub fn declination_deg(date: NaiveDate) -> f64 {
    DECLINATION_BIAS + harmonic_series(year_angle(date), &DECLINATION_COS, &DECLINATION_SIN)
}

/// Equation of time in hours.
pub fn equation_of_time_hours(date: NaiveDate) -> f64 {
    harmonic_series(
        year_angle(date),
        &EQUATION_OF_TIME_COS,
        &EQUATION_OF_TIME_SIN,
    )
}

/// Hour angle in degrees; zero at local solar noon, negative in the morning.
pub fn hour_angle_deg(date: NaiveDate, time: NaiveTime, lon: f64) -> f64 {
    let clock = f64::from(time.hour()) + f64::from(time.minute()) / 60.0;
    let hours = clock + (lon - STANDARD_MERIDIAN_DEG) / 15.0 + equation_of_time_hours(date);
    hours * 15.0 - 180.0
}

/// Compute the sun's altitude and azimuth.
///
/// ```text
/// sin h = sin φ sin δ + cos φ cos δ cos t
/// sin A = cos δ sin t / cos h
/// cos A = (sin h sin φ − sin δ) / (cos h cos φ)
/// A     = atan2(sin A, cos A) + π
/// ```
///
/// The azimuth is reported clockwise from north in `[0, 2π)`. When `cos h`
/// vanishes (sun at zenith or nadir) the azimuth is undefined and `0` is
/// returned. Seconds in `time` are ignored; the model works per minute.
///
/// # Examples
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use sunroute_lib::{solar_position, GeoCoordinate};
///
/// let date = NaiveDate::from_ymd_opt(2023, 12, 21).unwrap();
/// let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
/// let fukuoka = GeoCoordinate::new(33.59, 130.40).unwrap();
/// let sun = solar_position(date, noon, &fukuoka).unwrap();
/// assert!(sun.altitude > 0.0);
/// ```
pub fn solar_position(
    date: NaiveDate,
    time: NaiveTime,
    coordinate: &GeoCoordinate,
) -> Result<SolarPosition> {
    let lat = coordinate.lat.to_radians();
    let declination = declination_deg(date).to_radians();
    let hour_angle = hour_angle_deg(date, time, coordinate.lon).to_radians();

    let sin_h = lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    let altitude = sin_h.clamp(-1.0, 1.0).asin();

    let cos_h = altitude.cos();
    let azimuth = if cos_h < ZENITH_EPSILON || lat.cos() < ZENITH_EPSILON {
        0.0
    } else {
        let sin_a = declination.cos() * hour_angle.sin() / cos_h;
        let cos_a = (altitude.sin() * lat.sin() - declination.sin()) / cos_h / lat.cos();
        normalize_azimuth(sin_a.atan2(cos_a) + PI)
    };

    Ok(SolarPosition {
        altitude: altitude.clamp(-FRAC_PI_2, FRAC_PI_2),
        azimuth,
    })
}

fn normalize_azimuth(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn declination_tracks_solstices() {
        assert!((declination_deg(date(2023, 12, 21)) + 23.45).abs() < 0.2);
        assert!((declination_deg(date(2023, 6, 21)) - 23.45).abs() < 0.3);
    }

    #[test]
    fn equation_of_time_stays_within_a_quarter_hour() {
        for day in 0..365 {
            let d = date(2023, 1, 1) + chrono::Days::new(day);
            assert!(equation_of_time_hours(d).abs() < 0.3);
        }
    }

    #[test]
    fn hour_angle_is_zero_near_solar_noon_on_standard_meridian() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let t = hour_angle_deg(date(2023, 4, 15), noon, STANDARD_MERIDIAN_DEG);
        assert!(t.abs() < 1.0, "{t}");
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(parse_local_date_time("2023-13-01", "12:00").is_err());
        assert!(parse_local_date_time("2023-12-21", "25:00").is_err());
        assert!(parse_local_date_time("21/12/2023", "12:00").is_err());
        let (d, t) = parse_local_date_time("2023-12-21", "07:45").unwrap();
        assert_eq!(d, date(2023, 12, 21));
        assert_eq!((t.hour(), t.minute()), (7, 45));
    }

    #[test]
    fn seconds_are_truncated_to_the_minute() {
        let coordinate = GeoCoordinate::new(33.59, 130.40).unwrap();
        let with_seconds = NaiveTime::from_hms_opt(12, 0, 30).unwrap();
        let whole_minute = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(
            solar_position(date(2023, 12, 21), with_seconds, &coordinate).unwrap(),
            solar_position(date(2023, 12, 21), whole_minute, &coordinate).unwrap()
        );
    }

    #[test]
    fn pole_yields_stable_azimuth() {
        let coordinate = GeoCoordinate::new(90.0, 0.0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let sun = solar_position(date(2023, 6, 21), noon, &coordinate).unwrap();
        assert!(sun.azimuth.is_finite());
        assert_eq!(sun.azimuth, 0.0);
    }

    #[test]
    fn zero_altitude_is_not_daylight() {
        let sun = SolarPosition {
            altitude: 0.0,
            azimuth: PI,
        };
        assert!(sun.daylight().is_none());
    }
}
