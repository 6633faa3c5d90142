#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use sunroute_lib::{load_street_graph, GeoCoordinate, StreetGraph};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// 3x3 grid of intersections in central Fukuoka plus an unreachable node 100.
pub fn street_grid() -> StreetGraph {
    load_street_graph(&fixtures_dir().join("street_grid")).expect("fixture street grid loads")
}

pub fn winter_solstice() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 21).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn fukuoka() -> GeoCoordinate {
    GeoCoordinate::new(33.59, 130.40).unwrap()
}
