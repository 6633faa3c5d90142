//! Sunroute library entry points.
//!
//! This crate models which street orientations receive direct sunlight for a
//! pedestrian at a given date, time and place, weights a street graph by that
//! exposure, and selects the warmest walking route between two points.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod bearing;
pub mod coldness;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod exposure;
pub mod geo;
pub mod graph;
pub mod insolation;
pub mod path;
pub mod render;
pub mod routing;
pub mod solar;
pub mod spatial;

pub use bearing::{Bearing, BearingTable, BEARING_BUCKETS};
pub use coldness::{
    assign_coldness, ColdnessOverlay, ColdnessPolicy, NonPositiveInsolation, WeightedView,
};
pub use config::ModelConfig;
pub use dataset::{load_street_graph, read_street_graph, resolve_dataset_dir};
pub use diagnostics::{CsvTableSink, MemoryTableSink, TableSink};
pub use error::{Error, Result};
pub use exposure::{exposure_table, ExposureParams, ExposureTable};
pub use geo::{CoordinatePolicy, GeoCoordinate};
pub use graph::{EdgeId, Intersection, NodeId, StreetGraph, StreetGraphBuilder, StreetSegment};
pub use insolation::{insolation_table, InsolationParams, InsolationTable};
pub use path::{select_route, Route, SearchLimits};
pub use render::render_route;
pub use routing::{
    compute_tables, plan_for_position, plan_warm_route, RouteOutcome, WarmRoutePlan,
    WarmRouteRequest, BELOW_HORIZON_ADVISORY,
};
pub use solar::{parse_local_date_time, solar_position, DaylightPosition, SolarPosition};
pub use spatial::{NodeLocator, SpatialIndex};
