//! Warmest-route pipeline.
//!
//! One request runs these stages in order:
//!
//! ```text
//! Start -> PositionComputed -> BelowHorizon                      (advisory)
//!                           -> AboveHorizon -> TablesComputed
//!                              -> GraphWeighted -> RouteSelected (route)
//!                                               -> RouteSelectionFailed (error)
//! ```
//!
//! Every stage is a pure function of its inputs. The street graph is shared
//! read-only; edge costs live in a per-request overlay.
//!
//! # Example
//!
//! ```ignore
//! use sunroute_lib::{load_street_graph, plan_warm_route, ModelConfig, SpatialIndex, WarmRouteRequest};
//!
//! let graph = load_street_graph("data/fukuoka".as_ref())?;
//! let index = SpatialIndex::build(&graph);
//! let request = WarmRouteRequest::parse("2023-12-21", "12:00", (33.59, 130.40), (33.58, 130.42))?;
//! let outcome = plan_warm_route(&graph, &index, &request, &ModelConfig::default(), None)?;
//! ```

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use crate::coldness::{assign_coldness, WeightedView};
use crate::config::ModelConfig;
use crate::diagnostics::TableSink;
use crate::error::Result;
use crate::exposure::{exposure_table, ExposureTable};
use crate::geo::{CoordinatePolicy, GeoCoordinate};
use crate::graph::{EdgeId, NodeId, StreetGraph};
use crate::insolation::{insolation_table, InsolationTable};
use crate::path::{select_route, Route};
use crate::solar::{parse_local_date_time, solar_position, DaylightPosition, SolarPosition};
use crate::spatial::NodeLocator;

/// Message returned instead of a route when the sun is down.
pub const BELOW_HORIZON_ADVISORY: &str =
    "The sun is below the horizon, so every route is equally cold.";

/// Stages of a single pipeline run, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    PositionComputed,
    BelowHorizon,
    AboveHorizon,
    TablesComputed,
    GraphWeighted,
    RouteSelected,
    RouteSelectionFailed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PipelineStage::Start => "start",
            PipelineStage::PositionComputed => "position_computed",
            PipelineStage::BelowHorizon => "below_horizon",
            PipelineStage::AboveHorizon => "above_horizon",
            PipelineStage::TablesComputed => "tables_computed",
            PipelineStage::GraphWeighted => "graph_weighted",
            PipelineStage::RouteSelected => "route_selected",
            PipelineStage::RouteSelectionFailed => "route_selection_failed",
        };
        f.write_str(value)
    }
}

/// Input of one warmest-route query, already validated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WarmRouteRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub origin: GeoCoordinate,
    pub destination: GeoCoordinate,
}

impl WarmRouteRequest {
    /// Build a request from form-style text and `(lat, lon)` pairs, applying
    /// the north-east quadrant policy of the command-line input.
    pub fn parse(
        date: &str,
        time: &str,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<Self> {
        Self::parse_with_policy(
            date,
            time,
            origin,
            destination,
            CoordinatePolicy::NorthEastQuadrant,
        )
    }

    pub fn parse_with_policy(
        date: &str,
        time: &str,
        origin: (f64, f64),
        destination: (f64, f64),
        policy: CoordinatePolicy,
    ) -> Result<Self> {
        let (date, time) = parse_local_date_time(date, time)?;
        Ok(Self {
            date,
            time,
            origin: policy.coordinate(origin.0, origin.1)?,
            destination: policy.coordinate(destination.0, destination.1)?,
        })
    }
}

/// Successful pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarmRoutePlan {
    pub sun: SolarPosition,
    pub origin_node: NodeId,
    pub destination_node: NodeId,
    pub route: Route,
    /// Edges weighted as maximally cold because their insolation was not
    /// strictly positive.
    pub flagged_edges: Vec<EdgeId>,
}

/// Terminal state of a pipeline run that did not fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    BelowHorizon {
        sun: SolarPosition,
        advisory: String,
    },
    Routed(WarmRoutePlan),
}

impl RouteOutcome {
    pub fn plan(&self) -> Option<&WarmRoutePlan> {
        match self {
            RouteOutcome::Routed(plan) => Some(plan),
            RouteOutcome::BelowHorizon { .. } => None,
        }
    }

    pub fn sun(&self) -> SolarPosition {
        match self {
            RouteOutcome::Routed(plan) => plan.sun,
            RouteOutcome::BelowHorizon { sun, .. } => *sun,
        }
    }
}

/// Exposure and insolation tables for one daylight position.
pub fn compute_tables(
    date: NaiveDate,
    sun: &DaylightPosition,
    config: &ModelConfig,
) -> (ExposureTable, InsolationTable) {
    let exposure = exposure_table(sun, &config.exposure);
    let insolation = insolation_table(date, &sun.position(), &config.insolation);
    (exposure, insolation)
}

/// Run the full pipeline for `request`.
///
/// The sun position is evaluated at the origin. When the sun is not strictly
/// above the horizon no graph work is done and
/// [`RouteOutcome::BelowHorizon`] is returned.
pub fn plan_warm_route<L: NodeLocator + ?Sized>(
    graph: &StreetGraph,
    locator: &L,
    request: &WarmRouteRequest,
    config: &ModelConfig,
    sink: Option<&mut dyn TableSink>,
) -> Result<RouteOutcome> {
    debug!(stage = %PipelineStage::Start, date = %request.date, time = %request.time);
    let sun = solar_position(request.date, request.time, &request.origin)?;
    plan_for_position(graph, locator, request, sun, config, sink)
}

/// Run the pipeline from an already computed sun position.
pub fn plan_for_position<L: NodeLocator + ?Sized>(
    graph: &StreetGraph,
    locator: &L,
    request: &WarmRouteRequest,
    sun: SolarPosition,
    config: &ModelConfig,
    sink: Option<&mut dyn TableSink>,
) -> Result<RouteOutcome> {
    debug!(
        stage = %PipelineStage::PositionComputed,
        altitude_deg = sun.altitude_deg(),
        azimuth_deg = sun.azimuth_deg()
    );

    let Some(daylight) = sun.daylight() else {
        debug!(stage = %PipelineStage::BelowHorizon);
        return Ok(RouteOutcome::BelowHorizon {
            sun,
            advisory: BELOW_HORIZON_ADVISORY.to_string(),
        });
    };
    debug!(stage = %PipelineStage::AboveHorizon);

    config.validate()?;
    let (exposure, insolation) = compute_tables(request.date, &daylight, config);
    if let Some(sink) = sink {
        sink.record(&insolation, &exposure)?;
    }
    debug!(stage = %PipelineStage::TablesComputed);

    let overlay = assign_coldness(graph, &exposure, &insolation, &config.coldness)?;
    let view = WeightedView::new(graph, &overlay)?;
    debug!(stage = %PipelineStage::GraphWeighted, flagged = overlay.flagged().len());

    let origin_node = locator.nearest_node(&request.origin)?;
    let destination_node = locator.nearest_node(&request.destination)?;

    let route = select_route(&view, origin_node, destination_node, &config.search)
        .inspect_err(|err| {
            debug!(stage = %PipelineStage::RouteSelectionFailed, error = %err);
        })?;
    debug!(
        stage = %PipelineStage::RouteSelected,
        hops = route.hop_count(),
        coldness = route.total_coldness
    );

    Ok(RouteOutcome::Routed(WarmRoutePlan {
        sun,
        origin_node,
        destination_node,
        route,
        flagged_edges: overlay.flagged().to_vec(),
    }))
}
