//! Output formatting for sun positions, bearing tables and routes.
//!
//! Every formatter returns the rendered text or JSON value instead of
//! printing, so `main.rs` owns stdout and the helpers stay testable.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};

use sunroute_lib::{
    render_route, Bearing, ExposureTable, GeoCoordinate, InsolationTable, RouteOutcome,
    SolarPosition, StreetGraph, WarmRouteRequest,
};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// GeoJSON FeatureCollection (routes only).
    Geojson,
}

/// One row of the per-bearing tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TableRow {
    pub bearing: Bearing,
    pub insolation: f64,
    pub exposure: f64,
}

pub fn table_rows(insolation: &InsolationTable, exposure: &ExposureTable) -> Vec<TableRow> {
    insolation
        .iter()
        .zip(exposure.iter())
        .map(|((bearing, jv), (_, fraction))| TableRow {
            bearing,
            insolation: jv,
            exposure: fraction,
        })
        .collect()
}

pub fn sun_text(
    date: NaiveDate,
    time: NaiveTime,
    coordinate: &GeoCoordinate,
    sun: &SolarPosition,
) -> String {
    let horizon = if sun.daylight().is_some() {
        "above the horizon"
    } else {
        "below the horizon"
    };
    format!(
        "Sun at ({}, {}) on {} {}: altitude {:.2}°, azimuth {:.2}° ({})",
        coordinate.lat,
        coordinate.lon,
        date,
        time.format("%H:%M"),
        sun.altitude_deg(),
        sun.azimuth_deg(),
        horizon
    )
}

pub fn sun_json(
    date: NaiveDate,
    time: NaiveTime,
    coordinate: &GeoCoordinate,
    sun: &SolarPosition,
) -> Value {
    json!({
        "date": date,
        "time": time.format("%H:%M").to_string(),
        "coordinate": coordinate,
        "altitude_deg": sun.altitude_deg(),
        "azimuth_deg": sun.azimuth_deg(),
        "above_horizon": sun.daylight().is_some(),
    })
}

pub fn tables_text(rows: &[TableRow]) -> String {
    let mut out = String::from("bearing  insolation  exposure\n");
    for row in rows {
        let _ = writeln!(
            out,
            "{:>6}°  {:>10.2}  {:>8.3}",
            row.bearing.degrees(),
            row.insolation,
            row.exposure
        );
    }
    out
}

pub fn route_text(graph: &StreetGraph, outcome: &RouteOutcome) -> String {
    let sun = outcome.sun();
    let mut out = format!(
        "Sun: altitude {:.2}°, azimuth {:.2}°\n",
        sun.altitude_deg(),
        sun.azimuth_deg()
    );

    match outcome {
        RouteOutcome::BelowHorizon { advisory, .. } => {
            out.push_str(advisory);
            out.push('\n');
        }
        RouteOutcome::Routed(plan) => {
            let route = &plan.route;
            let _ = writeln!(
                out,
                "Warmest route from node {} to node {} ({} segments, {:.1} m, coldness {:.3}):",
                plan.origin_node,
                plan.destination_node,
                route.hop_count(),
                route.length_m,
                route.total_coldness
            );
            for id in &route.nodes {
                match graph.node(*id) {
                    Some(node) => {
                        let _ = writeln!(
                            out,
                            "- {} ({:.6}, {:.6})",
                            id, node.coordinate.lat, node.coordinate.lon
                        );
                    }
                    None => {
                        let _ = writeln!(out, "- {id} (<unknown>)");
                    }
                }
            }
            if !plan.flagged_edges.is_empty() {
                let _ = writeln!(
                    out,
                    "Note: {} street segments receive no direct sun and were treated as maximally cold.",
                    plan.flagged_edges.len()
                );
            }
        }
    }
    out
}

/// GeoJSON for a route outcome. A below-horizon outcome yields an empty
/// collection carrying the advisory.
pub fn route_geojson(
    graph: &StreetGraph,
    outcome: &RouteOutcome,
    request: &WarmRouteRequest,
) -> sunroute_lib::Result<Value> {
    match outcome {
        RouteOutcome::Routed(plan) => {
            render_route(graph, &plan.route, &request.origin, &request.destination)
        }
        RouteOutcome::BelowHorizon { advisory, .. } => Ok(json!({
            "type": "FeatureCollection",
            "features": [],
            "advisory": advisory,
        })),
    }
}
