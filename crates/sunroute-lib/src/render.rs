//! GeoJSON rendering of a selected route.
//!
//! Produces a `FeatureCollection` with the walked line plus origin and
//! destination markers, suitable for any web map.

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::geo::GeoCoordinate;
use crate::graph::StreetGraph;
use crate::path::Route;

fn position(coordinate: &GeoCoordinate) -> Value {
    // GeoJSON positions are [lon, lat].
    json!([coordinate.lon, coordinate.lat])
}

fn marker(coordinate: &GeoCoordinate, role: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": position(coordinate) },
        "properties": { "role": role },
    })
}

/// Render `route` with markers at the requested (unsnapped) endpoints.
pub fn render_route(
    graph: &StreetGraph,
    route: &Route,
    origin: &GeoCoordinate,
    destination: &GeoCoordinate,
) -> Result<Value> {
    let line = route
        .nodes
        .iter()
        .map(|&id| {
            graph
                .node(id)
                .map(|node| position(&node.coordinate))
                .ok_or_else(|| Error::invalid_input(format!("route node {id} missing from graph")))
        })
        .collect::<Result<Vec<_>>>()?;

    let path = json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": line },
        "properties": {
            "role": "route",
            "nodes": route.nodes,
            "total_coldness": route.total_coldness,
            "length_m": route.length_m,
        },
    });

    Ok(json!({
        "type": "FeatureCollection",
        "features": [path, marker(origin, "origin"), marker(destination, "destination")],
    }))
}
