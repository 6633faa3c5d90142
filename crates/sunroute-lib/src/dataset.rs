//! Street-graph dataset loading.
//!
//! A dataset is a directory holding two CSV files:
//!
//! ```text
//! nodes.csv   id,lat,lon
//! edges.csv   source,target,length,bearing[,oneway]
//! ```
//!
//! `length` is in meters and `bearing` is a compass angle in degrees of any
//! range; it is folded into a [`Bearing`] bucket on load. Any failure to read
//! or parse the dataset is reported as [`Error::UpstreamUnavailable`].

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, info};

use crate::bearing::Bearing;
use crate::error::{Error, Result};
use crate::geo::GeoCoordinate;
use crate::graph::{NodeId, StreetGraph, StreetGraphBuilder};

/// Environment variable overriding the dataset directory.
pub const DATASET_DIR_ENV: &str = "SUNROUTE_DATASET_DIR";

pub const NODES_FILENAME: &str = "nodes.csv";
pub const EDGES_FILENAME: &str = "edges.csv";

const RESOURCE: &str = "street graph";

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: NodeId,
    target: NodeId,
    length: f64,
    bearing: f64,
    #[serde(default)]
    oneway: Option<bool>,
}

/// Resolve the dataset directory: explicit path, then
/// `SUNROUTE_DATASET_DIR`, then the platform data directory.
pub fn resolve_dataset_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(DATASET_DIR_ENV).filter(|value| !value.is_empty()) {
        debug!(env = DATASET_DIR_ENV, "using dataset directory from environment");
        return Ok(PathBuf::from(path));
    }
    default_dataset_dir()
}

/// Platform-specific default location of the street-graph dataset.
pub fn default_dataset_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "sunroute", "sunroute").ok_or_else(|| {
        Error::upstream(RESOURCE, "failed to resolve project directories for the dataset")
    })?;
    Ok(dirs.data_dir().join("street_graph"))
}

/// Load the street graph stored in `dir`.
pub fn load_street_graph(dir: &Path) -> Result<StreetGraph> {
    let nodes_path = dir.join(NODES_FILENAME);
    let edges_path = dir.join(EDGES_FILENAME);

    let nodes = open(&nodes_path)?;
    let edges = open(&edges_path)?;
    let graph = read_street_graph(nodes, edges)?;

    info!(
        path = %dir.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded street graph"
    );
    Ok(graph)
}

/// Parse a street graph from node and edge CSV readers.
pub fn read_street_graph<N: Read, E: Read>(nodes: N, edges: E) -> Result<StreetGraph> {
    let mut builder = StreetGraphBuilder::default();

    let mut node_reader = ReaderBuilder::new().trim(Trim::All).from_reader(nodes);
    for (line, record) in node_reader.deserialize::<NodeRecord>().enumerate() {
        let record = record.map_err(|err| Error::upstream(RESOURCE, err))?;
        let coordinate = GeoCoordinate::new(record.lat, record.lon).map_err(|err| {
            Error::upstream(RESOURCE, format!("{NODES_FILENAME} row {}: {err}", line + 1))
        })?;
        builder.intersection(record.id, coordinate);
    }

    let mut edge_reader = ReaderBuilder::new().trim(Trim::All).from_reader(edges);
    for (line, record) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let record = record.map_err(|err| Error::upstream(RESOURCE, err))?;
        let row = |err: Error| {
            Error::upstream(RESOURCE, format!("{EDGES_FILENAME} row {}: {err}", line + 1))
        };
        let bearing = Bearing::from_degrees(record.bearing).map_err(row)?;
        builder
            .segment(
                record.source,
                record.target,
                record.length,
                bearing,
                record.oneway.unwrap_or(false),
            )
            .map_err(row)?;
    }

    Ok(builder.build())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| {
        Error::upstream(RESOURCE, format!("cannot open {}: {err}", path.display()))
    })
}
