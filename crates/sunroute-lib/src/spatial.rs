//! Nearest-intersection lookup.
//!
//! Snapping a raw coordinate to a graph node is an external concern; the
//! routing pipeline only depends on the [`NodeLocator`] trait. [`SpatialIndex`]
//! is the bundled implementation: a KD-tree over intersections placed on the
//! unit sphere, so the Euclidean nearest neighbour is also the great-circle
//! nearest one.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::{GeoCoordinate, EARTH_RADIUS_M};
use crate::graph::{NodeId, StreetGraph};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Resolves an arbitrary coordinate to the closest street-graph node.
pub trait NodeLocator {
    /// Return the node nearest to `coordinate`.
    ///
    /// Failures are reported as [`Error::UpstreamUnavailable`].
    fn nearest_node(&self, coordinate: &GeoCoordinate) -> Result<NodeId>;
}

/// KD-tree index over the intersections of a [`StreetGraph`].
pub struct SpatialIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<NodeId>,
    max_snap_distance_m: Option<f64>,
}

impl SpatialIndex {
    /// Index every intersection of `graph`.
    pub fn build(graph: &StreetGraph) -> Self {
        let mut nodes = Vec::with_capacity(graph.node_count());
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();

        let mut intersections: Vec<_> = graph.nodes().collect();
        intersections.sort_by_key(|intersection| intersection.id);
        for intersection in intersections {
            tree.add(&intersection.coordinate.unit_vector(), nodes.len());
            nodes.push(intersection.id);
        }

        info!(node_count = nodes.len(), "built intersection index");

        Self {
            tree,
            nodes,
            max_snap_distance_m: None,
        }
    }

    /// Treat coordinates farther than `meters` from every node as a lookup miss.
    pub fn with_max_snap_distance(mut self, meters: f64) -> Self {
        self.max_snap_distance_m = Some(meters);
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nearest node and its great-circle distance in meters.
    pub fn nearest(&self, coordinate: &GeoCoordinate) -> Option<(NodeId, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let results = self
            .tree
            .nearest_n::<SquaredEuclidean>(&coordinate.unit_vector(), 1);
        results.into_iter().next().map(|neighbour| {
            let chord = neighbour.distance.sqrt();
            let distance = 2.0 * EARTH_RADIUS_M * (chord / 2.0).min(1.0).asin();
            (self.nodes[neighbour.item], distance)
        })
    }
}

impl NodeLocator for SpatialIndex {
    fn nearest_node(&self, coordinate: &GeoCoordinate) -> Result<NodeId> {
        let (node, distance) = self.nearest(coordinate).ok_or_else(|| {
            Error::upstream("intersection index", "street graph has no intersections")
        })?;

        if let Some(limit) = self.max_snap_distance_m {
            if distance > limit {
                return Err(Error::upstream(
                    "intersection index",
                    format!(
                        "no intersection within {limit} m of ({}, {}); nearest is {distance:.0} m away",
                        coordinate.lat, coordinate.lon
                    ),
                ));
            }
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> StreetGraph {
        let mut builder = StreetGraph::builder();
        builder
            .intersection(10, GeoCoordinate::new(33.590, 130.400).unwrap())
            .intersection(20, GeoCoordinate::new(33.595, 130.400).unwrap())
            .intersection(30, GeoCoordinate::new(33.590, 130.410).unwrap());
        builder.build()
    }

    #[test]
    fn snaps_to_closest_intersection() {
        let index = SpatialIndex::build(&graph());
        let probe = GeoCoordinate::new(33.5948, 130.4001).unwrap();
        assert_eq!(index.nearest_node(&probe).unwrap(), 20);
    }

    #[test]
    fn reports_great_circle_distance() {
        let index = SpatialIndex::build(&graph());
        let probe = GeoCoordinate::new(33.591, 130.400).unwrap();
        let (node, distance) = index.nearest(&probe).unwrap();
        assert_eq!(node, 10);
        assert!((distance - 111.2).abs() < 1.0, "{distance}");
    }

    #[test]
    fn far_coordinates_miss_when_limited() {
        let index = SpatialIndex::build(&graph()).with_max_snap_distance(500.0);
        let probe = GeoCoordinate::new(35.0, 135.0).unwrap();
        let err = index.nearest_node(&probe).unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable { .. }));
    }

    #[test]
    fn empty_graph_is_a_lookup_failure() {
        let index = SpatialIndex::build(&StreetGraph::default());
        assert!(index.is_empty());
        let probe = GeoCoordinate::new(33.0, 130.0).unwrap();
        assert!(index.nearest_node(&probe).is_err());
    }
}
