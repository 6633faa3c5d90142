use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::bearing::Bearing;
use crate::error::{Error, Result};
use crate::geo::GeoCoordinate;

/// Identifier of an intersection, as assigned by the graph source.
pub type NodeId = i64;

/// Dense identifier of a street segment within one [`StreetGraph`].
pub type EdgeId = usize;

/// Street intersection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intersection {
    pub id: NodeId,
    pub coordinate: GeoCoordinate,
}

/// Street segment between two intersections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreetSegment {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Length in meters.
    pub length: f64,
    pub bearing: Bearing,
    /// One-way segments can only be walked from `source` to `target`.
    pub oneway: bool,
}

impl StreetSegment {
    /// The far end when leaving `from`, if the segment may be walked that way.
    pub fn walk_from(&self, from: NodeId) -> Option<NodeId> {
        if from == self.source {
            Some(self.target)
        } else if from == self.target && !self.oneway {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Read-only street network: topology plus per-segment length and bearing.
///
/// Cloning is cheap; the data is shared behind `Arc`s so one loaded graph can
/// serve many concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    nodes: Arc<HashMap<NodeId, Intersection>>,
    edges: Arc<Vec<StreetSegment>>,
    adjacency: Arc<HashMap<NodeId, Vec<EdgeId>>>,
}

impl StreetGraph {
    pub fn builder() -> StreetGraphBuilder {
        StreetGraphBuilder::default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Intersection> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Intersection> {
        self.nodes.values()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&StreetSegment> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> &[StreetSegment] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Segments that can be walked away from `node`, paired with the node they
    /// lead to.
    pub fn outgoing(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (NodeId, &StreetSegment)> + '_ {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&edge_id| {
                let segment = &self.edges[edge_id];
                segment.walk_from(node).map(|next| (next, segment))
            })
    }
}

/// Incremental constructor for [`StreetGraph`].
#[derive(Debug, Default)]
pub struct StreetGraphBuilder {
    nodes: HashMap<NodeId, Intersection>,
    edges: Vec<StreetSegment>,
}

impl StreetGraphBuilder {
    /// Add or replace an intersection.
    pub fn intersection(&mut self, id: NodeId, coordinate: GeoCoordinate) -> &mut Self {
        self.nodes.insert(id, Intersection { id, coordinate });
        self
    }

    /// Add a segment between two known intersections.
    pub fn segment(
        &mut self,
        source: NodeId,
        target: NodeId,
        length: f64,
        bearing: Bearing,
        oneway: bool,
    ) -> Result<EdgeId> {
        for node in [source, target] {
            if !self.nodes.contains_key(&node) {
                return Err(Error::invalid_input(format!(
                    "segment {source} -> {target} references unknown intersection {node}"
                )));
            }
        }
        if !length.is_finite() || length < 0.0 {
            return Err(Error::invalid_input(format!(
                "segment {source} -> {target} has invalid length {length}"
            )));
        }

        let id = self.edges.len();
        self.edges.push(StreetSegment {
            id,
            source,
            target,
            length,
            bearing,
            oneway,
        });
        Ok(id)
    }

    pub fn build(self) -> StreetGraph {
        let mut adjacency: HashMap<NodeId, Vec<EdgeId>> =
            self.nodes.keys().map(|&id| (id, Vec::new())).collect();
        for segment in &self.edges {
            adjacency.entry(segment.source).or_default().push(segment.id);
            if segment.target != segment.source {
                adjacency.entry(segment.target).or_default().push(segment.id);
            }
        }

        StreetGraph {
            nodes: Arc::new(self.nodes),
            edges: Arc::new(self.edges),
            adjacency: Arc::new(adjacency),
        }
    }
}
