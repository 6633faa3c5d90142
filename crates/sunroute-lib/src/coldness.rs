//! Edge weighting by sun exposure.
//!
//! Every street segment receives a "coldness" cost derived from its length
//! and the two bearing tables:
//!
//! ```text
//! coldness = length / Jv * exposure
//! ```
//!
//! Sunnier streets (larger `Jv`) become cheaper. `Jv` can be zero or negative
//! for some bearings, which would make the cost undefined or negative and
//! break Dijkstra. [`ColdnessPolicy`] decides what happens in that case.
//!
//! Costs live in a per-request [`ColdnessOverlay`] keyed by edge id; the shared
//! [`StreetGraph`] is never modified.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::exposure::ExposureTable;
use crate::graph::{EdgeId, NodeId, StreetGraph, StreetSegment};
use crate::insolation::InsolationTable;

/// Default lower bound for `Jv` before dividing, W/m².
pub const DEFAULT_INSOLATION_FLOOR: f64 = 1.0;

/// Treatment of bearings whose vertical insolation is not strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonPositiveInsolation {
    /// Weight the edge as maximally cold (`length / floor`) and record it in
    /// [`ColdnessOverlay::flagged`].
    #[default]
    ClampAndFlag,
    /// Fail the request with [`Error::DegenerateWeight`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColdnessPolicy {
    /// `Jv` values below this floor are raised to it before dividing.
    pub insolation_floor: f64,
    pub non_positive: NonPositiveInsolation,
}

impl Default for ColdnessPolicy {
    fn default() -> Self {
        Self {
            insolation_floor: DEFAULT_INSOLATION_FLOOR,
            non_positive: NonPositiveInsolation::ClampAndFlag,
        }
    }
}

impl ColdnessPolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.insolation_floor.is_finite() || self.insolation_floor <= 0.0 {
            return Err(Error::invalid_input(format!(
                "insolation floor must be strictly positive, got {}",
                self.insolation_floor
            )));
        }
        Ok(())
    }

    /// Cost of one segment, and whether its true insolation was non-positive.
    pub fn coldness(&self, length: f64, insolation: f64, exposure: f64) -> (f64, bool) {
        if insolation <= 0.0 || insolation.is_nan() {
            return (length / self.insolation_floor, true);
        }
        (length / insolation.max(self.insolation_floor) * exposure, false)
    }
}

/// Per-request edge costs for one [`StreetGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColdnessOverlay {
    weights: Vec<f64>,
    flagged: Vec<EdgeId>,
}

impl ColdnessOverlay {
    pub fn weight(&self, edge: EdgeId) -> Option<f64> {
        self.weights.get(edge).copied()
    }

    /// Edges whose insolation was not strictly positive.
    pub fn flagged(&self) -> &[EdgeId] {
        &self.flagged
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Compute the coldness of every segment in `graph`.
///
/// # Errors
///
/// [`Error::DegenerateWeight`] when a cost would be negative or non-finite,
/// or when an edge has non-positive insolation under
/// [`NonPositiveInsolation::Reject`].
pub fn assign_coldness(
    graph: &StreetGraph,
    exposure: &ExposureTable,
    insolation: &InsolationTable,
    policy: &ColdnessPolicy,
) -> Result<ColdnessOverlay> {
    policy.validate()?;

    let mut weights = Vec::with_capacity(graph.edge_count());
    let mut flagged = Vec::new();

    for segment in graph.edges() {
        let jv = insolation.get(segment.bearing);
        let (value, non_positive) =
            policy.coldness(segment.length, jv, exposure.get(segment.bearing));

        if non_positive {
            if policy.non_positive == NonPositiveInsolation::Reject {
                return Err(Error::DegenerateWeight {
                    edge: segment.id,
                    value: segment.length / jv,
                });
            }
            flagged.push(segment.id);
        }
        if !value.is_finite() || value < 0.0 {
            return Err(Error::DegenerateWeight {
                edge: segment.id,
                value,
            });
        }
        weights.push(value);
    }

    if !flagged.is_empty() {
        warn!(
            flagged = flagged.len(),
            floor = policy.insolation_floor,
            "edges with non-positive insolation weighted as maximally cold"
        );
    }
    debug!(edges = weights.len(), "assigned edge coldness");

    Ok(ColdnessOverlay { weights, flagged })
}

/// Shared topology joined with one request's edge costs.
#[derive(Debug, Clone, Copy)]
pub struct WeightedView<'a> {
    graph: &'a StreetGraph,
    overlay: &'a ColdnessOverlay,
}

impl<'a> WeightedView<'a> {
    pub fn new(graph: &'a StreetGraph, overlay: &'a ColdnessOverlay) -> Result<Self> {
        if overlay.len() != graph.edge_count() {
            return Err(Error::invalid_input(format!(
                "overlay covers {} edges but graph has {}",
                overlay.len(),
                graph.edge_count()
            )));
        }
        Ok(Self { graph, overlay })
    }

    pub fn graph(&self) -> &'a StreetGraph {
        self.graph
    }

    pub fn overlay(&self) -> &'a ColdnessOverlay {
        self.overlay
    }

    /// `(next node, segment, cost)` for every walkable segment leaving `node`.
    pub fn neighbours(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (NodeId, &'a StreetSegment, f64)> + 'a {
        let overlay: &'a ColdnessOverlay = self.overlay;
        let weights = &overlay.weights;
        self.graph
            .outgoing(node)
            .map(move |(next, segment)| (next, segment, weights[segment.id]))
    }
}
