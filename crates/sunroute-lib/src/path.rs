use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::coldness::WeightedView;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, NodeId};

/// Request-scoped limits applied to the route search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    /// Abort the search once it has run for this many milliseconds.
    pub timeout_ms: Option<u64>,
}

impl SearchLimits {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout_ms: Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Warmest path between two intersections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Intersections from origin to destination, both included.
    pub nodes: Vec<NodeId>,
    /// Segments walked, one fewer than `nodes`.
    pub edges: Vec<EdgeId>,
    pub total_coldness: f64,
    /// Sum of segment lengths in meters.
    pub length_m: f64,
}

impl Route {
    pub fn origin(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }
}

/// Find the route from `origin` to `destination` with the lowest total
/// coldness, using Dijkstra's algorithm.
///
/// Edge weights in a [`WeightedView`] are non-negative by construction, which
/// Dijkstra relies on. Between two intersections joined by parallel segments
/// the cheaper segment is used.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if either node is not in the graph
/// * [`Error::NoRouteFound`] if `destination` is unreachable
/// * [`Error::SearchTimedOut`] if `limits.timeout_ms` elapses first
pub fn select_route(
    view: &WeightedView<'_>,
    origin: NodeId,
    destination: NodeId,
    limits: &SearchLimits,
) -> Result<Route> {
    let graph = view.graph();
    for node in [origin, destination] {
        if !graph.contains_node(node) {
            return Err(Error::invalid_input(format!(
                "node {node} is not part of the street graph"
            )));
        }
    }

    if origin == destination {
        return Ok(Route {
            nodes: vec![origin],
            edges: Vec::new(),
            total_coldness: 0.0,
            length_m: 0.0,
        });
    }

    let started = Instant::now();
    let deadline = limits
        .timeout()
        .and_then(|timeout| started.checked_add(timeout));

    let mut costs: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();
    let mut queue = BinaryHeap::new();

    costs.insert(origin, 0.0);
    queue.push(QueueEntry::new(origin, 0.0));

    while let Some(entry) = queue.pop() {
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(Error::SearchTimedOut {
                    elapsed_ms: started.elapsed().as_millis(),
                });
            }
        }

        let current_cost = match costs.get(&entry.node) {
            Some(cost) if *cost < entry.cost.0 => continue,
            Some(cost) => *cost,
            None => continue,
        };

        if entry.node == destination {
            return Ok(reconstruct_route(view, &parents, origin, destination, current_cost));
        }

        for (next, segment, weight) in view.neighbours(entry.node) {
            let next_cost = current_cost + weight;
            if next_cost < *costs.get(&next).unwrap_or(&f64::INFINITY) {
                costs.insert(next, next_cost);
                parents.insert(next, (entry.node, segment.id));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    Err(Error::NoRouteFound {
        origin,
        destination,
    })
}

fn reconstruct_route(
    view: &WeightedView<'_>,
    parents: &HashMap<NodeId, (NodeId, EdgeId)>,
    origin: NodeId,
    destination: NodeId,
    total_coldness: f64,
) -> Route {
    let mut nodes = vec![destination];
    let mut edges = Vec::new();
    let mut current = destination;
    while current != origin {
        let Some(&(parent, edge)) = parents.get(&current) else {
            break;
        };
        edges.push(edge);
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    edges.reverse();

    let length_m = edges
        .iter()
        .filter_map(|&edge| view.graph().edge(edge))
        .map(|segment| segment.length)
        .sum();

    Route {
        nodes,
        edges,
        total_coldness,
        length_m,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
