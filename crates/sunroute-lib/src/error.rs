use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Convenient result alias for the sunroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// A sun below the horizon is not represented here: it is a regular
/// [`RouteOutcome`](crate::routing::RouteOutcome).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed date/time text, a coordinate outside the accepted policy, or
    /// a node identifier that is not part of the graph.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Raised when the destination cannot be reached from the origin.
    #[error("no route found between node {origin} and node {destination}")]
    NoRouteFound { origin: NodeId, destination: NodeId },

    /// Raised when an edge weight would be negative, non-finite, or rests on a
    /// non-positive insolation value the active policy refuses to clamp.
    #[error("degenerate coldness {value} computed for edge {edge}")]
    DegenerateWeight { edge: EdgeId, value: f64 },

    /// An external collaborator (graph source, node locator) failed.
    #[error("{resource} unavailable: {message}")]
    UpstreamUnavailable { resource: String, message: String },

    /// The shortest-path search exceeded its request-scoped time budget.
    #[error("route search timed out after {elapsed_ms} ms")]
    SearchTimedOut { elapsed_ms: u128 },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV errors raised while writing diagnostics.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn upstream(resource: impl Into<String>, message: impl ToString) -> Self {
        Error::UpstreamUnavailable {
            resource: resource.into(),
            message: message.to_string(),
        }
    }
}
