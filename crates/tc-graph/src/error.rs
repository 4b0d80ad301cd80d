//! Graph-subsystem error type.

use thiserror::Error;

use tc_core::NodeId;

/// Errors produced by `tc-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A solved edge names a node the lookup never minted.  The graph given
    /// to the optimizer and the lookup used here have diverged.
    #[error("node {0} is not in the node lookup")]
    UnknownNode(NodeId),

    #[error("({0}, {1}) is not an edge of the graph")]
    NotAnEdge(NodeId, NodeId),

    #[error("graph configuration error: {0}")]
    Config(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
