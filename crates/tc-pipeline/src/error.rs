use tc_core::{CoreError, NodeId};
use tc_graph::GraphError;
use tc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error("optimizer `{name}` failed: {reason}")]
    Optimizer {
        name:   String,
        reason: String,
    },

    #[error("optimizer returned ({0}, {1}), which is not an edge of the graph")]
    NotASubset(NodeId, NodeId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
