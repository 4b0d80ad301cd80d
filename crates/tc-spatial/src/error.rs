//! Spatial-subsystem error type.

use std::time::Duration;

use thiserror::Error;

use tc_core::{CoreError, Crs, LineId, PointId};

/// Errors produced by `tc-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("cannot project ({x}, {y}) from {from} to {to}: outside the valid domain")]
    OutOfDomain { from: Crs, to: Crs, x: f64, y: f64 },

    #[error("{what} is in {found} but {expected} was expected")]
    CrsMismatch {
        expected: Crs,
        found:    Crs,
        what:     String,
    },

    #[error("cannot index line {line}: {reason}")]
    IndexBuild { line: LineId, reason: &'static str },

    #[error("demand point {0} has a non-finite coordinate")]
    InvalidPoint(PointId),

    #[error(
        "snapping exceeded its {deadline:?} deadline with {completed} chunk(s) done \
         and {outstanding} outstanding"
    )]
    SnapTimeout {
        completed:   usize,
        outstanding: usize,
        deadline:    Duration,
    },

    #[error("worker pool error: {0}")]
    WorkerPool(String),

    #[error("invalid snap configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
