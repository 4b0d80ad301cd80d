//! Core error type.
//!
//! The other `tc-*` crates keep their own error enums and wrap `CoreError`
//! as one variant where they need to.

use thiserror::Error;

use crate::LineId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unsupported reference frame EPSG:{0}")]
    UnsupportedCrs(u32),

    #[error("line {line} has invalid geometry: {reason}")]
    InvalidGeometry { line: LineId, reason: &'static str },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `tc-core`.
pub type CoreResult<T> = Result<T, CoreError>;
