//! Coordinate quantization.
//!
//! A [`NodeKey`] is the grid cell a coordinate falls into: both axes are
//! multiplied by `10^precision` and floored.  At the default precision of 1
//! the grid is 0.1 m, so `(10.04, 20.06)` and `(10.06, 20.04)` share the key
//! `(100, 200)`, while coordinates more than one cell apart on either axis
//! never do.
//!
//! Integer keys hash and compare exactly; there is no formatting step whose
//! output could depend on locale or float printing.

use std::fmt;

use geo::Coord;

use crate::{GraphError, GraphResult};

/// Largest supported precision.  `10^9` keeps a ±9·10⁹ m coordinate range
/// inside `i64`.
pub const MAX_PRECISION: u32 = 9;

/// Quantized coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Maps coordinates to [`NodeKey`]s at a fixed decimal precision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quantizer {
    precision: u32,
    scale:     f64,
}

impl Quantizer {
    pub fn new(precision: u32) -> GraphResult<Self> {
        if precision > MAX_PRECISION {
            return Err(GraphError::Config(format!(
                "precision {precision} exceeds the maximum of {MAX_PRECISION}"
            )));
        }
        Ok(Self { precision, scale: 10f64.powi(precision as i32) })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Cell size in coordinate units.
    pub fn resolution(&self) -> f64 {
        1.0 / self.scale
    }

    #[inline]
    pub fn key(&self, c: Coord<f64>) -> NodeKey {
        NodeKey {
            x: (c.x * self.scale).floor() as i64,
            y: (c.y * self.scale).floor() as i64,
        }
    }

    /// Lower-left corner of a key's cell.
    pub fn cell_origin(&self, key: NodeKey) -> Coord<f64> {
        Coord {
            x: key.x as f64 / self.scale,
            y: key.y as f64 / self.scale,
        }
    }
}
