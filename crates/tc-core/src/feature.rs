//! Input and output features: street lines and demand points.
//!
//! Features are immutable values.  Every stage that changes geometry
//! (projection, splitting, materialization) produces new features via
//! [`LineFeature::derive`], which carries the id and attributes across.

use std::collections::BTreeMap;

use geo::{Coord, LineString, Point};

use crate::{CoreError, CoreResult, Crs, LineId, PointId};

/// Source attribute fields (`osm_id`, `fclass`, `code`, …).
///
/// A `BTreeMap` so that iteration and serialization order never depend on
/// hashing.
pub type Attributes = BTreeMap<String, String>;

// ── LineFeature ───────────────────────────────────────────────────────────────

/// A polyline with attributes, expressed in `crs`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineFeature {
    pub id: LineId,
    pub geometry: LineString<f64>,
    pub crs: Crs,
    pub attributes: Attributes,
}

impl LineFeature {
    pub fn new(id: LineId, geometry: LineString<f64>, crs: Crs) -> Self {
        Self { id, geometry, crs, attributes: Attributes::new() }
    }

    /// Build from `(x, y)` tuples.  Handy for fixtures and synthetic data.
    pub fn from_xy(id: LineId, xy: &[(f64, f64)], crs: Crs) -> Self {
        let coords: Vec<Coord<f64>> = xy.iter().map(|&(x, y)| Coord { x, y }).collect();
        Self::new(id, LineString::new(coords), crs)
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// A new feature with the same id and attributes but different geometry.
    pub fn derive(&self, geometry: LineString<f64>, crs: Crs) -> Self {
        Self {
            id: self.id,
            geometry,
            crs,
            attributes: self.attributes.clone(),
        }
    }

    #[inline]
    pub fn coord_count(&self) -> usize {
        self.geometry.0.len()
    }

    /// First coordinate.  `None` only for an empty line string.
    #[inline]
    pub fn start(&self) -> Option<Coord<f64>> {
        self.geometry.0.first().copied()
    }

    /// Last coordinate.
    #[inline]
    pub fn end(&self) -> Option<Coord<f64>> {
        self.geometry.0.last().copied()
    }

    /// Reject lines with fewer than two coordinates or non-finite values.
    ///
    /// Zero-length lines pass here; the spatial index decides what to do
    /// with them.
    pub fn validate(&self) -> CoreResult<()> {
        if self.coord_count() < 2 {
            return Err(CoreError::InvalidGeometry {
                line:   self.id,
                reason: "fewer than two coordinates",
            });
        }
        if self.geometry.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
            return Err(CoreError::InvalidGeometry {
                line:   self.id,
                reason: "non-finite coordinate",
            });
        }
        Ok(())
    }
}

// ── DemandPoint ───────────────────────────────────────────────────────────────

/// A location the network has to reach.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandPoint {
    pub id: PointId,
    pub location: Point<f64>,
    pub crs: Crs,
    pub attributes: Attributes,
}

impl DemandPoint {
    pub fn new(id: PointId, x: f64, y: f64, crs: Crs) -> Self {
        Self {
            id,
            location: Point::new(x, y),
            crs,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn coord(&self) -> Coord<f64> {
        self.location.0
    }

    /// Same id and attributes at a new location.
    pub fn relocated(&self, location: Coord<f64>, crs: Crs) -> Self {
        Self {
            id: self.id,
            location: Point(location),
            crs,
            attributes: self.attributes.clone(),
        }
    }
}
