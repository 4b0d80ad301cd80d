//! Reprojection between the supported reference frames.
//!
//! Every transform pivots through WGS-84: the source coordinate is first
//! unprojected to longitude/latitude, then projected into the target frame.
//! Both projected frames are spherical, so the round trip is exact up to
//! floating-point error.

use geo::{Coord, LineString};

use tc_core::{Crs, DemandPoint, LineFeature};

use crate::{SpatialError, SpatialResult};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Sphere radius of EPSG:3857, metres.
pub const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Latitude at which Web Mercator becomes a square world.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Sphere radius of EPSG:2163 (Clarke 1866 authalic sphere), metres.
pub const ATLAS_RADIUS: f64 = 6_370_997.0;

const ATLAS_LAT0: f64 = 45.0;
const ATLAS_LON0: f64 = -100.0;

// ── Projector ─────────────────────────────────────────────────────────────────

/// A transform from one [`Crs`] to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Projector {
    from: Crs,
    to:   Crs,
}

impl Projector {
    pub fn new(from: Crs, to: Crs) -> Self {
        Self { from, to }
    }

    /// Build from EPSG codes.
    ///
    /// # Errors
    ///
    /// [`SpatialError::Core`] wrapping `UnsupportedCrs` for unknown codes.
    pub fn from_epsg(from: u32, to: u32) -> SpatialResult<Self> {
        Ok(Self::new(Crs::from_epsg(from)?, Crs::from_epsg(to)?))
    }

    pub fn from_crs(&self) -> Crs {
        self.from
    }

    pub fn to_crs(&self) -> Crs {
        self.to
    }

    /// The transform in the opposite direction.
    pub fn inverse(&self) -> Self {
        Self::new(self.to, self.from)
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    /// Transform a single coordinate.
    pub fn project_coord(&self, c: Coord<f64>) -> SpatialResult<Coord<f64>> {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(self.out_of_domain(c));
        }
        if self.is_identity() {
            return Ok(c);
        }
        let (lon, lat) = to_geographic(self.from, c).ok_or_else(|| self.out_of_domain(c))?;
        from_geographic(self.to, lon, lat).ok_or_else(|| self.out_of_domain(c))
    }

    /// Transform every coordinate of a line string.
    pub fn project_line_string(&self, ls: &LineString<f64>) -> SpatialResult<LineString<f64>> {
        let coords = ls
            .0
            .iter()
            .map(|&c| self.project_coord(c))
            .collect::<SpatialResult<Vec<_>>>()?;
        Ok(LineString::new(coords))
    }

    /// Reproject a line feature.  The feature must be expressed in this
    /// projector's source frame.
    pub fn project_line(&self, line: &LineFeature) -> SpatialResult<LineFeature> {
        self.expect_crs(line.crs, || format!("line {}", line.id))?;
        let geometry = self.project_line_string(&line.geometry)?;
        Ok(line.derive(geometry, self.to))
    }

    pub fn project_lines(&self, lines: &[LineFeature]) -> SpatialResult<Vec<LineFeature>> {
        lines.iter().map(|l| self.project_line(l)).collect()
    }

    pub fn project_point(&self, point: &DemandPoint) -> SpatialResult<DemandPoint> {
        self.expect_crs(point.crs, || format!("demand point {}", point.id))?;
        let c = self.project_coord(point.coord())?;
        Ok(point.relocated(c, self.to))
    }

    pub fn project_points(&self, points: &[DemandPoint]) -> SpatialResult<Vec<DemandPoint>> {
        points.iter().map(|p| self.project_point(p)).collect()
    }

    fn expect_crs(&self, found: Crs, what: impl FnOnce() -> String) -> SpatialResult<()> {
        if found == self.from {
            Ok(())
        } else {
            Err(SpatialError::CrsMismatch { expected: self.from, found, what: what() })
        }
    }

    fn out_of_domain(&self, c: Coord<f64>) -> SpatialError {
        SpatialError::OutOfDomain { from: self.from, to: self.to, x: c.x, y: c.y }
    }
}

/// Reproject a bare line string between two frames.
pub fn project(ls: &LineString<f64>, from: Crs, to: Crs) -> SpatialResult<LineString<f64>> {
    Projector::new(from, to).project_line_string(ls)
}

// ── Frame math ────────────────────────────────────────────────────────────────

/// Unproject to `(lon, lat)` degrees.  `None` outside the frame's domain.
fn to_geographic(crs: Crs, c: Coord<f64>) -> Option<(f64, f64)> {
    match crs {
        Crs::Wgs84 => {
            let (lon, lat) = (c.x, c.y);
            (lon.abs() <= 180.0 && lat.abs() <= 90.0).then_some((lon, lat))
        }
        Crs::WebMercator => {
            let half_world = std::f64::consts::PI * MERCATOR_RADIUS;
            if c.x.abs() > half_world * (1.0 + 1e-9) || c.y.abs() > half_world * (1.0 + 1e-9) {
                return None;
            }
            let lon = (c.x / MERCATOR_RADIUS).to_degrees();
            let lat = (2.0 * (c.y / MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
                .to_degrees();
            Some((lon, lat))
        }
        Crs::UsNationalAtlas => {
            let rho = c.x.hypot(c.y);
            if rho > 2.0 * ATLAS_RADIUS {
                return None;
            }
            let phi0 = ATLAS_LAT0.to_radians();
            if rho == 0.0 {
                return Some((ATLAS_LON0, ATLAS_LAT0));
            }
            let cc = 2.0 * (rho / (2.0 * ATLAS_RADIUS)).asin();
            let (sin_c, cos_c) = cc.sin_cos();
            let phi = (cos_c * phi0.sin() + c.y * sin_c * phi0.cos() / rho).asin();
            let lam = (c.x * sin_c).atan2(rho * phi0.cos() * cos_c - c.y * phi0.sin() * sin_c);
            Some((normalize_lon(ATLAS_LON0 + lam.to_degrees()), phi.to_degrees()))
        }
    }
}

/// Project `(lon, lat)` degrees into `crs`.  `None` outside the domain.
fn from_geographic(crs: Crs, lon: f64, lat: f64) -> Option<Coord<f64>> {
    if lon.abs() > 180.0 + 1e-9 || lat.abs() > 90.0 {
        return None;
    }
    match crs {
        Crs::Wgs84 => Some(Coord { x: lon, y: lat }),
        Crs::WebMercator => {
            if lat.abs() > MERCATOR_MAX_LAT {
                return None;
            }
            let x = MERCATOR_RADIUS * lon.to_radians();
            let y = MERCATOR_RADIUS
                * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
            Some(Coord { x, y })
        }
        Crs::UsNationalAtlas => {
            let (phi, phi0) = (lat.to_radians(), ATLAS_LAT0.to_radians());
            let dlam = (lon - ATLAS_LON0).to_radians();
            let denom = 1.0 + phi0.sin() * phi.sin() + phi0.cos() * phi.cos() * dlam.cos();
            // Antipode of the projection centre.
            if denom <= 1e-12 {
                return None;
            }
            let k = (2.0 / denom).sqrt();
            let x = ATLAS_RADIUS * k * phi.cos() * dlam.sin();
            let y = ATLAS_RADIUS * k * (phi0.cos() * phi.sin() - phi0.sin() * phi.cos() * dlam.cos());
            Some(Coord { x, y })
        }
    }
}

fn normalize_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}
