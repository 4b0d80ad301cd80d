//! Coordinate reference frames understood by the pipeline.
//!
//! Only three frames are needed end to end:
//!
//! | Variant           | EPSG | Units   | Used for                          |
//! |-------------------|------|---------|-----------------------------------|
//! | `Wgs84`           | 4326 | degrees | source data, output, lat/lon      |
//! | `WebMercator`     | 3857 | metres  | snapping, splitting, node keys    |
//! | `UsNationalAtlas` | 2163 | metres  | reported line lengths             |
//!
//! Geographic coordinates are always stored `x = longitude, y = latitude`.

use std::fmt;

use crate::{CoreError, CoreResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crs {
    /// WGS-84 longitude/latitude.
    Wgs84,
    /// Spherical ("pseudo") Mercator.
    WebMercator,
    /// US National Atlas equal-area (spherical Lambert azimuthal).
    UsNationalAtlas,
}

impl Crs {
    /// Resolve an EPSG code.
    ///
    /// # Errors
    ///
    /// [`CoreError::UnsupportedCrs`] for any code other than 4326, 3857 or
    /// 2163.
    pub fn from_epsg(code: u32) -> CoreResult<Self> {
        match code {
            4326 => Ok(Crs::Wgs84),
            3857 => Ok(Crs::WebMercator),
            2163 => Ok(Crs::UsNationalAtlas),
            other => Err(CoreError::UnsupportedCrs(other)),
        }
    }

    pub fn epsg(self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::UsNationalAtlas => 2163,
        }
    }

    /// `true` when coordinates are planar metres (distances are Euclidean).
    #[inline]
    pub fn is_metric(self) -> bool {
        !matches!(self, Crs::Wgs84)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl std::str::FromStr for Crs {
    type Err = CoreError;

    /// Accepts `"EPSG:3857"`, `"epsg:3857"` or a bare `"3857"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("EPSG:")
            .or_else(|| trimmed.strip_prefix("epsg:"))
            .unwrap_or(trimmed);
        let code = digits
            .parse::<u32>()
            .map_err(|_| CoreError::Parse(format!("not an EPSG code: {s:?}")))?;
        Crs::from_epsg(code)
    }
}
