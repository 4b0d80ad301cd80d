//! Per-feature scalar fields for writers, snap connectors, and snapped
//! demand points.

use std::collections::BTreeMap;

use geo::LineString;

use tc_core::{Attributes, CoreError, Crs, DemandPoint, LineFeature, LineId, PointId};
use tc_spatial::measure::{interpolate, line_length};
use tc_spatial::{project, Projector, SnapResult};

use crate::PipelineResult;

/// Scalar fields written next to each output line.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureSummary {
    pub line:       LineId,
    /// Length in metres, measured in the configured length frame.
    pub length:     f64,
    /// Latitude of the point halfway along the line.
    pub lat:        f64,
    /// Longitude of the point halfway along the line.
    pub lon:        f64,
    pub attributes: Attributes,
}

/// Summarize a line expressed in a metric frame.
pub fn summarize(line: &LineFeature, length_crs: Crs) -> PipelineResult<FeatureSummary> {
    let length = measured_length(&line.geometry, line.crs, length_crs)?;
    let mid = interpolate(&line.geometry, line_length(&line.geometry) / 2.0)
        .ok_or(CoreError::InvalidGeometry { line: line.id, reason: "no coordinates" })?;
    let geo = Projector::new(line.crs, Crs::Wgs84).project_coord(mid)?;
    Ok(FeatureSummary {
        line: line.id,
        length,
        lat: geo.y,
        lon: geo.x,
        attributes: line.attributes.clone(),
    })
}

/// Planar length of `ls` after reprojecting it from `crs` to `length_crs`.
pub fn measured_length(ls: &LineString<f64>, crs: Crs, length_crs: Crs) -> PipelineResult<f64> {
    if crs == length_crs {
        return Ok(line_length(ls));
    }
    Ok(line_length(&project(ls, crs, length_crs)?))
}

// ── Connectors ────────────────────────────────────────────────────────────────

/// A two-point line from a demand point to where it snapped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connector {
    pub point:    PointId,
    pub line:     LineId,
    pub geometry: LineString<f64>,
    pub crs:      Crs,
    /// Length in metres, measured in the configured length frame.
    pub length:   f64,
    /// Latitude of the demand point end.
    pub lat:      f64,
    /// Longitude of the demand point end.
    pub lon:      f64,
}

/// Connectors for `snaps` (working frame), reprojected to `output_crs`.
pub fn connectors(
    snaps:       &[SnapResult],
    working_crs: Crs,
    output_crs:  Crs,
    length_crs:  Crs,
) -> PipelineResult<Vec<Connector>> {
    let to_output = Projector::new(working_crs, output_crs);
    let to_geo = Projector::new(working_crs, Crs::Wgs84);
    snaps
        .iter()
        .map(|s| {
            let ls = LineString::new(vec![s.origin, s.snapped]);
            let geo = to_geo.project_coord(s.origin)?;
            Ok(Connector {
                point:    s.point,
                line:     s.line,
                length:   measured_length(&ls, working_crs, length_crs)?,
                geometry: to_output.project_line_string(&ls)?,
                crs:      output_crs,
                lat:      geo.y,
                lon:      geo.x,
            })
        })
        .collect()
}

// ── Snapped points ────────────────────────────────────────────────────────────

/// Demand points moved onto their snapped location, in snap-result order.
///
/// Each point keeps its own attributes, gains `line` (the matched line id),
/// and picks up any of the line's attributes it does not already carry.
/// `points` and `lines` are in `working_crs`; the output is in `output_crs`.
pub fn snapped_points(
    snaps:       &[SnapResult],
    points:      &[DemandPoint],
    lines:       &[LineFeature],
    working_crs: Crs,
    output_crs:  Crs,
) -> PipelineResult<Vec<DemandPoint>> {
    let point_of: BTreeMap<PointId, &DemandPoint> = points.iter().map(|p| (p.id, p)).collect();
    let attrs_of: BTreeMap<LineId, &Attributes> =
        lines.iter().map(|l| (l.id, &l.attributes)).collect();
    let to_output = Projector::new(working_crs, output_crs);

    snaps
        .iter()
        .filter_map(|s| point_of.get(&s.point).map(|p| (s, *p)))
        .map(|(s, p)| {
            let mut moved = p.relocated(s.snapped, working_crs);
            moved.attributes.insert("line".to_string(), s.line.0.to_string());
            if let Some(attrs) = attrs_of.get(&s.line) {
                for (k, v) in attrs.iter() {
                    moved.attributes.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
            Ok(to_output.project_point(&moved)?)
        })
        .collect()
}
