//! Planar measurement along line strings.
//!
//! All functions assume a metric frame: distances are plain Euclidean and
//! offsets are metres from the first coordinate.  Length and interpolation
//! come from `geo`'s [`Euclidean`] metric space; [`locate`] walks the
//! segments itself so it can report the offset and break ties by segment
//! order.

use geo::{Coord, Euclidean, InterpolateLine, Length, Line, LineString, Rect};

/// Where a query coordinate lands on a line string.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineLocation {
    /// Closest coordinate on the line.
    pub coord: Coord<f64>,
    /// Distance from the query coordinate to `coord`.
    pub distance: f64,
    /// Distance along the line from its first coordinate to `coord`.
    pub offset: f64,
    /// Index of the segment containing `coord`.
    pub segment: usize,
}

/// Total planar length.
pub fn line_length(ls: &LineString<f64>) -> f64 {
    Euclidean.length(ls)
}

#[inline]
fn segment_length(seg: Line<f64>) -> f64 {
    Euclidean.length(&seg)
}

/// Closest location on `ls` to `p`.
///
/// Segments are scanned in order and only a strictly smaller distance
/// replaces the current best, so a point equidistant from two segments
/// resolves to the earlier one.  Returns `None` for an empty line string.
pub fn locate(ls: &LineString<f64>, p: Coord<f64>) -> Option<LineLocation> {
    let first = *ls.0.first()?;
    let mut best = LineLocation {
        coord:    first,
        distance: (p.x - first.x).hypot(p.y - first.y),
        offset:   0.0,
        segment:  0,
    };

    let mut walked = 0.0;
    for (i, seg) in ls.lines().enumerate() {
        let len2 = seg.dx() * seg.dx() + seg.dy() * seg.dy();
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((p.x - seg.start.x) * seg.dx() + (p.y - seg.start.y) * seg.dy()) / len2).clamp(0.0, 1.0)
        };
        let coord = Coord {
            x: seg.start.x + t * seg.dx(),
            y: seg.start.y + t * seg.dy(),
        };
        let distance = (p.x - coord.x).hypot(p.y - coord.y);
        let len = len2.sqrt();
        if distance < best.distance {
            best = LineLocation { coord, distance, offset: walked + t * len, segment: i };
        }
        walked += len;
    }
    Some(best)
}

/// Distances along the line of every vertex (`[0, …, length]`).
pub fn vertex_offsets(ls: &LineString<f64>) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(ls.0.len());
    let mut walked = 0.0;
    offsets.push(0.0);
    for seg in ls.lines() {
        walked += segment_length(seg);
        offsets.push(walked);
    }
    offsets.truncate(ls.0.len());
    offsets
}

/// Coordinate `offset` metres along the line, clamped to its ends.
/// Returns `None` for an empty line string.
pub fn interpolate(ls: &LineString<f64>, offset: f64) -> Option<Coord<f64>> {
    Euclidean.point_at_distance_from_start(ls, offset).map(|p| p.0)
}

/// Square query box of half-width `margin` around `c`.
pub fn point_query_box(c: Coord<f64>, margin: f64) -> Rect<f64> {
    Rect::new(
        Coord { x: c.x - margin, y: c.y - margin },
        Coord { x: c.x + margin, y: c.y + margin },
    )
}
