//! Cutting lines at snapped points.
//!
//! A cut is located by projecting the snapped coordinate back onto the line
//! and clamping the resulting offset to `[0, length]`.  Cuts that land on
//! the line's ends, or within [`CUT_TOLERANCE`] of another cut, do not
//! produce extra pieces.  A cut within tolerance of an interior vertex cuts
//! exactly at that vertex, so no near-duplicate coordinates are introduced.
//!
//! Joining the pieces back together (dropping each shared joint once)
//! gives the original coordinate sequence with the cut coordinates
//! inserted.

use std::collections::BTreeMap;

use geo::{Coord, LineString};

use tc_core::{LineFeature, LineId};

use crate::measure::{line_length, locate, vertex_offsets};
use crate::snapper::SnapResult;

/// Offsets along a line closer than this (metres) are one cut.
pub const CUT_TOLERANCE: f64 = 1e-7;

/// Lines partitioned by whether any point snapped onto them.
#[derive(Clone, Debug, Default)]
pub struct SplitOutcome {
    /// Lines with no snapped point, in input order.
    pub untouched: Vec<LineFeature>,
    /// Pieces of lines with at least one snapped point, in input order of
    /// the parent and start-to-end order within a parent.
    pub pieces: Vec<LineFeature>,
    /// How many input lines had at least one snapped point.
    pub split_lines: usize,
}

impl SplitOutcome {
    /// Untouched lines followed by pieces: the fixed order the graph
    /// builder consumes.
    pub fn all_lines(&self) -> impl Iterator<Item = &LineFeature> {
        self.untouched.iter().chain(self.pieces.iter())
    }

    pub fn line_count(&self) -> usize {
        self.untouched.len() + self.pieces.len()
    }
}

/// Cut `line` at each of `cuts`.
///
/// With no effective cut the result is a single clone of `line`.  Every
/// piece keeps the parent's id, frame, and attributes.
pub fn split(line: &LineFeature, cuts: &[Coord<f64>]) -> Vec<LineFeature> {
    let ls = &line.geometry;
    let total = line_length(ls);
    if ls.0.len() < 2 || total == 0.0 {
        return vec![line.clone()];
    }

    let mut offsets: Vec<f64> = cuts
        .iter()
        .filter_map(|&c| locate(ls, c))
        .map(|loc| loc.offset.clamp(0.0, total))
        .filter(|&off| off > CUT_TOLERANCE && off < total - CUT_TOLERANCE)
        .collect();
    offsets.sort_by(f64::total_cmp);
    offsets.dedup_by(|later, earlier| *later - *earlier <= CUT_TOLERANCE);

    if offsets.is_empty() {
        return vec![line.clone()];
    }

    cut_at_offsets(ls, &offsets)
        .into_iter()
        .map(|piece| line.derive(piece, line.crs))
        .collect()
}

/// Split every line that has snap results, pass the rest through.
pub fn split_snapped(lines: &[LineFeature], snaps: &[SnapResult]) -> SplitOutcome {
    let mut cuts_by_line: BTreeMap<LineId, Vec<Coord<f64>>> = BTreeMap::new();
    for s in snaps {
        cuts_by_line.entry(s.line).or_default().push(s.snapped);
    }

    let mut outcome = SplitOutcome::default();
    for line in lines {
        match cuts_by_line.get(&line.id) {
            Some(cuts) => {
                outcome.split_lines += 1;
                outcome.pieces.extend(split(line, cuts));
            }
            None => outcome.untouched.push(line.clone()),
        }
    }

    log::info!(
        "Split {} line(s) into {} piece(s); {} line(s) untouched",
        outcome.split_lines,
        outcome.pieces.len(),
        outcome.untouched.len()
    );
    outcome
}

/// Walk the line once, closing a piece at every cut.  `offsets` must be
/// sorted, deduplicated, and strictly inside `(0, length)`.
fn cut_at_offsets(ls: &LineString<f64>, offsets: &[f64]) -> Vec<LineString<f64>> {
    let coords = &ls.0;
    let at = vertex_offsets(ls);
    let last = coords.len() - 1;

    let mut pieces = Vec::with_capacity(offsets.len() + 1);
    let mut current = vec![coords[0]];
    let mut cuts = offsets.iter().copied().peekable();

    for i in 1..coords.len() {
        let (a, b) = (coords[i - 1], coords[i]);
        let (start, end) = (at[i - 1], at[i]);

        // Cuts strictly inside this segment.
        while let Some(&cut) = cuts.peek() {
            if cut >= end - CUT_TOLERANCE {
                break;
            }
            let t = (cut - start) / (end - start);
            let p = Coord {
                x: a.x + t * (b.x - a.x),
                y: a.y + t * (b.y - a.y),
            };
            current.push(p);
            pieces.push(LineString::new(std::mem::replace(&mut current, vec![p])));
            cuts.next();
        }

        current.push(b);

        // A cut on this vertex.
        if i < last {
            if let Some(&cut) = cuts.peek() {
                if (cut - end).abs() <= CUT_TOLERANCE {
                    pieces.push(LineString::new(std::mem::replace(&mut current, vec![b])));
                    cuts.next();
                }
            }
        }
    }

    pieces.push(LineString::new(current));
    pieces
}
