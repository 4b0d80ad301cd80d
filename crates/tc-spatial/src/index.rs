//! Bulk-loaded R-tree over line bounding boxes.
//!
//! # Query contract
//!
//! [`LineIndex::candidates`] returns every line whose bounding box meets the
//! query box.  The test is on boxes, not geometry, so callers get false
//! positives (a diagonal street's box covers a lot of empty space) but never
//! false negatives.  The snapper filters candidates by true distance.
//!
//! # Sharing
//!
//! The index borrows the line slice it was built from and is immutable after
//! construction, so `&LineIndex` is `Send + Sync` and every snap worker reads
//! the same tree without locking.

use geo::{BoundingRect, Rect};
use rstar::{RTree, RTreeObject, AABB};

use tc_core::{Crs, LineFeature, LineId};

use crate::measure::line_length;
use crate::{SpatialError, SpatialResult};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a line's bounding box and its slot in the
/// indexed slice.
#[derive(Clone)]
struct LineEntry {
    envelope: AABB<[f64; 2]>,
    slot:     usize,
}

impl RTreeObject for LineEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

#[inline]
fn to_aabb(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

// ── IndexPolicy ───────────────────────────────────────────────────────────────

/// What to do with a malformed line while building the index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndexPolicy {
    /// Fail the build with [`SpatialError::IndexBuild`].
    #[default]
    Strict,
    /// Leave the line out, log a warning, and record its id in
    /// [`LineIndex::skipped`].
    SkipInvalid,
}

// ── LineIndex ─────────────────────────────────────────────────────────────────

pub struct LineIndex<'a> {
    lines:   &'a [LineFeature],
    tree:    RTree<LineEntry>,
    crs:     Option<Crs>,
    skipped: Vec<LineId>,
}

impl<'a> LineIndex<'a> {
    /// Build with [`IndexPolicy::Strict`].
    pub fn build(lines: &'a [LineFeature]) -> SpatialResult<Self> {
        Self::build_with(lines, IndexPolicy::Strict)
    }

    /// Validate every line and bulk-load the tree.
    ///
    /// A line is malformed when it has fewer than two coordinates, a
    /// non-finite coordinate, or zero length.  All lines must share one
    /// reference frame.
    ///
    /// Time complexity: O(N log N) for the bulk load.
    pub fn build_with(lines: &'a [LineFeature], policy: IndexPolicy) -> SpatialResult<Self> {
        let crs = lines.first().map(|l| l.crs);
        let mut entries = Vec::with_capacity(lines.len());
        let mut skipped = Vec::new();

        for (slot, line) in lines.iter().enumerate() {
            if let Some(expected) = crs {
                if line.crs != expected {
                    return Err(SpatialError::CrsMismatch {
                        expected,
                        found: line.crs,
                        what: format!("line {}", line.id),
                    });
                }
            }

            match entry_for(line, slot) {
                Ok(entry) => entries.push(entry),
                Err(reason) => match policy {
                    IndexPolicy::Strict => {
                        return Err(SpatialError::IndexBuild { line: line.id, reason });
                    }
                    IndexPolicy::SkipInvalid => {
                        log::warn!("Skipping line {} while indexing: {reason}", line.id);
                        skipped.push(line.id);
                    }
                },
            }
        }

        log::debug!(
            "Indexed {} of {} lines ({} skipped)",
            entries.len(),
            lines.len(),
            skipped.len()
        );

        Ok(Self {
            lines,
            tree: RTree::bulk_load(entries),
            crs,
            skipped,
        })
    }

    /// Ids of every indexed line whose bounding box intersects `bbox`,
    /// ascending.
    pub fn candidates(&self, bbox: Rect<f64>) -> Vec<LineId> {
        let mut ids: Vec<LineId> = self.candidate_lines(bbox).map(|l| l.id).collect();
        ids.sort_unstable();
        ids
    }

    /// Same query as [`candidates`](Self::candidates) but yields the lines
    /// themselves, in tree order.
    pub fn candidate_lines(&self, bbox: Rect<f64>) -> impl Iterator<Item = &'a LineFeature> + '_ {
        let lines = self.lines;
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(bbox))
            .map(move |e| &lines[e.slot])
    }

    /// The slice this index was built over (skipped lines included).
    pub fn lines(&self) -> &'a [LineFeature] {
        self.lines
    }

    /// Reference frame of the indexed lines; `None` when built from nothing.
    pub fn crs(&self) -> Option<Crs> {
        self.crs
    }

    /// Lines left out under [`IndexPolicy::SkipInvalid`].
    pub fn skipped(&self) -> &[LineId] {
        &self.skipped
    }

    /// Number of indexed lines.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

fn entry_for(line: &LineFeature, slot: usize) -> Result<LineEntry, &'static str> {
    if let Err(tc_core::CoreError::InvalidGeometry { reason, .. }) = line.validate() {
        return Err(reason);
    }
    if line_length(&line.geometry) == 0.0 {
        return Err("zero-length line");
    }
    let rect = line.geometry.bounding_rect().ok_or("empty geometry")?;
    Ok(LineEntry { envelope: to_aabb(rect), slot })
}
