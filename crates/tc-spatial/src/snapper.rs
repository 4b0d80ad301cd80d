//! Parallel nearest-line snapping.
//!
//! # Algorithm
//!
//! ```text
//! points ─► split into N contiguous chunks (N = worker count)
//!        ─► per chunk, on its own pool thread:
//!             for each point:
//!               box      = point ± search_margin
//!               cands    = index.candidate_lines(box)
//!               best     = argmin over cands of (distance, line id)
//!        ─► blocking join, concatenate chunk results in chunk order
//! ```
//!
//! # Determinism
//!
//! The winner for a point depends only on the point, the index, and the
//! config: ties on distance go to the lowest [`LineId`], and ties inside a
//! line go to the earliest segment (see [`locate`]).  Worker count and chunk
//! boundaries only change the *order* of the merged results, never the set.
//!
//! # Failure
//!
//! The first worker error (a non-finite point, a missed deadline) fails the
//! whole call.  Other workers notice the abort flag and stop early; their
//! partial results are dropped.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use geo::Coord;
use rayon::prelude::*;

use tc_core::{DemandPoint, LineId, PointId};

use crate::index::LineIndex;
use crate::measure::{locate, point_query_box};
use crate::{SpatialError, SpatialResult};

// ── SnapConfig ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapConfig {
    /// Half-width of the query box around each point, in working-frame
    /// metres.  Default: 1000.
    pub search_margin: f64,

    /// Discard candidates farther than this even if their box matched.
    /// `None` keeps the nearest candidate whatever its distance.
    pub max_distance: Option<f64>,

    /// Worker thread count.  `None` uses all logical cores.
    pub workers: Option<usize>,

    /// Abort with [`SpatialError::SnapTimeout`] once this much wall time
    /// has elapsed.  `None` waits indefinitely.
    pub deadline: Option<Duration>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            search_margin: 1_000.0,
            max_distance:  None,
            workers:       None,
            deadline:      None,
        }
    }
}

impl SnapConfig {
    pub fn with_margin(search_margin: f64) -> Self {
        Self { search_margin, ..Self::default() }
    }

    pub fn validate(&self) -> SpatialResult<()> {
        if !self.search_margin.is_finite() || self.search_margin < 0.0 {
            return Err(SpatialError::Config(format!(
                "search_margin must be a finite non-negative number, got {}",
                self.search_margin
            )));
        }
        if let Some(max) = self.max_distance {
            if max.is_nan() || max < 0.0 {
                return Err(SpatialError::Config(format!(
                    "max_distance must be non-negative, got {max}"
                )));
            }
        }
        if self.workers == Some(0) {
            return Err(SpatialError::Config("workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolved worker count for `point_count` points (never more workers
    /// than points, never fewer than one).
    pub fn worker_count(&self, point_count: usize) -> usize {
        let wanted = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        });
        wanted.clamp(1, point_count.max(1))
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// One demand point attached to its nearest line.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapResult {
    pub point: PointId,
    pub line: LineId,
    /// The demand point's original (working-frame) location.
    pub origin: Coord<f64>,
    /// Closest location on `line`.
    pub snapped: Coord<f64>,
    /// Euclidean distance from `origin` to `snapped`.
    pub distance: f64,
    /// Distance along `line` from its first coordinate to `snapped`.
    pub offset: f64,
}

/// Everything a `snap` call produced.
#[derive(Clone, Debug, Default)]
pub struct SnapOutcome {
    /// Chunk-ordered results: all of chunk 0, then chunk 1, ….
    pub results: Vec<SnapResult>,
    /// Points with no candidate inside the margin (or within
    /// `max_distance`).
    pub unsnapped: Vec<PointId>,
    /// Number of chunks the points were split into.
    pub chunks: usize,
}

impl SnapOutcome {
    pub fn snapped_count(&self) -> usize {
        self.results.len()
    }

    /// Results grouped by line, lines ascending, each group in result order.
    pub fn by_line(&self) -> BTreeMap<LineId, Vec<&SnapResult>> {
        let mut groups: BTreeMap<LineId, Vec<&SnapResult>> = BTreeMap::new();
        for r in &self.results {
            groups.entry(r.line).or_default().push(r);
        }
        groups
    }

    /// Results sorted by point id; the canonical form for comparisons.
    pub fn sorted(&self) -> Vec<SnapResult> {
        let mut sorted = self.results.clone();
        sorted.sort_by_key(|r| r.point);
        sorted
    }
}

/// What one chunk hands back to the merge step.
#[derive(Default)]
struct ChunkOutcome {
    results:   Vec<SnapResult>,
    unsnapped: Vec<PointId>,
    /// `false` when the chunk stopped early because another one failed.
    finished:  bool,
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Snap every point to its nearest indexed line using a dedicated pool of
/// [`SnapConfig::worker_count`] threads.
///
/// # Errors
///
/// - [`SpatialError::Config`] for an invalid config.
/// - [`SpatialError::CrsMismatch`] if a point and the index disagree on frame.
/// - [`SpatialError::InvalidPoint`] for a non-finite point.
/// - [`SpatialError::SnapTimeout`] when the deadline passes.
/// - [`SpatialError::WorkerPool`] if the thread pool cannot start.
pub fn snap(
    points: &[DemandPoint],
    index:  &LineIndex<'_>,
    config: &SnapConfig,
) -> SpatialResult<SnapOutcome> {
    let expires = config.deadline.map(|d| Instant::now() + d);
    snap_until(points, index, config, &|_| expires.is_some_and(|at| Instant::now() >= at))
}

/// [`snap`] with the deadline test supplied by the caller.  `expired` is
/// asked with the chunk number before each point is snapped.
pub(crate) fn snap_until(
    points:  &[DemandPoint],
    index:   &LineIndex<'_>,
    config:  &SnapConfig,
    expired: &(dyn Fn(usize) -> bool + Sync),
) -> SpatialResult<SnapOutcome> {
    config.validate()?;

    if points.is_empty() {
        return Ok(SnapOutcome::default());
    }
    if let Some(expected) = index.crs() {
        if let Some(p) = points.iter().find(|p| p.crs != expected) {
            return Err(SpatialError::CrsMismatch {
                expected,
                found: p.crs,
                what: format!("demand point {}", p.id),
            });
        }
    }

    let workers    = config.worker_count(points.len());
    let chunk_size = points.len().div_ceil(workers);
    let chunks     = points.len().div_ceil(chunk_size);

    log::info!(
        "Snapping {} points to {} lines: {} chunk(s) on {} worker(s), margin {} m",
        points.len(),
        index.len(),
        chunks,
        workers,
        config.search_margin
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("tc-snap-{i}"))
        .build()
        .map_err(|e| SpatialError::WorkerPool(e.to_string()))?;

    let started   = Instant::now();
    let completed = AtomicUsize::new(0);
    let abort     = AtomicBool::new(false);

    let merged: SpatialResult<Vec<ChunkOutcome>> = pool.install(|| {
        points
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk_no, chunk)| {
                let outcome = snap_chunk(chunk_no, chunk, index, config, expired, &abort);
                match &outcome {
                    Ok(o) if o.finished => {
                        completed.fetch_add(1, Ordering::SeqCst);
                        log::debug!(
                            "Chunk {chunk_no}: {} snapped, {} unsnapped",
                            o.results.len(),
                            o.unsnapped.len()
                        );
                    }
                    Ok(_) => {}
                    Err(_) => abort.store(true, Ordering::SeqCst),
                }
                outcome
            })
            .collect()
    });

    let merged = merged.map_err(|e| match e {
        SpatialError::SnapTimeout { deadline, .. } => {
            let done = completed.load(Ordering::SeqCst);
            SpatialError::SnapTimeout {
                completed:   done,
                outstanding: chunks.saturating_sub(done),
                deadline,
            }
        }
        other => other,
    })?;

    let mut outcome = SnapOutcome { chunks, ..SnapOutcome::default() };
    for part in merged {
        outcome.results.extend(part.results);
        outcome.unsnapped.extend(part.unsnapped);
    }

    log::info!(
        "Snapped {} of {} points in {:.2?} ({} unsnapped)",
        outcome.results.len(),
        points.len(),
        started.elapsed(),
        outcome.unsnapped.len()
    );
    Ok(outcome)
}

/// Snap a single point on the calling thread.
///
/// Returns `Ok(None)` when no line lies within the search margin.
pub fn snap_one(
    point:  &DemandPoint,
    index:  &LineIndex<'_>,
    config: &SnapConfig,
) -> SpatialResult<Option<SnapResult>> {
    let origin = point.coord();
    if !origin.x.is_finite() || !origin.y.is_finite() {
        return Err(SpatialError::InvalidPoint(point.id));
    }

    let query = point_query_box(origin, config.search_margin);
    let mut best: Option<SnapResult> = None;

    for line in index.candidate_lines(query) {
        let Some(loc) = locate(&line.geometry, origin) else {
            continue;
        };
        if config.max_distance.is_some_and(|max| loc.distance > max) {
            continue;
        }
        let better = match &best {
            None => true,
            Some(b) => (loc.distance, line.id) < (b.distance, b.line),
        };
        if better {
            best = Some(SnapResult {
                point:    point.id,
                line:     line.id,
                origin,
                snapped:  loc.coord,
                distance: loc.distance,
                offset:   loc.offset,
            });
        }
    }

    Ok(best)
}

// ── Worker ────────────────────────────────────────────────────────────────────

fn snap_chunk(
    chunk_no: usize,
    chunk:    &[DemandPoint],
    index:    &LineIndex<'_>,
    config:   &SnapConfig,
    expired:  &(dyn Fn(usize) -> bool + Sync),
    abort:    &AtomicBool,
) -> SpatialResult<ChunkOutcome> {
    let mut out = ChunkOutcome::default();

    for point in chunk {
        // Another chunk failed; this result will be discarded anyway.
        if abort.load(Ordering::Relaxed) {
            return Ok(out);
        }
        if expired(chunk_no) {
            let deadline = config.deadline.unwrap_or_default();
            return Err(SpatialError::SnapTimeout { completed: 0, outstanding: 0, deadline });
        }

        match snap_one(point, index, config)? {
            Some(r) => out.results.push(r),
            None => {
                log::trace!("Point {} has no line within {} m", point.id, config.search_margin);
                out.unsnapped.push(point.id);
            }
        }
    }

    out.finished = true;
    Ok(out)
}
