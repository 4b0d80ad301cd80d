//! Pipeline observer trait for progress reporting and diagnostics.

use std::fmt;
use std::time::Duration;

use tc_core::{LineId, PointId};

use crate::pipeline::RunReport;

/// The stages of one run, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Project,
    Index,
    Snap,
    Split,
    Graph,
    Solve,
    Materialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Project     => "project",
            Stage::Index       => "index",
            Stage::Snap        => "snap",
            Stage::Split       => "split",
            Stage::Graph       => "graph",
            Stage::Solve       => "solve",
            Stage::Materialize => "materialize",
        };
        f.write_str(name)
    }
}

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] as each
/// stage starts and finishes.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — collecting dropped points
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Dropped(Vec<PointId>);
///
/// impl PipelineObserver for Dropped {
///     fn on_unsnapped(&mut self, points: &[PointId]) {
///         self.0.extend_from_slice(points);
///     }
/// }
/// ```
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: Stage) {}

    /// `items` is the stage's main output count (lines projected, results
    /// snapped, edges built, …).
    fn on_stage_end(&mut self, _stage: Stage, _items: usize, _elapsed: Duration) {}

    /// Lines the index left out under [`IndexPolicy::SkipInvalid`].
    ///
    /// [`IndexPolicy::SkipInvalid`]: tc_spatial::IndexPolicy::SkipInvalid
    fn on_skipped_lines(&mut self, _lines: &[LineId]) {}

    /// Demand points with no line inside the search margin.
    fn on_unsnapped(&mut self, _points: &[PointId]) {}

    /// Lines whose endpoints quantized to the same node.
    fn on_self_loops(&mut self, _lines: &[LineId]) {}

    /// Called once after the run succeeds.
    fn on_finish(&mut self, _report: &RunReport) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// A [`PipelineObserver`] that forwards every callback to the `log` facade.
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_stage_start(&mut self, stage: Stage) {
        log::debug!("stage {stage}: started");
    }

    fn on_stage_end(&mut self, stage: Stage, items: usize, elapsed: Duration) {
        log::info!("stage {stage}: {items} item(s) in {:.3} s", elapsed.as_secs_f64());
    }

    fn on_skipped_lines(&mut self, lines: &[LineId]) {
        if !lines.is_empty() {
            log::warn!("{} malformed line(s) left out of the index", lines.len());
        }
    }

    fn on_unsnapped(&mut self, points: &[PointId]) {
        if !points.is_empty() {
            log::warn!("{} demand point(s) had no line within the search margin", points.len());
        }
    }

    fn on_self_loops(&mut self, lines: &[LineId]) {
        if !lines.is_empty() {
            log::warn!("{} self-loop line(s) in the graph", lines.len());
        }
    }

    fn on_finish(&mut self, report: &RunReport) {
        log::info!(
            "run complete: {} of {} point(s) snapped, {} node(s), {} edge(s), {} kept",
            report.snapped,
            report.points_in,
            report.nodes,
            report.edges,
            report.solved_edges
        );
    }
}
