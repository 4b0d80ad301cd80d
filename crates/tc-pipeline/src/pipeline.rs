//! The stage orchestrator.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use tc_core::{Attributes, DemandPoint, LineFeature, LineId, NodeId};
use tc_graph::{build_graph, materialize, Graph, GraphError, SolvedEdgeSet};
use tc_spatial::{snap, split_snapped, LineIndex, Projector, SnapOutcome, SplitOutcome};

use crate::config::PipelineConfig;
use crate::observer::{PipelineObserver, Stage};
use crate::optimizer::{NetworkOptimizer, OptimizerInput};
use crate::summary::{connectors, snapped_points, summarize, Connector, FeatureSummary};
use crate::{PipelineError, PipelineResult};

// ── Outputs ───────────────────────────────────────────────────────────────────

/// Counts from one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub lines_in:        usize,
    pub points_in:       usize,
    pub skipped_lines:   usize,
    pub snapped:         usize,
    pub unsnapped:       usize,
    pub split_lines:     usize,
    pub pieces:          usize,
    pub nodes:           usize,
    pub edges:           usize,
    pub self_loops:      usize,
    pub duplicate_edges: usize,
    pub demand_nodes:    usize,
    pub solved_edges:    usize,
}

/// Everything up to (not including) the optimizer, in the working frame.
#[derive(Clone, Debug)]
pub struct PreparedNetwork {
    pub lines_in:      usize,
    /// Indexed lines, projected.  Lines skipped by the index are not here.
    pub lines:         Vec<LineFeature>,
    pub points_in:     usize,
    /// Demand points, projected.
    pub points:        Vec<DemandPoint>,
    pub skipped_lines: Vec<LineId>,
    pub snaps:         SnapOutcome,
    pub split:         SplitOutcome,
    pub graph:         Graph,
    pub demand_nodes:  BTreeSet<NodeId>,
}

/// What a run hands to writers.  Geometry is in the source frame.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// One straight line per kept edge.
    pub solution:   Vec<LineFeature>,
    /// Scalar fields for each `solution` line, same order.
    pub summaries:      Vec<FeatureSummary>,
    /// Demand point → snapped location, one per snapped point.
    pub connectors:     Vec<Connector>,
    /// Snapped demand points at their new location, tagged with the
    /// matched line.  Same order as `connectors`.
    pub snapped_points: Vec<DemandPoint>,
    pub report:         RunReport,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Runs the full geometry → graph → geometry transform.
///
/// Build with [`PipelineBuilder`](crate::PipelineBuilder).  A pipeline holds
/// only configuration and the optimizer; every run owns its own index,
/// lookup, and counters, so one pipeline can serve concurrent runs.
///
/// # Stages
///
/// ```text
/// project ─► index ─► snap ─► split ─► graph ─► solve ─► materialize
///  (source → working)                                    (working → source)
/// ```
pub struct Pipeline<O: NetworkOptimizer> {
    pub(crate) config:    PipelineConfig,
    pub(crate) optimizer: O,
}

impl<O: NetworkOptimizer> Pipeline<O> {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Run every stage.
    pub fn run<Obs: PipelineObserver + ?Sized>(
        &self,
        lines:    &[LineFeature],
        points:   &[DemandPoint],
        observer: &mut Obs,
    ) -> PipelineResult<PipelineOutput> {
        let prepared = self.prepare(lines, points, observer)?;
        let solved = self.solve(&prepared, observer)?;
        let output = self.finish(&prepared, &solved, observer)?;
        observer.on_finish(&output.report);
        Ok(output)
    }

    /// Project, index, snap, split, and build the graph.
    pub fn prepare<Obs: PipelineObserver + ?Sized>(
        &self,
        lines:    &[LineFeature],
        points:   &[DemandPoint],
        observer: &mut Obs,
    ) -> PipelineResult<PreparedNetwork> {
        let cfg = &self.config;
        let to_working = Projector::new(cfg.source_crs, cfg.working_crs);

        let lines_in = lines.len();
        let (mut lines, points) = timed(
            observer,
            Stage::Project,
            || Ok((to_working.project_lines(lines)?, to_working.project_points(points)?)),
            |(l, _)| l.len(),
        )?;

        // The index borrows `lines`; keep it scoped to the snap stage.
        let (skipped_lines, snaps) = {
            let index = timed(
                observer,
                Stage::Index,
                || Ok(LineIndex::build_with(&lines, cfg.index_policy)?),
                LineIndex::len,
            )?;
            let skipped = index.skipped().to_vec();
            observer.on_skipped_lines(&skipped);

            let snaps = timed(
                observer,
                Stage::Snap,
                || Ok(snap(&points, &index, &cfg.snap)?),
                SnapOutcome::snapped_count,
            )?;
            observer.on_unsnapped(&snaps.unsnapped);
            (skipped, snaps)
        };

        if !skipped_lines.is_empty() {
            let skip: BTreeSet<LineId> = skipped_lines.iter().copied().collect();
            lines.retain(|l| !skip.contains(&l.id));
        }

        let split = timed(
            observer,
            Stage::Split,
            || Ok(split_snapped(&lines, &snaps.results)),
            SplitOutcome::line_count,
        )?;

        let graph = timed(
            observer,
            Stage::Graph,
            || Ok(build_graph(split.all_lines(), &cfg.graph)?),
            Graph::edge_count,
        )?;
        observer.on_self_loops(graph.self_loops());

        let demand_nodes = graph.demand_nodes(snaps.results.iter().map(|s| s.snapped));
        if demand_nodes.len() < snaps.results.len() {
            log::debug!(
                "{} snapped point(s) share {} demand node(s)",
                snaps.results.len(),
                demand_nodes.len()
            );
        }

        Ok(PreparedNetwork {
            lines_in,
            lines,
            points_in: points.len(),
            points,
            skipped_lines,
            snaps,
            split,
            graph,
            demand_nodes,
        })
    }

    /// Hand the graph to the optimizer and check its answer.
    pub fn solve<Obs: PipelineObserver + ?Sized>(
        &self,
        prepared: &PreparedNetwork,
        observer: &mut Obs,
    ) -> PipelineResult<SolvedEdgeSet> {
        let input = OptimizerInput {
            edges:        prepared.graph.edges(),
            lookup:       prepared.graph.lookup(),
            demand_nodes: &prepared.demand_nodes,
            params:       &self.config.optimizer,
        };

        let solved = timed(
            observer,
            Stage::Solve,
            || self.optimizer.solve(&input),
            SolvedEdgeSet::len,
        )?;

        prepared.graph.check_subset(&solved).map_err(|e| match e {
            GraphError::NotAnEdge(a, b) => PipelineError::NotASubset(a, b),
            other => other.into(),
        })?;

        log::info!(
            "Optimizer `{}` kept {} of {} edge(s)",
            self.optimizer.name(),
            solved.len(),
            prepared.graph.edge_count()
        );
        Ok(solved)
    }

    /// Materialize the solved edges, summarize them, and reproject the
    /// output to the source frame.
    pub fn finish<Obs: PipelineObserver + ?Sized>(
        &self,
        prepared: &PreparedNetwork,
        solved:   &SolvedEdgeSet,
        observer: &mut Obs,
    ) -> PipelineResult<PipelineOutput> {
        let cfg = &self.config;

        let (solution, summaries, connectors, snapped_points) = timed(
            observer,
            Stage::Materialize,
            || {
                let mut working = materialize(solved, prepared.graph.lookup(), cfg.working_crs)?;
                carry_attributes(&mut working, solved, prepared);

                let summaries = working
                    .iter()
                    .map(|l| summarize(l, cfg.length_crs))
                    .collect::<PipelineResult<Vec<_>>>()?;

                let to_source = Projector::new(cfg.working_crs, cfg.source_crs);
                let solution = to_source.project_lines(&working)?;
                let connectors = connectors(
                    &prepared.snaps.results,
                    cfg.working_crs,
                    cfg.source_crs,
                    cfg.length_crs,
                )?;
                let snapped_points = snapped_points(
                    &prepared.snaps.results,
                    &prepared.points,
                    &prepared.lines,
                    cfg.working_crs,
                    cfg.source_crs,
                )?;
                Ok((solution, summaries, connectors, snapped_points))
            },
            |(s, _, _, _)| s.len(),
        )?;

        let graph = &prepared.graph;
        let report = RunReport {
            lines_in:        prepared.lines_in,
            points_in:       prepared.points_in,
            skipped_lines:   prepared.skipped_lines.len(),
            snapped:         prepared.snaps.snapped_count(),
            unsnapped:       prepared.snaps.unsnapped.len(),
            split_lines:     prepared.split.split_lines,
            pieces:          prepared.split.pieces.len(),
            nodes:           graph.node_count(),
            edges:           graph.edge_count(),
            self_loops:      graph.self_loops().len(),
            duplicate_edges: graph.duplicate_edges(),
            demand_nodes:    prepared.demand_nodes.len(),
            solved_edges:    solved.len(),
        };

        Ok(PipelineOutput { solution, summaries, connectors, snapped_points, report })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Run one stage between observer callbacks.
fn timed<Obs, T>(
    observer: &mut Obs,
    stage:    Stage,
    f:        impl FnOnce() -> PipelineResult<T>,
    count:    impl FnOnce(&T) -> usize,
) -> PipelineResult<T>
where
    Obs: PipelineObserver + ?Sized,
{
    observer.on_stage_start(stage);
    let t0 = Instant::now();
    let out = f()?;
    observer.on_stage_end(stage, count(&out), t0.elapsed());
    Ok(out)
}

/// Copy the source line's attributes onto each materialized edge and tag
/// it with the line id.  Attributes set by `materialize` win.
fn carry_attributes(out: &mut [LineFeature], solved: &SolvedEdgeSet, prepared: &PreparedNetwork) {
    let mut line_of: BTreeMap<(NodeId, NodeId), LineId> = BTreeMap::new();
    for e in prepared.graph.edges() {
        line_of.entry(e.pair()).or_insert(e.line);
    }
    let attrs_of: BTreeMap<LineId, &Attributes> =
        prepared.lines.iter().map(|l| (l.id, &l.attributes)).collect();

    for (feature, &(a, b)) in out.iter_mut().zip(solved.pairs()) {
        let pair = if a <= b { (a, b) } else { (b, a) };
        let Some(&line) = line_of.get(&pair) else {
            continue;
        };
        feature.attributes.entry("line".to_string()).or_insert_with(|| line.0.to_string());
        if let Some(attrs) = attrs_of.get(&line) {
            for (k, v) in attrs.iter() {
                feature.attributes.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
    }
}
