//! Network optimizer trait and built-in implementations.
//!
//! # Pluggability
//!
//! The pipeline hands the graph to a [`NetworkOptimizer`] and gets back the
//! subset of edges to keep.  Real deployments plug in a prize-collecting
//! Steiner solver or an ILP model; the two built-ins cover tests and demos:
//!
//! | Optimizer               | Keeps                                           |
//! |-------------------------|-------------------------------------------------|
//! | [`KeepAllOptimizer`]    | every edge                                      |
//! | [`SteinerTreeOptimizer`]| shortest-path tree joining the demand nodes     |
//!
//! # Cost units
//!
//! [`SteinerTreeOptimizer`] works on integer millimetres so heap ordering is
//! total and ties break on [`NodeId`].

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use tc_core::NodeId;
use tc_graph::{Edge, NodeLookup, SolvedEdgeSet};

use crate::config::OptimizerParams;
use crate::{PipelineError, PipelineResult};

// ── OptimizerInput ────────────────────────────────────────────────────────────

/// Everything an optimizer may look at.  Borrowed from the pipeline for
/// the duration of one `solve` call.
#[derive(Copy, Clone, Debug)]
pub struct OptimizerInput<'a> {
    pub edges:        &'a [Edge],
    pub lookup:       &'a NodeLookup,
    pub demand_nodes: &'a BTreeSet<NodeId>,
    pub params:       &'a OptimizerParams,
}

// ── NetworkOptimizer trait ────────────────────────────────────────────────────

/// Chooses which graph edges make up the output network.
///
/// # Contract
///
/// The returned set must be a subset of `input.edges` (compared as
/// unordered node pairs).  The pipeline checks this before materializing
/// and fails the run with [`PipelineError::NotASubset`] otherwise.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one optimizer can serve runs on
/// several threads.
///
/// [`PipelineError::NotASubset`]: crate::PipelineError::NotASubset
pub trait NetworkOptimizer: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    fn solve(&self, input: &OptimizerInput<'_>) -> PipelineResult<SolvedEdgeSet>;
}

// ── KeepAllOptimizer ──────────────────────────────────────────────────────────

/// Returns every edge, in graph order.
pub struct KeepAllOptimizer;

impl NetworkOptimizer for KeepAllOptimizer {
    fn name(&self) -> &str {
        "keep-all"
    }

    fn solve(&self, input: &OptimizerInput<'_>) -> PipelineResult<SolvedEdgeSet> {
        Ok(input.edges.iter().map(|e| (e.source, e.target)).collect())
    }
}

// ── SteinerTreeOptimizer ──────────────────────────────────────────────────────

/// Shortest-path Steiner heuristic over edge length.
///
/// Starts a tree at the lowest demand node, then repeatedly attaches the
/// demand node closest to the current tree along its shortest path.  Demand
/// nodes in another connected component start a new tree, so the result is
/// a forest with one tree per component that holds demand.
pub struct SteinerTreeOptimizer;

impl NetworkOptimizer for SteinerTreeOptimizer {
    fn name(&self) -> &str {
        "steiner-tree"
    }

    fn solve(&self, input: &OptimizerInput<'_>) -> PipelineResult<SolvedEdgeSet> {
        let n = input.lookup.len();
        if let Some(id) = input.demand_nodes.iter().find(|id| id.index() >= n) {
            return Err(PipelineError::Optimizer {
                name:   self.name().to_string(),
                reason: format!("demand node {id} is not one of the graph's {n} nodes"),
            });
        }
        Ok(steiner_forest(input))
    }
}

/// Undirected adjacency: `adj[v]` = `(neighbour, edge index)`.
fn adjacency(node_count: usize, edges: &[Edge]) -> Vec<Vec<(NodeId, usize)>> {
    let mut adj = vec![Vec::new(); node_count];
    for (i, e) in edges.iter().enumerate() {
        if e.is_self_loop() {
            continue;
        }
        adj[e.source.index()].push((e.target, i));
        adj[e.target.index()].push((e.source, i));
    }
    adj
}

#[inline]
fn cost_mm(edge: &Edge) -> u64 {
    (edge.length * 1_000.0).round().max(0.0) as u64
}

fn steiner_forest(input: &OptimizerInput<'_>) -> SolvedEdgeSet {
    let n = input.lookup.len();
    let adj = adjacency(n, input.edges);

    let mut in_tree = vec![false; n];
    let mut chosen: Vec<usize> = Vec::new();
    let mut remaining: BTreeSet<NodeId> = input.demand_nodes.clone();

    // Seed a tree at the lowest outstanding demand node, grow it until no
    // more demand is reachable, repeat.
    while let Some(seed) = remaining.pop_first() {
        in_tree[seed.index()] = true;
        let mut tree = vec![seed];

        while !remaining.is_empty() {
            let Some((target, path)) = nearest_terminal(&adj, input.edges, &tree, &remaining, n)
            else {
                log::debug!(
                    "{} demand node(s) unreachable from the tree at {seed}",
                    remaining.len()
                );
                break;
            };
            for (node, edge) in path {
                if !in_tree[node.index()] {
                    in_tree[node.index()] = true;
                    tree.push(node);
                }
                chosen.push(edge);
                remaining.remove(&node);
            }
            remaining.remove(&target);
        }
    }

    chosen
        .into_iter()
        .map(|i| (input.edges[i].source, input.edges[i].target))
        .collect()
}

/// Multi-source Dijkstra from every tree node; stops at the first demand
/// node popped.  Returns it and the `(node, edge)` steps leading to it from
/// the tree, nearest the tree first.
fn nearest_terminal(
    adj:       &[Vec<(NodeId, usize)>],
    edges:     &[Edge],
    tree:      &[NodeId],
    remaining: &BTreeSet<NodeId>,
    n:         usize,
) -> Option<(NodeId, Vec<(NodeId, usize)>)> {
    let mut dist = vec![u64::MAX; n];
    let mut prev: Vec<Option<(NodeId, usize)>> = vec![None; n];

    // Min-heap: (cost, node).  NodeId breaks ties deterministically.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    for &t in tree {
        dist[t.index()] = 0;
        heap.push(Reverse((0, t)));
    }

    while let Some(Reverse((cost, node))) = heap.pop() {
        if cost > dist[node.index()] {
            continue;
        }
        if remaining.contains(&node) {
            let mut path = Vec::new();
            let mut cur = node;
            while let Some((from, edge)) = prev[cur.index()] {
                path.push((cur, edge));
                cur = from;
            }
            path.reverse();
            return Some((node, path));
        }
        for &(next, edge) in &adj[node.index()] {
            let new_cost = cost.saturating_add(cost_mm(&edges[edge]));
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev[next.index()] = Some((node, edge));
                heap.push(Reverse((new_cost, next)));
            }
        }
    }
    None
}
