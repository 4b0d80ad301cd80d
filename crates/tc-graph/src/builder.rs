//! Graph construction from line endpoints.

use geo::{Coord, LineString};
use rustc_hash::FxHashSet;

use tc_core::{LineFeature, LineId, NodeId};
use tc_spatial::measure::line_length;

use crate::graph::{normalize, Edge, Graph, NodeLookup};
use crate::key::Quantizer;
use crate::GraphResult;

// ── GraphConfig ───────────────────────────────────────────────────────────────

/// Tunables for [`GraphBuilder`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Decimal digits kept when quantizing endpoints.  1 ⇒ 0.1 m nodes.
    pub precision: u32,

    /// Add an edge for lines whose endpoints share a node.  Self-loops are
    /// always recorded in [`Graph::self_loops`] either way.
    pub keep_self_loops: bool,

    /// Drop a line's edge when its node pair already has one.  The first
    /// line in input order keeps the edge.
    pub dedup_edges: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            precision:       1,
            keep_self_loops: true,
            dedup_edges:     true,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> GraphResult<()> {
        Quantizer::new(self.precision).map(|_| ())
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Incremental graph construction.
///
/// Lines are added in a fixed order; node ids are minted in the order their
/// keys are first seen (start endpoint before end endpoint), so the same
/// input always yields the same ids.
///
/// # Example
///
/// ```rust,ignore
/// let mut b = GraphBuilder::new(GraphConfig::default())?;
/// for line in outcome.all_lines() {
///     b.add_line(line);
/// }
/// let graph = b.build();
/// ```
pub struct GraphBuilder {
    config:     GraphConfig,
    quantizer:  Quantizer,
    lookup:     NodeLookup,
    edges:      Vec<Edge>,
    pairs:      FxHashSet<(NodeId, NodeId)>,
    self_loops: Vec<LineId>,
    duplicates: usize,
    skipped:    usize,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        let quantizer = Quantizer::new(config.precision)?;
        Ok(Self {
            config,
            quantizer,
            lookup:     NodeLookup::new(),
            edges:      Vec::new(),
            pairs:      FxHashSet::default(),
            self_loops: Vec::new(),
            duplicates: 0,
            skipped:    0,
        })
    }

    /// Node for `coord`, minting one if its key is new.
    pub fn node(&mut self, coord: Coord<f64>) -> NodeId {
        let key = self.quantizer.key(coord);
        self.lookup.intern(key, coord)
    }

    /// Add the edge between a line's two endpoints.
    ///
    /// Returns the edge's node pair, or `None` if the line has no
    /// coordinates or the edge was not kept (duplicate or discarded
    /// self-loop).
    pub fn add_line(&mut self, line: &LineFeature) -> Option<(NodeId, NodeId)> {
        self.add_part(line.id, &line.geometry)
    }

    /// Add every line of `lines` in iteration order.
    pub fn add_lines<'a, I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = &'a LineFeature>,
    {
        for line in lines {
            self.add_line(line);
        }
    }

    /// Add a multi-part line.  Each part contributes its own endpoint pair
    /// under its own keys; parts sharing an endpoint share that node.
    pub fn add_parts(&mut self, line: LineId, parts: &[LineString<f64>]) -> Vec<(NodeId, NodeId)> {
        parts.iter().filter_map(|part| self.add_part(line, part)).collect()
    }

    fn add_part(&mut self, line: LineId, ls: &LineString<f64>) -> Option<(NodeId, NodeId)> {
        let (Some(&start), Some(&end)) = (ls.0.first(), ls.0.last()) else {
            log::warn!("{line} has no coordinates; no edge added");
            self.skipped += 1;
            return None;
        };

        let source = self.node(start);
        let target = self.node(end);

        if source == target {
            log::warn!("{line} is a self-loop at {source}");
            self.self_loops.push(line);
            if !self.config.keep_self_loops {
                return None;
            }
        }

        let pair = normalize(source, target);
        if !self.pairs.insert(pair) && self.config.dedup_edges {
            log::debug!("{line} duplicates edge {} - {}", pair.0, pair.1);
            self.duplicates += 1;
            return None;
        }

        self.edges.push(Edge { source, target, line, length: line_length(ls) });
        Some((source, target))
    }

    pub fn build(self) -> Graph {
        log::info!(
            "Built graph: {} node(s), {} edge(s), {} self-loop(s), {} duplicate(s), {} empty line(s)",
            self.lookup.len(),
            self.edges.len(),
            self.self_loops.len(),
            self.duplicates,
            self.skipped
        );
        Graph {
            quantizer:  self.quantizer,
            lookup:     self.lookup,
            edges:      self.edges,
            pairs:      self.pairs,
            self_loops: self.self_loops,
            duplicates: self.duplicates,
        }
    }
}

/// Build a graph from `lines` in iteration order.
pub fn build_graph<'a, I>(lines: I, config: &GraphConfig) -> GraphResult<Graph>
where
    I: IntoIterator<Item = &'a LineFeature>,
{
    let mut builder = GraphBuilder::new(*config)?;
    builder.add_lines(lines);
    Ok(builder.build())
}
