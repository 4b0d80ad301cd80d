//! The undirected line graph and its node lookup.

use std::collections::BTreeSet;

use geo::Coord;
use rustc_hash::{FxHashMap, FxHashSet};

use tc_core::{LineId, NodeId};

use crate::key::{NodeKey, Quantizer};
use crate::{GraphError, GraphResult};

// ── Edge ──────────────────────────────────────────────────────────────────────

/// An undirected edge between the endpoint nodes of one line.
///
/// `source`/`target` preserve the line's direction for display; identity
/// is the unordered pair returned by [`Edge::pair`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Line this edge was built from.
    pub line:   LineId,
    /// Length of that line in its working frame.
    pub length: f64,
}

impl Edge {
    /// Unordered identity: the smaller id first.
    #[inline]
    pub fn pair(&self) -> (NodeId, NodeId) {
        normalize(self.source, self.target)
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

#[inline]
pub(crate) fn normalize(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ── NodeLookup ────────────────────────────────────────────────────────────────

/// Bijection between [`NodeKey`]s and [`NodeId`]s.
///
/// Ids are dense and minted in first-seen order, so `NodeId(i)` indexes
/// `keys[i]` and `coords[i]`.  The stored coordinate is the first exact
/// coordinate seen for the key; later coordinates in the same cell do not
/// move the node.
#[derive(Clone, Debug, Default)]
pub struct NodeLookup {
    ids:    FxHashMap<NodeKey, NodeId>,
    keys:   Vec<NodeKey>,
    coords: Vec<Coord<f64>>,
}

impl NodeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing id for `key`, or a fresh one located at `coord`.
    pub fn intern(&mut self, key: NodeKey, coord: Coord<f64>) -> NodeId {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = NodeId(self.keys.len() as u32);
        self.ids.insert(key, id);
        self.keys.push(key);
        self.coords.push(coord);
        id
    }

    pub fn id_of(&self, key: &NodeKey) -> Option<NodeId> {
        self.ids.get(key).copied()
    }

    pub fn key_of(&self, id: NodeId) -> Option<NodeKey> {
        self.keys.get(id.index()).copied()
    }

    pub fn coord_of(&self, id: NodeId) -> Option<Coord<f64>> {
        self.coords.get(id.index()).copied()
    }

    /// Like [`coord_of`](Self::coord_of) but an unknown id is an error.
    pub fn require(&self, id: NodeId) -> GraphResult<Coord<f64>> {
        self.coord_of(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `(id, key, coord)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeKey, Coord<f64>)> + '_ {
        self.keys
            .iter()
            .zip(&self.coords)
            .enumerate()
            .map(|(i, (&k, &c))| (NodeId(i as u32), k, c))
    }
}

// ── SolvedEdgeSet ─────────────────────────────────────────────────────────────

/// The edges an optimizer chose to keep, as node-id pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolvedEdgeSet {
    pairs: Vec<(NodeId, NodeId)>,
}

impl SolvedEdgeSet {
    pub fn new(pairs: Vec<(NodeId, NodeId)>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, a: NodeId, b: NodeId) -> bool {
        let want = normalize(a, b);
        self.pairs.iter().any(|&(x, y)| normalize(x, y) == want)
    }
}

impl FromIterator<(NodeId, NodeId)> for SolvedEdgeSet {
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeId)>>(iter: I) -> Self {
        Self { pairs: iter.into_iter().collect() }
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// An undirected graph whose nodes are quantized line endpoints.
///
/// Built by [`GraphBuilder`](crate::GraphBuilder); read-only afterwards.
#[derive(Clone, Debug)]
pub struct Graph {
    pub(crate) quantizer:  Quantizer,
    pub(crate) lookup:     NodeLookup,
    pub(crate) edges:      Vec<Edge>,
    pub(crate) pairs:      FxHashSet<(NodeId, NodeId)>,
    pub(crate) self_loops: Vec<LineId>,
    pub(crate) duplicates: usize,
}

impl Graph {
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    pub fn lookup(&self) -> &NodeLookup {
        &self.lookup
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.lookup.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Lines whose two endpoints quantized to the same node.
    pub fn self_loops(&self) -> &[LineId] {
        &self.self_loops
    }

    /// Lines dropped because their node pair already had an edge.
    pub fn duplicate_edges(&self) -> usize {
        self.duplicates
    }

    /// Node whose cell contains `coord`, if any.
    pub fn node_at(&self, coord: Coord<f64>) -> Option<NodeId> {
        self.lookup.id_of(&self.quantizer.key(coord))
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.pairs.contains(&normalize(a, b))
    }

    /// Nodes at the given coordinates.  Coordinates that do not fall on any
    /// node are skipped.
    pub fn demand_nodes<I>(&self, coords: I) -> BTreeSet<NodeId>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        coords.into_iter().filter_map(|c| self.node_at(c)).collect()
    }

    /// Check that every solved pair is an edge of this graph.
    pub fn check_subset(&self, solved: &SolvedEdgeSet) -> GraphResult<()> {
        for &(a, b) in solved.pairs() {
            for id in [a, b] {
                if id.index() >= self.lookup.len() {
                    return Err(GraphError::UnknownNode(id));
                }
            }
            if !self.contains_edge(a, b) {
                return Err(GraphError::NotAnEdge(a, b));
            }
        }
        Ok(())
    }
}
