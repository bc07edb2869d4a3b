//! # Labeled Graphs
//!
//! The graph data model shared by datasets, queries and pattern bodies.
//!
//! A [`Graph`] owns a node map (`NodeId -> Label`) and an ordered edge list.
//! The edge list is the single source of truth: [`Adjacency`] is derived from
//! it on demand and never stored inside the graph, so the two cannot diverge.
//!
//! [`CanonicalGraph`] is the sorted, exact-labeling form used as the
//! deduplication signature.

use crate::{GraphId, Label, MotifdexError, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// EDGE
// =============================================================================

/// An undirected labeled edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: Label,
}

impl Edge {
    #[must_use]
    pub const fn new(source: NodeId, target: NodeId, label: Label) -> Self {
        Self {
            source,
            target,
            label,
        }
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// A labeled, undirected graph.
///
/// Built through `add_node`/`add_edge` and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    id: GraphId,
    nodes: BTreeMap<NodeId, Label>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new(id: GraphId) -> Self {
        Self {
            id,
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Re-assign the graph identity (deduplication renumbers survivors).
    pub fn set_id(&mut self, id: GraphId) {
        self.id = id;
    }

    /// Add a node. Fails if the id is already present.
    pub fn add_node(&mut self, node: NodeId, label: Label) -> Result<(), MotifdexError> {
        if self.nodes.contains_key(&node) {
            return Err(MotifdexError::DuplicateNode(node));
        }
        self.nodes.insert(node, label);
        Ok(())
    }

    /// Add an edge. Fails with the first endpoint that is not a node of this
    /// graph; the error carries line 0 because no source line exists.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        label: Label,
    ) -> Result<(), MotifdexError> {
        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(MotifdexError::DanglingEdge {
                    line: 0,
                    node: endpoint,
                });
            }
        }
        self.edges.push(Edge::new(source, target, label));
        Ok(())
    }

    /// Label of a node, if present.
    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<Label> {
        self.nodes.get(&node).copied()
    }

    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Label)> + '_ {
        self.nodes.iter().map(|(id, label)| (*id, *label))
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Derive the indexed adjacency structure from the edge list.
    #[must_use]
    pub fn adjacency(&self) -> Adjacency {
        Adjacency::from_graph(self)
    }

    /// The exact-labeling canonical form of this graph.
    #[must_use]
    pub fn canonical(&self) -> CanonicalGraph {
        CanonicalGraph::from_graph(self)
    }

    /// Copy of this graph without the edge at `index` (nodes are kept).
    #[must_use]
    pub fn without_edge(&self, index: usize) -> Graph {
        let mut copy = self.clone();
        if index < copy.edges.len() {
            copy.edges.remove(index);
        }
        copy
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Graph(id={}, nodes={}, edges={})",
            self.id,
            self.node_count(),
            self.edge_count()
        )
    }
}

// =============================================================================
// ADJACENCY (derived)
// =============================================================================

/// Index-based adjacency view of a [`Graph`].
///
/// Nodes are renumbered `0..n` in ascending `NodeId` order. Neighbor lists
/// hold distinct, non-self neighbors in order of first appearance in the edge
/// list. Every edge label between a pair is kept, in insertion order.
#[derive(Debug, Clone)]
pub struct Adjacency {
    ids: Vec<NodeId>,
    labels: Vec<Label>,
    neighbors: Vec<Vec<usize>>,
    edge_labels: BTreeMap<(usize, usize), Vec<Label>>,
}

impl Adjacency {
    fn from_graph(graph: &Graph) -> Self {
        let ids: Vec<NodeId> = graph.nodes.keys().copied().collect();
        let labels: Vec<Label> = graph.nodes.values().copied().collect();
        let mut neighbors = vec![Vec::new(); ids.len()];
        let mut edge_labels: BTreeMap<(usize, usize), Vec<Label>> = BTreeMap::new();

        for edge in &graph.edges {
            // Graph construction guarantees both endpoints exist.
            let (Ok(u), Ok(v)) = (ids.binary_search(&edge.source), ids.binary_search(&edge.target))
            else {
                continue;
            };
            let key = (u.min(v), u.max(v));
            let slot = edge_labels.entry(key).or_default();
            if slot.is_empty() && u != v {
                neighbors[u].push(v);
                neighbors[v].push(u);
            }
            slot.push(edge.label);
        }

        Self {
            ids,
            labels,
            neighbors,
            edge_labels,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Original node id of index `i`.
    #[must_use]
    pub fn node_id(&self, i: usize) -> NodeId {
        self.ids[i]
    }

    #[must_use]
    pub fn label(&self, i: usize) -> Label {
        self.labels[i]
    }

    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Distinct neighbors of `i`, in first-appearance order.
    #[must_use]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    /// Number of distinct non-self neighbors.
    #[must_use]
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    /// All labels of edges between `u` and `v` (either direction).
    #[must_use]
    pub fn edge_labels(&self, u: usize, v: usize) -> &[Label] {
        self.edge_labels
            .get(&(u.min(v), u.max(v)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The label of the most recently added edge between `u` and `v`.
    #[must_use]
    pub fn edge_label(&self, u: usize, v: usize) -> Option<Label> {
        self.edge_labels(u, v).last().copied()
    }

    #[must_use]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        !self.edge_labels(u, v).is_empty()
    }

    /// Every `(u, v, labels)` pair with `u <= v`.
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize, &[Label])> + '_ {
        self.edge_labels
            .iter()
            .map(|(&(u, v), labels)| (u, v, labels.as_slice()))
    }
}

// =============================================================================
// CANONICAL GRAPH (Sorted, Deterministic)
// =============================================================================

/// Sorted exact-labeling form of a graph.
///
/// Two graphs with equal canonical forms are literal duplicates. Node ids
/// take part in the key, so isomorphic graphs numbered differently stay
/// distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CanonicalGraph {
    /// `(node_id, label)` sorted by node id.
    pub nodes: Vec<(u64, i64)>,
    /// `(source, target, label)` triples, sorted.
    pub edges: Vec<(u64, u64, i64)>,
}

impl CanonicalGraph {
    /// Build the canonical form, sorting every element.
    #[must_use]
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes: Vec<(u64, i64)> = graph.nodes().map(|(id, l)| (id.0, l.value())).collect();
        let mut edges: Vec<(u64, u64, i64)> = graph
            .edges()
            .iter()
            .map(|e| (e.source.0, e.target.0, e.label.value()))
            .collect();
        edges.sort_unstable();
        Self { nodes, edges }
    }

    /// Deterministic XOR/rotate checksum.
    ///
    /// Detects accidental corruption only; it is not a cryptographic hash.
    #[must_use]
    pub fn checksum(&self) -> u64 {
        let mut hash: u64 = 0;
        for (index, (id, label)) in self.nodes.iter().enumerate() {
            hash ^= id.rotate_left(13).wrapping_add(index as u64);
            hash ^= (*label as u64).rotate_left(7);
        }
        for (index, (source, target, label)) in self.edges.iter().enumerate() {
            hash ^= source.rotate_left(17).wrapping_add(index as u64);
            hash ^= target.rotate_left(11);
            hash ^= (*label as u64).rotate_left(5);
        }
        hash
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        let mut g = Graph::new(GraphId(0));
        g.add_node(NodeId(10), Label::new(1)).expect("node");
        g.add_node(NodeId(20), Label::new(2)).expect("node");
        g.add_node(NodeId(30), Label::new(3)).expect("node");
        g.add_edge(NodeId(10), NodeId(20), Label::new(5)).expect("edge");
        g.add_edge(NodeId(30), NodeId(20), Label::new(6)).expect("edge");
        g
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut g = Graph::new(GraphId(0));
        g.add_node(NodeId(1), Label::new(1)).expect("node");
        let result = g.add_node(NodeId(1), Label::new(2));
        assert!(matches!(result, Err(MotifdexError::DuplicateNode(NodeId(1)))));
        assert_eq!(g.label(NodeId(1)), Some(Label::new(1)));
    }

    #[test]
    fn dangling_edge_rejected() {
        let mut g = Graph::new(GraphId(0));
        g.add_node(NodeId(1), Label::new(1)).expect("node");
        let result = g.add_edge(NodeId(1), NodeId(2), Label::new(0));
        assert!(matches!(
            result,
            Err(MotifdexError::DanglingEdge { node: NodeId(2), .. })
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn adjacency_is_index_based() {
        let adj = path_graph().adjacency();
        assert_eq!(adj.len(), 3);
        assert_eq!(adj.node_id(1), NodeId(20));
        assert_eq!(adj.neighbors(1), &[0, 2]);
        assert_eq!(adj.degree(0), 1);
        assert_eq!(adj.edge_label(2, 1), Some(Label::new(6)));
        assert!(!adj.has_edge(0, 2));
    }

    #[test]
    fn parallel_edges_keep_every_label() {
        let mut g = Graph::new(GraphId(0));
        g.add_node(NodeId(0), Label::new(1)).expect("node");
        g.add_node(NodeId(1), Label::new(1)).expect("node");
        g.add_edge(NodeId(0), NodeId(1), Label::new(3)).expect("edge");
        g.add_edge(NodeId(1), NodeId(0), Label::new(4)).expect("edge");

        let adj = g.adjacency();
        assert_eq!(adj.neighbors(0), &[1]);
        assert_eq!(adj.edge_labels(0, 1), &[Label::new(3), Label::new(4)]);
        assert_eq!(adj.edge_label(0, 1), Some(Label::new(4)));
    }

    #[test]
    fn self_loop_is_not_a_neighbor() {
        let mut g = Graph::new(GraphId(0));
        g.add_node(NodeId(0), Label::new(1)).expect("node");
        g.add_edge(NodeId(0), NodeId(0), Label::new(9)).expect("edge");

        let adj = g.adjacency();
        assert_eq!(adj.degree(0), 0);
        assert_eq!(adj.edge_labels(0, 0), &[Label::new(9)]);
    }

    #[test]
    fn canonical_form_ignores_edge_order_but_not_numbering() {
        let a = path_graph();

        let mut b = Graph::new(GraphId(7));
        b.add_node(NodeId(30), Label::new(3)).expect("node");
        b.add_node(NodeId(10), Label::new(1)).expect("node");
        b.add_node(NodeId(20), Label::new(2)).expect("node");
        b.add_edge(NodeId(30), NodeId(20), Label::new(6)).expect("edge");
        b.add_edge(NodeId(10), NodeId(20), Label::new(5)).expect("edge");
        assert_eq!(a.canonical(), b.canonical());
        assert_eq!(a.canonical().checksum(), b.canonical().checksum());

        let mut c = Graph::new(GraphId(0));
        c.add_node(NodeId(11), Label::new(1)).expect("node");
        c.add_node(NodeId(20), Label::new(2)).expect("node");
        c.add_node(NodeId(30), Label::new(3)).expect("node");
        c.add_edge(NodeId(11), NodeId(20), Label::new(5)).expect("edge");
        c.add_edge(NodeId(30), NodeId(20), Label::new(6)).expect("edge");
        assert_ne!(a.canonical(), c.canonical());
    }

    #[test]
    fn without_edge_keeps_nodes() {
        let g = path_graph();
        let smaller = g.without_edge(0);
        assert_eq!(smaller.node_count(), 3);
        assert_eq!(smaller.edge_count(), 1);
        assert_eq!(smaller.edges()[0].label, Label::new(6));
    }
}
