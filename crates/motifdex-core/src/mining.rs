//! # Fallback Motif Enumerator
//!
//! A self-contained frequent-pattern miner that needs no external tool.
//!
//! It walks a fixed ladder of structural motif classes over every graph,
//! keys every occurrence by a canonical label tuple, and counts the distinct
//! graphs holding each key. Classes are enumerated independently; the
//! minimum-support filter is applied per class before emission.
//!
//! Every emitted body is instantiated from its key, so it is
//! subgraph-isomorphic to each graph counted in its support. Labels a class
//! does not constrain are carried as [`Label::ANY`].
//!
//! Per-graph scans run in parallel; the merge into global counters happens
//! afterwards over ordered maps, so the output is identical across runs.

use crate::graph::{Adjacency, Graph};
use crate::pattern::SubgraphPattern;
use crate::primitives::STAR_ARITY;
use crate::{GraphId, Label, NodeId, PatternId};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Canonical label tuple identifying one motif within a class.
type MotifKey = Vec<Label>;

// =============================================================================
// MOTIF CLASSES
// =============================================================================

/// The structural motif classes, in ladder order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MotifClass {
    /// One edge, keyed by its label.
    Edge,
    /// One node, keyed by its label.
    Node,
    /// A node label together with one incident edge label.
    NodeEdge,
    /// Two edges sharing a middle node.
    Path2,
    /// Three mutually adjacent nodes.
    Triangle,
    /// Three edges over four distinct nodes.
    Path3,
    /// A node with its first three neighbors.
    Star,
    /// A simple cycle over four distinct nodes.
    Cycle4,
}

impl MotifClass {
    /// Every class, in enumeration order.
    pub const LADDER: [MotifClass; 8] = [
        MotifClass::Edge,
        MotifClass::Node,
        MotifClass::NodeEdge,
        MotifClass::Path2,
        MotifClass::Triangle,
        MotifClass::Path3,
        MotifClass::Star,
        MotifClass::Cycle4,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MotifClass::Edge => "single edges",
            MotifClass::Node => "single nodes",
            MotifClass::NodeEdge => "node-edge pairs",
            MotifClass::Path2 => "2-paths",
            MotifClass::Triangle => "triangles",
            MotifClass::Path3 => "3-paths",
            MotifClass::Star => "stars",
            MotifClass::Cycle4 => "4-cycles",
        }
    }

    /// Distinct keys of this class occurring in one graph.
    fn occurrences(self, adj: &Adjacency) -> BTreeSet<MotifKey> {
        let mut keys = BTreeSet::new();
        match self {
            MotifClass::Edge => {
                for (u, v, labels) in adj.edge_pairs() {
                    if u != v {
                        keys.extend(labels.iter().map(|&l| vec![l]));
                    }
                }
            }
            MotifClass::Node => {
                keys.extend(adj.labels().iter().map(|&l| vec![l]));
            }
            MotifClass::NodeEdge => {
                for (u, v, labels) in adj.edge_pairs() {
                    if u == v {
                        continue;
                    }
                    for &l in labels {
                        keys.insert(vec![adj.label(u), l]);
                        keys.insert(vec![adj.label(v), l]);
                    }
                }
            }
            MotifClass::Path2 => {
                for center in 0..adj.len() {
                    let nbrs = adj.neighbors(center);
                    for (i, &a) in nbrs.iter().enumerate() {
                        for &b in &nbrs[i + 1..] {
                            keys.insert(reversible_key(adj, &[a, center, b]));
                        }
                    }
                }
            }
            MotifClass::Triangle => {
                for center in 0..adj.len() {
                    let nbrs = adj.neighbors(center);
                    for (i, &a) in nbrs.iter().enumerate() {
                        for &b in &nbrs[i + 1..] {
                            if adj.has_edge(a, b) {
                                keys.insert(cyclic_key(adj, &[center, a, b]));
                            }
                        }
                    }
                }
            }
            MotifClass::Path3 => {
                for n0 in 0..adj.len() {
                    for &n1 in adj.neighbors(n0) {
                        for &n2 in adj.neighbors(n1) {
                            if n2 == n0 {
                                continue;
                            }
                            for &n3 in adj.neighbors(n2) {
                                if n3 != n0 && n3 != n1 {
                                    keys.insert(reversible_key(adj, &[n0, n1, n2, n3]));
                                }
                            }
                        }
                    }
                }
            }
            MotifClass::Star => {
                for center in 0..adj.len() {
                    let nbrs = adj.neighbors(center);
                    if nbrs.len() < STAR_ARITY {
                        continue;
                    }
                    let mut leaves: Vec<(Label, Label)> = nbrs[..STAR_ARITY]
                        .iter()
                        .map(|&n| (adj.label(n), label_between(adj, center, n)))
                        .collect();
                    leaves.sort_unstable();
                    let mut key = vec![adj.label(center)];
                    for (node_label, edge_label) in leaves {
                        key.push(node_label);
                        key.push(edge_label);
                    }
                    keys.insert(key);
                }
            }
            MotifClass::Cycle4 => {
                for n0 in 0..adj.len() {
                    for &n1 in adj.neighbors(n0) {
                        for &n2 in adj.neighbors(n1) {
                            if n2 == n0 {
                                continue;
                            }
                            for &n3 in adj.neighbors(n2) {
                                if n3 != n0 && n3 != n1 && adj.has_edge(n3, n0) {
                                    keys.insert(cyclic_key(adj, &[n0, n1, n2, n3]));
                                }
                            }
                        }
                    }
                }
            }
        }
        keys
    }

    /// Build the pattern body described by a key of this class.
    fn instantiate(self, id: GraphId, key: &[Label]) -> Graph {
        let mut body = Graph::new(id);
        let (nodes, edges): (Vec<Label>, Vec<(u64, u64, Label)>) = match self {
            MotifClass::Edge => (vec![Label::ANY, Label::ANY], vec![(0, 1, key[0])]),
            MotifClass::Node => (vec![key[0]], Vec::new()),
            MotifClass::NodeEdge => (vec![key[0], Label::ANY], vec![(0, 1, key[1])]),
            MotifClass::Path2 | MotifClass::Path3 => {
                // key = n0 e0 n1 e1 n2 ...
                let nodes: Vec<Label> = key.iter().step_by(2).copied().collect();
                let edges = key
                    .iter()
                    .skip(1)
                    .step_by(2)
                    .enumerate()
                    .map(|(i, &l)| (i as u64, i as u64 + 1, l))
                    .collect();
                (nodes, edges)
            }
            MotifClass::Triangle | MotifClass::Cycle4 => {
                // key = node labels followed by the ring's edge labels
                let n = key.len() / 2;
                let nodes = key[..n].to_vec();
                let edges = key[n..]
                    .iter()
                    .enumerate()
                    .map(|(i, &l)| (i as u64, ((i + 1) % n) as u64, l))
                    .collect();
                (nodes, edges)
            }
            MotifClass::Star => {
                let mut nodes = vec![key[0]];
                let mut edges = Vec::new();
                for (i, pair) in key[1..].chunks(2).enumerate() {
                    nodes.push(pair[0]);
                    edges.push((0, i as u64 + 1, pair[1]));
                }
                (nodes, edges)
            }
        };

        for (i, label) in nodes.into_iter().enumerate() {
            // Fresh sequential ids cannot collide.
            let _ = body.add_node(NodeId(i as u64), label);
        }
        for (source, target, label) in edges {
            let _ = body.add_edge(NodeId(source), NodeId(target), label);
        }
        body
    }
}

// =============================================================================
// CANONICAL KEYS
// =============================================================================

fn label_between(adj: &Adjacency, u: usize, v: usize) -> Label {
    adj.edge_label(u, v).unwrap_or(Label::ANY)
}

/// Interleaved `n0 e01 n1 e12 n2 ...` tuple of a path.
fn path_tuple(adj: &Adjacency, path: &[usize]) -> MotifKey {
    let mut key = Vec::with_capacity(path.len() * 2 - 1);
    for (i, &node) in path.iter().enumerate() {
        if i > 0 {
            key.push(label_between(adj, path[i - 1], node));
        }
        key.push(adj.label(node));
    }
    key
}

/// Lexicographic minimum of a path tuple and its reversal.
fn reversible_key(adj: &Adjacency, path: &[usize]) -> MotifKey {
    let forward = path_tuple(adj, path);
    let mut backward = forward.clone();
    backward.reverse();
    forward.min(backward)
}

/// Minimum `(node labels, ring edge labels)` over every rotation and
/// reflection of a cycle.
fn cyclic_key(adj: &Adjacency, ring: &[usize]) -> MotifKey {
    let n = ring.len();
    let mut best: Option<MotifKey> = None;
    for start in 0..n {
        for forward in [true, false] {
            let order: Vec<usize> = (0..n)
                .map(|i| {
                    let offset = if forward { start + i } else { start + n - i };
                    ring[offset % n]
                })
                .collect();
            let mut key: MotifKey = order.iter().map(|&v| adj.label(v)).collect();
            for i in 0..n {
                key.push(label_between(adj, order[i], order[(i + 1) % n]));
            }
            if best.as_ref().is_none_or(|b| key < *b) {
                best = Some(key);
            }
        }
    }
    best.unwrap_or_default()
}

// =============================================================================
// SUPPORT THRESHOLD
// =============================================================================

/// Smallest support count satisfying `support >= fraction * total`.
///
/// A small tolerance absorbs representation error (`0.07 * 100` is
/// `7.000000000000001` in binary floating point).
#[must_use]
pub fn min_support_count(fraction: f64, total: usize) -> usize {
    let raw = fraction * total as f64;
    (raw - 1e-9).ceil().max(0.0) as usize
}

// =============================================================================
// ENUMERATOR
// =============================================================================

/// The built-in miner. Always available.
#[derive(Debug, Clone)]
pub struct FallbackEnumerator {
    classes: Vec<MotifClass>,
}

impl Default for FallbackEnumerator {
    fn default() -> Self {
        Self {
            classes: MotifClass::LADDER.to_vec(),
        }
    }
}

impl FallbackEnumerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict enumeration to a subset of the ladder (kept in ladder order).
    #[must_use]
    pub fn with_classes(classes: &[MotifClass]) -> Self {
        let mut classes = classes.to_vec();
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    /// Mine every class over `graphs` and emit the patterns whose support
    /// reaches `min_support_fraction * graphs.len()`.
    ///
    /// Output order: ladder order, then ascending key within a class.
    /// Pattern ids are sequential in output order.
    #[must_use]
    pub fn mine(&self, graphs: &[Graph], min_support_fraction: f64) -> Vec<SubgraphPattern> {
        let threshold = min_support_count(min_support_fraction, graphs.len());
        tracing::info!(
            "Mining motifs over {} graphs with min support {:.2}% ({} graphs)",
            graphs.len(),
            min_support_fraction * 100.0,
            threshold
        );

        let adjacencies: Vec<(GraphId, Adjacency)> = graphs
            .par_iter()
            .map(|g| (g.id(), g.adjacency()))
            .collect();

        let mut patterns = Vec::new();
        for &class in &self.classes {
            let per_graph: Vec<(GraphId, BTreeSet<MotifKey>)> = adjacencies
                .par_iter()
                .map(|(id, adj)| (*id, class.occurrences(adj)))
                .collect();

            let mut support: BTreeMap<MotifKey, BTreeSet<GraphId>> = BTreeMap::new();
            for (graph_id, keys) in per_graph {
                for key in keys {
                    support.entry(key).or_default().insert(graph_id);
                }
            }

            let before = patterns.len();
            for (key, owners) in support {
                if owners.len() < threshold {
                    continue;
                }
                let id = PatternId(patterns.len() as u64);
                let body = class.instantiate(GraphId(id.0), &key);
                patterns.push(SubgraphPattern::new(id, body, owners));
            }
            tracing::info!(
                "Mined {} {} patterns (total {})",
                patterns.len() - before,
                class.name(),
                patterns.len()
            );
        }

        patterns
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isomorphism::is_subgraph_isomorphic;

    fn graph(id: u64, nodes: &[i64], edges: &[(u64, u64, i64)]) -> Graph {
        let mut g = Graph::new(GraphId(id));
        for (i, &l) in nodes.iter().enumerate() {
            g.add_node(NodeId(i as u64), Label::new(l)).expect("node");
        }
        for &(s, t, l) in edges {
            g.add_edge(NodeId(s), NodeId(t), Label::new(l)).expect("edge");
        }
        g
    }

    #[allow(dead_code)]
    fn of_class(patterns: &[SubgraphPattern], nodes: usize, edges: usize) -> Vec<&SubgraphPattern> {
        patterns
            .iter()
            .filter(|p| p.node_count() == nodes && p.edge_count() == edges)
            .collect()
    }

    #[test]
    fn threshold_rounds_up_with_tolerance() {
        assert_eq!(min_support_count(1.0, 3), 3);
        assert_eq!(min_support_count(0.05, 100), 5);
        assert_eq!(min_support_count(0.07, 100), 7);
        assert_eq!(min_support_count(0.5, 3), 2);
        assert_eq!(min_support_count(0.0, 10), 0);
    }

    #[test]
    fn identical_edges_collapse_across_graphs() {
        let graphs: Vec<Graph> = (0..3).map(|i| graph(i, &[1, 2], &[(0, 1, 7)])).collect();
        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Edge]).mine(&graphs, 1.0);

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].support, 3);
        assert_eq!(patterns[0].edge_count(), 1);
        assert_eq!(patterns[0].graph.edges()[0].label, Label::new(7));
    }

    #[test]
    fn per_class_threshold_filters() {
        let graphs = vec![
            graph(0, &[1, 1], &[(0, 1, 7)]),
            graph(1, &[1, 1], &[(0, 1, 8)]),
        ];
        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Edge]).mine(&graphs, 0.6);
        assert!(patterns.is_empty());

        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Edge]).mine(&graphs, 0.5);
        assert_eq!(patterns.len(), 2);
    }

    #[test]
    fn path2_direction_collapses() {
        // 1-(5)-2-(6)-3 and its mirror 3-(6)-2-(5)-1 are the same 2-path.
        let graphs = vec![
            graph(0, &[1, 2, 3], &[(0, 1, 5), (1, 2, 6)]),
            graph(1, &[3, 2, 1], &[(0, 1, 6), (1, 2, 5)]),
        ];
        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Path2]).mine(&graphs, 1.0);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].support, 2);
        let labels: Vec<Label> = patterns[0].graph.nodes().map(|(_, l)| l).collect();
        assert_eq!(labels, vec![Label::new(1), Label::new(2), Label::new(3)]);
    }

    #[test]
    fn triangle_rotations_collapse() {
        let graphs = vec![
            graph(0, &[1, 2, 3], &[(0, 1, 4), (1, 2, 5), (2, 0, 6)]),
            graph(1, &[2, 3, 1], &[(0, 1, 5), (1, 2, 6), (2, 0, 4)]),
        ];
        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Triangle]).mine(&graphs, 1.0);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].support, 2);
        assert_eq!(patterns[0].edge_count(), 3);
    }

    #[test]
    fn square_and_star_are_found() {
        let square = graph(0, &[1, 1, 1, 1], &[(0, 1, 2), (1, 2, 2), (2, 3, 2), (3, 0, 2)]);
        let star = graph(1, &[0, 1, 1, 1], &[(0, 1, 3), (0, 2, 3), (0, 3, 3)]);
        let graphs = vec![square, star];

        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Cycle4]).mine(&graphs, 0.5);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].graph_ids, [GraphId(0)].into_iter().collect());

        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Star]).mine(&graphs, 0.5);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].graph_ids, [GraphId(1)].into_iter().collect());
        assert_eq!(patterns[0].edge_count(), 3);
    }

    #[test]
    fn path3_requires_distinct_nodes() {
        // A triangle has no simple 3-edge path over four distinct nodes.
        let triangle = graph(0, &[1, 1, 1], &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]);
        let patterns = FallbackEnumerator::with_classes(&[MotifClass::Path3]).mine(&[triangle], 0.0);
        assert!(patterns.is_empty());
    }

    #[test]
    fn every_body_embeds_in_its_owners() {
        let graphs = vec![
            graph(0, &[1, 2, 3, 1], &[(0, 1, 5), (1, 2, 6), (2, 3, 5), (3, 0, 6), (0, 2, 7)]),
            graph(1, &[1, 2, 3], &[(0, 1, 5), (1, 2, 6)]),
            graph(2, &[2, 2, 2, 2], &[(0, 1, 1), (0, 2, 1), (0, 3, 1)]),
        ];
        let patterns = FallbackEnumerator::new().mine(&graphs, 0.0);
        assert!(!patterns.is_empty());

        for pattern in &patterns {
            for owner in &pattern.graph_ids {
                let target = &graphs[owner.0 as usize];
                assert!(
                    is_subgraph_isomorphic(&pattern.graph, target),
                    "{} should embed in graph {}",
                    pattern,
                    owner
                );
            }
        }
    }

    #[test]
    fn ids_are_sequential_and_output_is_deterministic() {
        let graphs = vec![
            graph(0, &[1, 2, 3], &[(0, 1, 5), (1, 2, 6)]),
            graph(1, &[1, 2], &[(0, 1, 5)]),
        ];
        let first = FallbackEnumerator::new().mine(&graphs, 0.5);
        let second = FallbackEnumerator::new().mine(&graphs, 0.5);
        assert_eq!(first, second);
        for (i, p) in first.iter().enumerate() {
            assert_eq!(p.id, PatternId(i as u64));
        }
    }
}
