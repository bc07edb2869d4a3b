//! # Isomorphism Oracle
//!
//! Non-induced, label-preserving subgraph isomorphism.
//!
//! `pattern ⊆ target` holds when an injective node map exists such that every
//! mapped node carries a compatible label and every pattern edge lands on a
//! target edge with the same label between the mapped endpoints.
//!
//! A [`Matcher`] derives the pattern's adjacency and search order once and
//! can then be run against any number of targets.

use crate::Label;
use crate::graph::{Adjacency, Graph};
use std::collections::BTreeMap;

/// Decide whether `pattern` is subgraph-isomorphic to `target`.
///
/// The empty pattern is contained in every target.
#[must_use]
pub fn is_subgraph_isomorphic(pattern: &Graph, target: &Graph) -> bool {
    Matcher::new(pattern).matches(target)
}

// =============================================================================
// MATCHER
// =============================================================================

/// A pattern prepared for repeated containment checks.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Adjacency,
    /// Pattern node indices in search order.
    order: Vec<usize>,
    /// For each position in `order`, the earlier-ordered pattern neighbors.
    anchors: Vec<Vec<usize>>,
    /// Occurrences of each concrete (non-wildcard) pattern label.
    concrete_labels: BTreeMap<Label, usize>,
    /// Distinct adjacent pattern node pairs, self-loops excluded.
    pair_count: usize,
}

impl Matcher {
    #[must_use]
    pub fn new(pattern: &Graph) -> Self {
        let pattern = pattern.adjacency();
        let order = search_order(&pattern);

        let mut position = vec![0usize; pattern.len()];
        for (i, &node) in order.iter().enumerate() {
            position[node] = i;
        }
        let anchors = order
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                pattern
                    .neighbors(node)
                    .iter()
                    .copied()
                    .filter(|&n| position[n] < i)
                    .collect()
            })
            .collect();

        let mut concrete_labels = BTreeMap::new();
        for &label in pattern.labels() {
            if !label.is_any() {
                *concrete_labels.entry(label).or_insert(0) += 1;
            }
        }
        let pair_count = pattern.edge_pairs().filter(|(u, v, _)| u != v).count();

        Self {
            pattern,
            order,
            anchors,
            concrete_labels,
            pair_count,
        }
    }

    /// Check containment in `target`.
    #[must_use]
    pub fn matches(&self, target: &Graph) -> bool {
        self.matches_adjacency(&target.adjacency())
    }

    /// Check containment in a target whose adjacency is already derived.
    #[must_use]
    pub fn matches_adjacency(&self, target: &Adjacency) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        if self.pattern.len() > target.len() || !self.labels_fit(target) {
            return false;
        }
        if self.pair_count > target.edge_pairs().filter(|(u, v, _)| u != v).count() {
            return false;
        }

        let mut mapping = vec![usize::MAX; self.pattern.len()];
        let mut used = vec![false; target.len()];
        self.extend(target, 0, &mut mapping, &mut used)
    }

    /// The concrete pattern label multiset must fit inside the target's.
    fn labels_fit(&self, target: &Adjacency) -> bool {
        let mut available: BTreeMap<Label, usize> = BTreeMap::new();
        for &label in target.labels() {
            *available.entry(label).or_insert(0) += 1;
        }
        self.concrete_labels
            .iter()
            .all(|(label, &needed)| available.get(label).copied().unwrap_or(0) >= needed)
    }

    fn extend(
        &self,
        target: &Adjacency,
        depth: usize,
        mapping: &mut [usize],
        used: &mut [bool],
    ) -> bool {
        if depth == self.order.len() {
            return true;
        }
        let node = self.order[depth];
        let anchors = &self.anchors[depth];

        // Anchored nodes can only land next to their first anchor's image.
        let candidates: Vec<usize> = match anchors.first() {
            Some(&anchor) => target.neighbors(mapping[anchor]).to_vec(),
            None => (0..target.len()).collect(),
        };

        for candidate in candidates {
            if used[candidate] || !self.compatible(target, node, candidate, anchors, mapping) {
                continue;
            }
            mapping[node] = candidate;
            used[candidate] = true;
            if self.extend(target, depth + 1, mapping, used) {
                return true;
            }
            used[candidate] = false;
            mapping[node] = usize::MAX;
        }
        false
    }

    fn compatible(
        &self,
        target: &Adjacency,
        node: usize,
        candidate: usize,
        anchors: &[usize],
        mapping: &[usize],
    ) -> bool {
        if !self.pattern.label(node).accepts(target.label(candidate)) {
            return false;
        }
        if target.degree(candidate) < self.pattern.degree(node) {
            return false;
        }
        if !labels_covered(
            self.pattern.edge_labels(node, node),
            target.edge_labels(candidate, candidate),
        ) {
            return false;
        }
        anchors.iter().all(|&anchor| {
            labels_covered(
                self.pattern.edge_labels(node, anchor),
                target.edge_labels(candidate, mapping[anchor]),
            )
        })
    }
}

/// Every required edge label appears among the available ones.
fn labels_covered(required: &[Label], available: &[Label]) -> bool {
    required.iter().all(|label| available.contains(label))
}

/// Connectivity-first ordering: each component starts from its highest
/// degree node, then repeatedly takes the node with the most already-ordered
/// neighbors (ties: higher degree, then lower index).
fn search_order(pattern: &Adjacency) -> Vec<usize> {
    let n = pattern.len();
    let mut placed = vec![false; n];
    let mut links = vec![0usize; n];
    let mut order = Vec::with_capacity(n);

    while order.len() < n {
        let mut best: Option<usize> = None;
        for node in (0..n).filter(|&i| !placed[i]) {
            let better = match best {
                None => true,
                Some(b) => {
                    (links[node], pattern.degree(node)) > (links[b], pattern.degree(b))
                }
            };
            if better {
                best = Some(node);
            }
        }
        let Some(next) = best else { break };
        placed[next] = true;
        order.push(next);
        for &neighbor in pattern.neighbors(next) {
            links[neighbor] += 1;
        }
    }
    order
}

// =============================================================================
// TESTS
// =============================================================================
