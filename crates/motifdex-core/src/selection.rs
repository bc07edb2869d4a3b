//! # Discriminative Selection
//!
//! Picks the top-k patterns from a mined set.
//!
//! Steps:
//! 1. Hard filter on edge count and support ratio window
//! 2. Score every survivor by `support * (total - support) / total^2`
//! 3. Stable sort by `(score, edge_count)` descending, keep the first k
//!
//! When the filter leaves nothing, the unfiltered set is ranked instead and a
//! warning is logged.

use crate::MotifdexError;
use crate::pattern::SubgraphPattern;
use crate::primitives::{
    DEFAULT_MAX_SUPPORT_RATIO, DEFAULT_MIN_EDGES, DEFAULT_MIN_SUPPORT_RATIO, DEFAULT_TOP_K,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Discriminative power of a pattern with `support` in a database of
/// `total` graphs. Peaks at 0.25 when the pattern splits the database in
/// half; 0 when `total` is 0.
#[must_use]
pub fn discriminative_score(support: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let support = support.min(total) as f64;
    let total = total as f64;
    support * (total - support) / (total * total)
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Thresholds of the selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Maximum number of patterns kept.
    pub k: usize,
    /// Minimum edge count of a kept pattern.
    pub min_edges: usize,
    /// Inclusive lower bound on `support / total`.
    pub min_support_ratio: f64,
    /// Inclusive upper bound on `support / total`.
    pub max_support_ratio: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_TOP_K,
            min_edges: DEFAULT_MIN_EDGES,
            min_support_ratio: DEFAULT_MIN_SUPPORT_RATIO,
            max_support_ratio: DEFAULT_MAX_SUPPORT_RATIO,
        }
    }
}

impl SelectionConfig {
    /// Default thresholds with a custom `k`.
    #[must_use]
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Reject a zero `k` or a support window that is inverted or leaves `[0, 1]`.
    pub fn validate(&self) -> Result<(), MotifdexError> {
        if self.k == 0 {
            return Err(MotifdexError::InvalidConfig(
                "top_k must be at least 1".to_string(),
            ));
        }
        let window = 0.0..=1.0;
        if !window.contains(&self.min_support_ratio)
            || !window.contains(&self.max_support_ratio)
            || self.min_support_ratio > self.max_support_ratio
        {
            return Err(MotifdexError::InvalidConfig(format!(
                "support ratio window [{}, {}] must be ordered and within [0, 1]",
                self.min_support_ratio, self.max_support_ratio
            )));
        }
        Ok(())
    }

    fn admits(&self, pattern: &SubgraphPattern, total: usize) -> bool {
        let ratio = pattern.support_ratio(total);
        pattern.edge_count() >= self.min_edges
            && ratio >= self.min_support_ratio
            && ratio <= self.max_support_ratio
    }
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Ranks mined patterns by discriminative power.
#[derive(Debug, Clone, Default)]
pub struct DiscriminativeSelector {
    config: SelectionConfig,
}

impl DiscriminativeSelector {
    #[must_use]
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Select at most `k` patterns for a database of `total_graphs` graphs.
    ///
    /// Returned patterns carry their `discriminative_score`.
    #[must_use]
    pub fn select(
        &self,
        patterns: Vec<SubgraphPattern>,
        total_graphs: usize,
    ) -> Vec<SubgraphPattern> {
        if patterns.is_empty() {
            tracing::warn!("No patterns to select from");
            return Vec::new();
        }

        let mined = patterns.len();
        let (admitted, rejected): (Vec<_>, Vec<_>) = patterns
            .into_iter()
            .partition(|p| self.config.admits(p, total_graphs));

        let pool = if admitted.is_empty() {
            tracing::warn!(
                "No patterns passed the filters (min_edges={}, support ratio in [{}, {}]); ranking all {} patterns instead",
                self.config.min_edges,
                self.config.min_support_ratio,
                self.config.max_support_ratio,
                mined
            );
            rejected
        } else {
            tracing::info!("{} of {} patterns passed the filters", admitted.len(), mined);
            admitted
        };

        let mut ranked: Vec<SubgraphPattern> = pool
            .into_iter()
            .map(|mut p| {
                p.discriminative_score = discriminative_score(p.support, total_graphs);
                p
            })
            .collect();

        // Stable: ties keep mining order.
        ranked.sort_by(rank_order);
        ranked.truncate(self.config.k);
        ranked
    }
}

/// [`DiscriminativeSelector::select`] with default thresholds and a custom `k`.
#[must_use]
pub fn select_top_k(
    patterns: Vec<SubgraphPattern>,
    total_graphs: usize,
    k: usize,
) -> Vec<SubgraphPattern> {
    DiscriminativeSelector::new(SelectionConfig::with_k(k)).select(patterns, total_graphs)
}

/// `(score, edge_count)` descending.
fn rank_order(a: &SubgraphPattern, b: &SubgraphPattern) -> Ordering {
    b.discriminative_score
        .total_cmp(&a.discriminative_score)
        .then_with(|| b.edge_count().cmp(&a.edge_count()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::{GraphId, Label, NodeId, PatternId};
    use std::collections::BTreeSet;

    /// A path pattern with `edges` edges and the given support.
    fn pattern(id: u64, edges: usize, support: usize) -> SubgraphPattern {
        let mut body = Graph::new(GraphId(id));
        for i in 0..=edges as u64 {
            body.add_node(NodeId(i), Label::new(1)).expect("node");
        }
        for i in 0..edges as u64 {
            body.add_edge(NodeId(i), NodeId(i + 1), Label::new(1))
                .expect("edge");
        }
        SubgraphPattern::with_support(PatternId(id), body, support, BTreeSet::new())
    }

    fn ids(patterns: &[SubgraphPattern]) -> Vec<u64> {
        patterns.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn score_peaks_at_half() {
        assert!((discriminative_score(50, 100) - 0.25).abs() < 1e-12);
        assert!(discriminative_score(0, 100).abs() < 1e-12);
        assert!(discriminative_score(100, 100).abs() < 1e-12);
        assert!(discriminative_score(3, 0).abs() < 1e-12);
        assert!(discriminative_score(10, 100) < discriminative_score(40, 100));
    }

    #[test]
    fn filter_drops_small_and_out_of_window() {
        let patterns = vec![
            pattern(0, 1, 50),  // too few edges
            pattern(1, 2, 2),   // ratio 0.02
            pattern(2, 2, 90),  // ratio 0.90
            pattern(3, 2, 30),
            pattern(4, 3, 5),   // ratio 0.05, inclusive
            pattern(5, 2, 80),  // ratio 0.80, inclusive
        ];
        let selected = DiscriminativeSelector::default().select(patterns, 100);
        assert_eq!(ids(&selected), vec![3, 5, 4]);
        assert!((selected[0].discriminative_score - 0.21).abs() < 1e-12);
    }

    #[test]
    fn ties_break_on_edges_then_input_order() {
        let patterns = vec![
            pattern(0, 2, 40),
            pattern(1, 3, 40),
            pattern(2, 2, 60),
            pattern(3, 3, 60),
        ];
        let selected = DiscriminativeSelector::default().select(patterns, 100);
        assert_eq!(ids(&selected), vec![1, 3, 0, 2]);
    }

    #[test]
    fn truncates_to_k() {
        let patterns: Vec<_> = (0..10).map(|i| pattern(i, 2, 10 + i as usize)).collect();
        let selected = select_top_k(patterns, 100, 3);
        assert_eq!(ids(&selected), vec![9, 8, 7]);
    }

    #[test]
    fn empty_filter_falls_back_to_all() {
        let patterns = vec![pattern(0, 1, 3), pattern(1, 1, 2)];
        let selected = DiscriminativeSelector::default().select(patterns, 4);
        assert_eq!(ids(&selected), vec![1, 0]);
        assert!((selected[0].discriminative_score - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(DiscriminativeSelector::default().select(Vec::new(), 10).is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(SelectionConfig::default().validate().is_ok());
        assert!(SelectionConfig::with_k(0).validate().is_err());
        let inverted = SelectionConfig {
            min_support_ratio: 0.9,
            max_support_ratio: 0.1,
            ..SelectionConfig::default()
        };
        assert!(inverted.validate().is_err());
    }
}
