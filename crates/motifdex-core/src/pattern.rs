//! # Subgraph Patterns
//!
//! A mined pattern: a small graph body plus the set of database graphs that
//! contain it.

use crate::graph::Graph;
use crate::{GraphId, PatternId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A frequent subgraph pattern.
///
/// Created by a miner, scored by the selector, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubgraphPattern {
    pub id: PatternId,
    /// The pattern body.
    pub graph: Graph,
    /// Number of distinct database graphs containing the pattern.
    pub support: usize,
    /// Identifiers of the graphs counted in `support`. May be empty when the
    /// miner reports a support count without listing owners.
    pub graph_ids: BTreeSet<GraphId>,
    /// Set by the discriminative selector.
    pub discriminative_score: f64,
}

impl SubgraphPattern {
    /// Create an unscored pattern whose support is the size of `graph_ids`.
    #[must_use]
    pub fn new(id: PatternId, graph: Graph, graph_ids: BTreeSet<GraphId>) -> Self {
        Self {
            id,
            graph,
            support: graph_ids.len(),
            graph_ids,
            discriminative_score: 0.0,
        }
    }

    /// Create an unscored pattern with an explicit support count.
    #[must_use]
    pub fn with_support(
        id: PatternId,
        graph: Graph,
        support: usize,
        graph_ids: BTreeSet<GraphId>,
    ) -> Self {
        Self {
            id,
            graph,
            support,
            graph_ids,
            discriminative_score: 0.0,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Fraction of a database of `total_graphs` graphs containing the pattern.
    #[must_use]
    pub fn support_ratio(&self, total_graphs: usize) -> f64 {
        if total_graphs == 0 {
            return 0.0;
        }
        self.support as f64 / total_graphs as f64
    }
}

impl std::fmt::Display for SubgraphPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pattern(id={}, nodes={}, edges={}, support={})",
            self.id,
            self.node_count(),
            self.edge_count(),
            self.support
        )
    }
}
