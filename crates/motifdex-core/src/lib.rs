//! # motifdex-core
//!
//! Graph substructure indexing: the deterministic pipeline logic.
//!
//! This crate mines frequent labeled subgraph patterns from a graph
//! database, selects a small discriminative subset, encodes every graph as a
//! binary feature vector over that subset, and filters containment query
//! candidates in feature space.
//!
//! ## Pipeline
//!
//! ```text
//! dataset → deduplicate → mine → select → pattern index
//!                                              │
//! db graphs / query graphs ──── FeatureIndexer ┘ → feature matrices
//!                                              → CandidateGenerator → candidates
//! ```
//!
//! ## Constraints
//!
//! - Synchronous, no network or process handling (the app crate runs the
//!   external miner)
//! - Deterministic: ordered maps everywhere, parallel stages preserve order
//! - Every stage consumes read-only inputs and produces new values

// =============================================================================
// MODULES
// =============================================================================

pub mod candidates;
pub mod dataset;
pub mod features;
pub mod formats;
pub mod graph;
pub mod isomorphism;
pub mod mining;
pub mod pattern;
pub mod primitives;
pub mod selection;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GraphId, Label, MotifdexError, NodeId, PatternId};

// =============================================================================
// RE-EXPORTS: Pipeline
// =============================================================================

pub use candidates::{CandidateGenerator, CandidateSet, CandidateStats, dominates};
pub use dataset::{deduplicate, parse, parse_file, write_dataset};
pub use features::{FeatureIndexer, FeatureMatrix};
pub use graph::{Adjacency, CanonicalGraph, Edge, Graph};
pub use isomorphism::{Matcher, is_subgraph_isomorphic};
pub use mining::{FallbackEnumerator, MotifClass, min_support_count};
pub use pattern::SubgraphPattern;
pub use selection::{DiscriminativeSelector, SelectionConfig, discriminative_score, select_top_k};
