//! # Core Type Definitions
//!
//! This module contains the identifier and label types shared by every
//! stage of the indexing pipeline, plus the single error type:
//! - Graph, node and pattern identifiers (`GraphId`, `NodeId`, `PatternId`)
//! - Node/edge labels (`Label`), including the pattern-only wildcard
//! - Error types (`MotifdexError`)
//!
//! ## Determinism Guarantees
//!
//! All identifier types implement `Ord` so they can key `BTreeMap`/`BTreeSet`
//! and produce the same iteration order on every run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a graph inside a dataset (database or query set).
///
/// Assigned sequentially in file order by the parser and re-assigned
/// sequentially by deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GraphId(pub u64);

/// Identifier of a node, unique within its graph.
/// Node ids need not be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identifier of a mined pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatternId(pub u64);

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// LABEL
// =============================================================================

/// Integer label carried by nodes and edges.
///
/// `Label::ANY` is reserved: only pattern bodies may carry it, on nodes whose
/// label a motif class leaves unconstrained. Dataset parsing rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(pub i64);

impl Label {
    /// The wildcard label. Compatible with every target label.
    pub const ANY: Label = Label(i64::MIN);

    /// Create a concrete label.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Whether this is the wildcard label.
    #[must_use]
    pub const fn is_any(self) -> bool {
        self.0 == i64::MIN
    }

    /// Whether a pattern node with this label may map onto a target node
    /// labeled `target`.
    #[must_use]
    pub const fn accepts(self, target: Label) -> bool {
        self.is_any() || self.0 == target.0
    }

    /// Get the raw label value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_any() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Motifdex pipeline.
///
/// - No silent failures
/// - Use `Result<T, MotifdexError>` for fallible operations
/// - Recoverable kinds (`MinerUnavailable`, `EmptyIndex`) are handled by the
///   documented fallbacks; the rest are fatal for the operation that raised them
#[derive(Debug, Error)]
pub enum MotifdexError {
    /// A dataset line is malformed.
    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// An edge references a node id not declared in its graph.
    #[error("Parse error at line {line}: edge references unknown node {node}")]
    DanglingEdge { line: usize, node: NodeId },

    /// A node id was inserted twice into the same graph.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// The external miner could not produce patterns.
    #[error("External miner unavailable: {0}")]
    MinerUnavailable(String),

    /// No pattern survived mining and selection.
    #[error("Pattern index is empty")]
    EmptyIndex,

    /// Query and database feature matrices disagree on the column count.
    #[error("Feature matrix shape mismatch: database has {db_cols} columns, query has {query_cols}")]
    ShapeMismatch { db_cols: usize, query_cols: usize },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MotifdexError {
    /// Shorthand for a [`MotifdexError::Parse`] at `line`.
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
