//! # Dataset Ingestion
//!
//! Parsing, deduplication and writing of graph datasets.
//!
//! Format, one record per graph:
//! ```text
//! #            (or a `t ...` header line)
//! v <node_id> <label>
//! e <source> <target> <label>
//! ```
//!
//! - Reject malformed input with the offending line number
//! - Never return a partially parsed dataset
//! - Deduplicate by exact canonical signature, first occurrence wins

use crate::graph::{CanonicalGraph, Graph};
use crate::{GraphId, Label, MotifdexError, NodeId};
use std::collections::BTreeSet;
use std::path::Path;

/// Parse a dataset into graphs, assigning sequential ids in file order.
pub fn parse(source: &str) -> Result<Vec<Graph>, MotifdexError> {
    let mut graphs = Vec::new();
    let mut current: Option<Graph> = None;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') || line.split_whitespace().next() == Some("t") {
            if let Some(done) = current.take() {
                graphs.push(done);
            }
            current = Some(Graph::new(GraphId(graphs.len() as u64)));
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(graph) = current.as_mut() else {
            return Err(MotifdexError::parse(
                line_no,
                "node or edge line before the first graph marker",
            ));
        };

        match tokens[0] {
            "v" => {
                expect_tokens(&tokens, 3, line_no)?;
                let node = NodeId(parse_int(tokens[1], line_no)?);
                let label = parse_label(tokens[2], line_no)?;
                graph.add_node(node, label).map_err(|_| {
                    MotifdexError::parse(line_no, format!("duplicate node id {}", node))
                })?;
            }
            "e" => {
                expect_tokens(&tokens, 4, line_no)?;
                let source = NodeId(parse_int(tokens[1], line_no)?);
                let target = NodeId(parse_int(tokens[2], line_no)?);
                let label = parse_label(tokens[3], line_no)?;
                graph
                    .add_edge(source, target, label)
                    .map_err(|err| match err {
                        MotifdexError::DanglingEdge { node, .. } => MotifdexError::DanglingEdge {
                            line: line_no,
                            node,
                        },
                        other => other,
                    })?;
            }
            tag => {
                return Err(MotifdexError::parse(
                    line_no,
                    format!("unknown line tag '{}'", tag),
                ));
            }
        }
    }

    if let Some(done) = current {
        graphs.push(done);
    }
    Ok(graphs)
}

/// Read and parse a dataset file.
pub fn parse_file(path: &Path) -> Result<Vec<Graph>, MotifdexError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        MotifdexError::IoError(format!("Cannot read dataset '{}': {}", path.display(), e))
    })?;
    parse(&text)
}

/// Drop literal duplicates, keeping the first occurrence of each canonical
/// signature in input order, and renumber survivors from 0.
#[must_use]
pub fn deduplicate(graphs: Vec<Graph>) -> Vec<Graph> {
    let mut seen: BTreeSet<CanonicalGraph> = BTreeSet::new();
    let mut unique = Vec::with_capacity(graphs.len());

    for mut graph in graphs {
        if seen.insert(graph.canonical()) {
            graph.set_id(GraphId(unique.len() as u64));
            unique.push(graph);
        }
    }

    unique
}

/// Serialize graphs back into the dataset format accepted by [`parse`].
#[must_use]
pub fn write_dataset(graphs: &[Graph]) -> String {
    let mut out = String::new();
    for graph in graphs {
        out.push_str("#\n");
        for (node, label) in graph.nodes() {
            out.push_str(&format!("v {} {}\n", node, label.value()));
        }
        for edge in graph.edges() {
            out.push_str(&format!(
                "e {} {} {}\n",
                edge.source,
                edge.target,
                edge.label.value()
            ));
        }
    }
    out
}

// =============================================================================
// TOKEN HELPERS
// =============================================================================

fn expect_tokens(tokens: &[&str], expected: usize, line: usize) -> Result<(), MotifdexError> {
    if tokens.len() != expected {
        return Err(MotifdexError::parse(
            line,
            format!("expected {} tokens, found {}", expected, tokens.len()),
        ));
    }
    Ok(())
}

fn parse_int<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, MotifdexError> {
    token
        .parse::<T>()
        .map_err(|_| MotifdexError::parse(line, format!("invalid integer '{}'", token)))
}

fn parse_label(token: &str, line: usize) -> Result<Label, MotifdexError> {
    let label = Label::new(parse_int(token, line)?);
    if label.is_any() {
        return Err(MotifdexError::parse(
            line,
            format!("label {} is reserved", token),
        ));
    }
    Ok(label)
}

// =============================================================================
// TESTS
// =============================================================================
