//! # gSpan Text Protocol
//!
//! Input handed to an external frequent-subgraph miner:
//! ```text
//! t # <graph_id>
//! v <node_id> <label>
//! e <source> <target> <label>
//! ```
//!
//! Output read back from it, one record per pattern:
//! ```text
//! t # <pattern_id> * <support>
//! v <node_id> <label>
//! e <source> <target> <label>
//! x: <graph_id> <graph_id> ...      (optional)
//! ```
//!
//! Lines with other tags are ignored.

use crate::graph::Graph;
use crate::pattern::SubgraphPattern;
use crate::{GraphId, Label, MotifdexError, NodeId, PatternId};
use std::collections::BTreeSet;

/// Serialize graphs into the miner's input format.
#[must_use]
pub fn write_gspan_input(graphs: &[Graph]) -> String {
    let mut out = String::new();
    for graph in graphs {
        out.push_str(&format!("t # {}\n", graph.id()));
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

/// A pattern record being accumulated.
struct Pending {
    graph: Graph,
    support: Option<usize>,
    graph_ids: BTreeSet<GraphId>,
}

impl Pending {
    fn finish(self, id: PatternId) -> SubgraphPattern {
        let support = self.support.unwrap_or(self.graph_ids.len());
        SubgraphPattern::with_support(id, self.graph, support, self.graph_ids)
    }
}

/// Parse miner output into unscored patterns with sequential ids.
pub fn parse_gspan_output(source: &str) -> Result<Vec<SubgraphPattern>, MotifdexError> {
    let mut patterns = Vec::new();
    let mut current: Option<Pending> = None;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let Some(&tag) = tokens.first() else {
            continue;
        };

        match tag {
            "t" if tokens.len() >= 3 => {
                if let Some(done) = current.take() {
                    patterns.push(done.finish(PatternId(patterns.len() as u64)));
                }
                let support = match tokens.iter().position(|&t| t == "*") {
                    Some(star) => match tokens.get(star + 1) {
                        Some(value) => Some(int(value, line_no)?),
                        None => None,
                    },
                    None => None,
                };
                current = Some(Pending {
                    graph: Graph::new(GraphId(patterns.len() as u64)),
                    support,
                    graph_ids: BTreeSet::new(),
                });
            }
            "v" => {
                let Some(pending) = current.as_mut() else {
                    continue;
                };
                if tokens.len() < 3 {
                    return Err(MotifdexError::parse(line_no, "vertex line needs an id and a label"));
                }
                let node = NodeId(int(tokens[1], line_no)?);
                let label = Label::new(int(tokens[2], line_no)?);
                pending.graph.add_node(node, label).map_err(|_| {
                    MotifdexError::parse(line_no, format!("duplicate vertex {}", node))
                })?;
            }
            "e" => {
                let Some(pending) = current.as_mut() else {
                    continue;
                };
                if tokens.len() < 4 {
                    return Err(MotifdexError::parse(
                        line_no,
                        "edge line needs two endpoints and a label",
                    ));
                }
                let source = NodeId(int(tokens[1], line_no)?);
                let target = NodeId(int(tokens[2], line_no)?);
                let label = Label::new(int(tokens[3], line_no)?);
                pending
                    .graph
                    .add_edge(source, target, label)
                    .map_err(|_| MotifdexError::DanglingEdge {
                        line: line_no,
                        node: if pending.graph.contains_node(source) {
                            target
                        } else {
                            source
                        },
                    })?;
            }
            "x:" => {
                if let Some(pending) = current.as_mut() {
                    for token in &tokens[1..] {
                        pending.graph_ids.insert(GraphId(int(token, line_no)?));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current {
        patterns.push(done.finish(PatternId(patterns.len() as u64)));
    }
    Ok(patterns)
}

fn int<T: std::str::FromStr>(token: &str, line: usize) -> Result<T, MotifdexError> {
    token
        .parse::<T>()
        .map_err(|_| MotifdexError::parse(line, format!("invalid integer '{}'", token)))
}
