//! # Pattern Index Artifact
//!
//! Versioned binary encoding of the selected patterns, plus a human-readable
//! listing written next to it.
//!
//! Format:
//! ```text
//! [header_len: u32 LE] [IndexHeader (postcard)] [Vec<PatternRecord> (postcard)]
//! ```
//!
//! Loading validates, before and after decoding the records:
//! - data length and header length
//! - magic bytes and version
//! - pattern count limit
//! - record count and checksum

use crate::graph::{CanonicalGraph, Graph};
use crate::pattern::SubgraphPattern;
use crate::primitives::{
    DEFAULT_INDEX_FILE_NAME, INDEX_FORMAT_VERSION, INDEX_MAGIC, LISTING_EXTENSION,
    MAX_ARTIFACT_SIZE, MAX_INDEX_PATTERNS,
};
use crate::{GraphId, Label, MotifdexError, NodeId, PatternId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// HEADER
// =============================================================================

/// Header of a pattern index blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub pattern_count: u64,
    /// XOR/rotate checksum over the records.
    pub checksum: u64,
}

impl IndexHeader {
    #[must_use]
    pub fn new(pattern_count: u64, checksum: u64) -> Self {
        Self {
            magic: *INDEX_MAGIC,
            version: INDEX_FORMAT_VERSION,
            pattern_count,
            checksum,
        }
    }

    /// Check magic, version and count limit.
    pub fn validate(&self) -> Result<(), MotifdexError> {
        if &self.magic != INDEX_MAGIC {
            return Err(MotifdexError::SerializationError(
                "Invalid file format".to_string(),
            ));
        }
        if self.version != INDEX_FORMAT_VERSION {
            return Err(MotifdexError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, INDEX_FORMAT_VERSION
            )));
        }
        if self.pattern_count > MAX_INDEX_PATTERNS {
            return Err(MotifdexError::SerializationError(format!(
                "Pattern count {} exceeds maximum allowed {}",
                self.pattern_count, MAX_INDEX_PATTERNS
            )));
        }
        Ok(())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One pattern in the index. Edges keep their body order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternRecord {
    pub id: u64,
    /// `(node_id, label)` sorted by node id.
    pub nodes: Vec<(u64, i64)>,
    /// `(source, target, label)`.
    pub edges: Vec<(u64, u64, i64)>,
    pub support: u64,
    pub graph_ids: Vec<u64>,
    pub score: f64,
}

impl From<&SubgraphPattern> for PatternRecord {
    fn from(pattern: &SubgraphPattern) -> Self {
        Self {
            id: pattern.id.0,
            nodes: pattern
                .graph
                .nodes()
                .map(|(id, label)| (id.0, label.value()))
                .collect(),
            edges: pattern
                .graph
                .edges()
                .iter()
                .map(|e| (e.source.0, e.target.0, e.label.value()))
                .collect(),
            support: pattern.support as u64,
            graph_ids: pattern.graph_ids.iter().map(|g| g.0).collect(),
            score: pattern.discriminative_score,
        }
    }
}

impl PatternRecord {
    /// Rebuild the pattern, rejecting bodies that violate graph invariants.
    pub fn into_pattern(self) -> Result<SubgraphPattern, MotifdexError> {
        let corrupt = |e: MotifdexError| {
            MotifdexError::SerializationError(format!("Pattern {}: {}", self.id, e))
        };
        let mut body = Graph::new(GraphId(self.id));
        for &(node, label) in &self.nodes {
            body.add_node(NodeId(node), Label::new(label))
                .map_err(corrupt)?;
        }
        for &(source, target, label) in &self.edges {
            body.add_edge(NodeId(source), NodeId(target), Label::new(label))
                .map_err(corrupt)?;
        }
        let mut pattern = SubgraphPattern::with_support(
            PatternId(self.id),
            body,
            self.support as usize,
            self.graph_ids.iter().map(|&g| GraphId(g)).collect(),
        );
        pattern.discriminative_score = self.score;
        Ok(pattern)
    }

    fn checksum(&self) -> u64 {
        let mut edges = self.edges.clone();
        edges.sort_unstable();
        let body = CanonicalGraph {
            nodes: self.nodes.clone(),
            edges,
        };
        let mut hash = body.checksum();
        hash ^= self.id.rotate_left(19);
        hash ^= self.support.rotate_left(23);
        for &g in &self.graph_ids {
            hash ^= g.rotate_left(29);
        }
        hash ^= self.score.to_bits().rotate_left(3);
        hash
    }
}

/// Checksum over records; position-sensitive.
fn records_checksum(records: &[PatternRecord]) -> u64 {
    records
        .iter()
        .enumerate()
        .fold(0u64, |acc, (index, record)| {
            acc ^ record.checksum().rotate_left((index % 64) as u32)
        })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encode patterns as a pattern index blob.
pub fn index_to_bytes(patterns: &[SubgraphPattern]) -> Result<Vec<u8>, MotifdexError> {
    let records: Vec<PatternRecord> = patterns.iter().map(PatternRecord::from).collect();
    let header = IndexHeader::new(records.len() as u64, records_checksum(&records));

    let header_bytes = postcard::to_allocvec(&header)
        .map_err(|e| MotifdexError::SerializationError(format!("Header: {}", e)))?;
    let data_bytes = postcard::to_allocvec(&records)
        .map_err(|e| MotifdexError::SerializationError(format!("Data: {}", e)))?;

    let mut result = Vec::with_capacity(4 + header_bytes.len() + data_bytes.len());
    result.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    result.extend_from_slice(&header_bytes);
    result.extend_from_slice(&data_bytes);
    Ok(result)
}

/// Decode a pattern index blob.
pub fn index_from_bytes(data: &[u8]) -> Result<Vec<SubgraphPattern>, MotifdexError> {
    if data.len() < 4 {
        return Err(MotifdexError::SerializationError(
            "Data too short".to_string(),
        ));
    }
    let header_len = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < 4 + header_len {
        return Err(MotifdexError::SerializationError(
            "Data too short for header".to_string(),
        ));
    }

    let header: IndexHeader = postcard::from_bytes(&data[4..4 + header_len])
        .map_err(|e| MotifdexError::SerializationError(format!("Header: {}", e)))?;
    header.validate()?;

    let (records, rest): (Vec<PatternRecord>, &[u8]) =
        postcard::take_from_bytes(&data[4 + header_len..])
            .map_err(|e| MotifdexError::SerializationError(format!("Data: {}", e)))?;
    if !rest.is_empty() {
        return Err(MotifdexError::SerializationError(format!(
            "{} trailing bytes after the pattern records",
            rest.len()
        )));
    }

    if records.len() as u64 != header.pattern_count {
        return Err(MotifdexError::SerializationError(format!(
            "Record count mismatch: header says {}, found {}",
            header.pattern_count,
            records.len()
        )));
    }
    if records_checksum(&records) != header.checksum {
        return Err(MotifdexError::SerializationError(
            "Checksum mismatch: data may be corrupted".to_string(),
        ));
    }

    records.into_iter().map(PatternRecord::into_pattern).collect()
}

// =============================================================================
// LISTING
// =============================================================================

/// Human-readable listing of an index.
#[must_use]
pub fn render_listing(patterns: &[SubgraphPattern]) -> String {
    let mut out = format!("# {} Discriminative Subgraphs\n\n", patterns.len());
    for (index, pattern) in patterns.iter().enumerate() {
        let labels: Vec<String> = pattern
            .graph
            .nodes()
            .map(|(_, label)| label.to_string())
            .collect();
        let edges: Vec<String> = pattern
            .graph
            .edges()
            .iter()
            .map(|e| format!("({}, {}, {})", e.source, e.target, e.label))
            .collect();

        out.push_str(&format!("Pattern {} (id {}):\n", index, pattern.id));
        out.push_str(&format!(
            "  Nodes: {}, Edges: {}\n",
            pattern.node_count(),
            pattern.edge_count()
        ));
        out.push_str(&format!("  Support: {}\n", pattern.support));
        out.push_str(&format!(
            "  Discriminative Score: {:.4}\n",
            pattern.discriminative_score
        ));
        out.push_str(&format!("  Node labels: [{}]\n", labels.join(", ")));
        out.push_str(&format!("  Edges: [{}]\n\n", edges.join(", ")));
    }
    out
}

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Where the blob for `path` goes: `path` itself, or `path/patterns.bin`
/// when `path` is an existing directory.
#[must_use]
pub fn resolve_index_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(DEFAULT_INDEX_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

/// `<blob path>.txt`.
#[must_use]
pub fn listing_path(blob: &Path) -> PathBuf {
    let mut name = blob.as_os_str().to_owned();
    name.push(".");
    name.push(LISTING_EXTENSION);
    PathBuf::from(name)
}

fn io_error(path: &Path, e: std::io::Error) -> MotifdexError {
    MotifdexError::IoError(format!("'{}': {}", path.display(), e))
}

/// Write the blob and its listing. Creates missing parent directories.
/// Returns the blob path actually written.
pub fn save_index(path: &Path, patterns: &[SubgraphPattern]) -> Result<PathBuf, MotifdexError> {
    let blob = resolve_index_path(path);
    if let Some(parent) = blob.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    std::fs::write(&blob, index_to_bytes(patterns)?).map_err(|e| io_error(&blob, e))?;
    let listing = listing_path(&blob);
    std::fs::write(&listing, render_listing(patterns)).map_err(|e| io_error(&listing, e))?;

    tracing::debug!("Wrote {} patterns to {}", patterns.len(), blob.display());
    Ok(blob)
}

/// Read a blob written by [`save_index`]. A directory resolves to the
/// default file name inside it.
pub fn load_index(path: &Path) -> Result<Vec<SubgraphPattern>, MotifdexError> {
    let blob = resolve_index_path(path);
    let size = std::fs::metadata(&blob)
        .map_err(|e| io_error(&blob, e))?
        .len();
    if size > MAX_ARTIFACT_SIZE {
        return Err(MotifdexError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            size, MAX_ARTIFACT_SIZE
        )));
    }
    let data = std::fs::read(&blob).map_err(|e| io_error(&blob, e))?;
    index_from_bytes(&data)
}

// =============================================================================
// TESTS
// =============================================================================
