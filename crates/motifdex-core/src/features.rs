//! # Feature Indexing
//!
//! Turns graphs into binary feature vectors over a pattern index.
//!
//! `matrix[i][j] == 1` iff pattern `j` is subgraph-isomorphic to graph `i`.
//! Rows follow graph order, columns follow pattern order.

use crate::MotifdexError;
use crate::graph::Graph;
use crate::isomorphism::Matcher;
use crate::pattern::SubgraphPattern;
use rayon::prelude::*;

// =============================================================================
// FEATURE MATRIX
// =============================================================================

/// Dense row-major binary matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl FeatureMatrix {
    /// An all-zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Build from explicit rows. Every row must have the same width and hold
    /// only 0 or 1.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, MotifdexError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MotifdexError::SerializationError(format!(
                    "Row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::from_cells(rows.len(), cols, cells)
    }

    /// Build from row-major cells.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<u8>) -> Result<Self, MotifdexError> {
        if cells.len() != rows * cols {
            return Err(MotifdexError::SerializationError(format!(
                "Expected {} cells for a {}x{} matrix, found {}",
                rows * cols,
                rows,
                cols,
                cells.len()
            )));
        }
        if let Some(pos) = cells.iter().position(|&c| c > 1) {
            return Err(MotifdexError::SerializationError(format!(
                "Non-binary value {} at row {}, column {}",
                cells[pos],
                pos / cols.max(1),
                pos % cols.max(1)
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[row * self.cols + col])
    }

    /// Row slice, or `None` when out of bounds.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows {
            return None;
        }
        Some(&self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.rows).map(move |r| &self.cells[r * self.cols..(r + 1) * self.cols])
    }

    /// Row-major cells.
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Number of set cells.
    #[must_use]
    pub fn ones(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Fraction of zero cells. An empty matrix has sparsity 0.
    #[must_use]
    pub fn sparsity(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        1.0 - self.ones() as f64 / self.cells.len() as f64
    }
}

// =============================================================================
// INDEXER
// =============================================================================

/// Computes feature matrices against a fixed pattern index.
#[derive(Debug, Clone)]
pub struct FeatureIndexer {
    matchers: Vec<Matcher>,
}

impl FeatureIndexer {
    /// Prepare one matcher per pattern, in index order.
    #[must_use]
    pub fn new(patterns: &[SubgraphPattern]) -> Self {
        Self {
            matchers: patterns.iter().map(|p| Matcher::new(&p.graph)).collect(),
        }
    }

    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.matchers.len()
    }

    /// One row per graph, computed in parallel; row order is graph order.
    #[must_use]
    pub fn index(&self, graphs: &[Graph]) -> FeatureMatrix {
        let cols = self.matchers.len();
        let rows: Vec<Vec<u8>> = graphs
            .par_iter()
            .map(|graph| {
                let target = graph.adjacency();
                self.matchers
                    .iter()
                    .map(|m| u8::from(m.matches_adjacency(&target)))
                    .collect()
            })
            .collect();

        let cells: Vec<u8> = rows.into_iter().flatten().collect();
        FeatureMatrix {
            rows: graphs.len(),
            cols,
            cells,
        }
    }

    /// Build the feature matrix of `graphs` over `patterns`.
    #[must_use]
    pub fn build(graphs: &[Graph], patterns: &[SubgraphPattern]) -> FeatureMatrix {
        let matrix = Self::new(patterns).index(graphs);
        tracing::debug!(
            "Indexed {} graphs over {} patterns ({} set cells)",
            matrix.rows(),
            matrix.cols(),
            matrix.ones()
        );
        matrix
    }
}

// =============================================================================
// TESTS
// =============================================================================
