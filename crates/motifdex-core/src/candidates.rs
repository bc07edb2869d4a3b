//! # Candidate Generation
//!
//! Feature-space filtering for containment queries.
//!
//! A database row dominates a query row when it has a 1 wherever the query
//! has a 1. Any graph containing the query also contains every pattern the
//! query contains, so the dominating rows are a sound superset of the true
//! answers.

use crate::MotifdexError;
use crate::features::FeatureMatrix;
use rayon::prelude::*;

/// Database rows that survive filtering for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    /// Query row index.
    pub query: usize,
    /// Dominating database row indices, increasing.
    pub candidates: Vec<usize>,
}

impl CandidateSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// `db_row >= query_row` component-wise, stopping at the first violation.
#[must_use]
pub fn dominates(db_row: &[u8], query_row: &[u8]) -> bool {
    db_row
        .iter()
        .zip(query_row)
        .all(|(&d, &q)| q == 0 || d == 1)
}

/// Computes candidate sets from database and query feature matrices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateGenerator;

impl CandidateGenerator {
    /// One [`CandidateSet`] per query row, in query order.
    ///
    /// Both matrices must share the same column count.
    pub fn generate(
        db: &FeatureMatrix,
        query: &FeatureMatrix,
    ) -> Result<Vec<CandidateSet>, MotifdexError> {
        if db.cols() != query.cols() {
            return Err(MotifdexError::ShapeMismatch {
                db_cols: db.cols(),
                query_cols: query.cols(),
            });
        }

        let db_rows: Vec<&[u8]> = db.iter_rows().collect();
        let query_rows: Vec<&[u8]> = query.iter_rows().collect();

        let sets = query_rows
            .par_iter()
            .enumerate()
            .map(|(i, q)| CandidateSet {
                query: i,
                candidates: db_rows
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| dominates(d, q))
                    .map(|(j, _)| j)
                    .collect(),
            })
            .collect();
        Ok(sets)
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Summary of candidate list sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateStats {
    pub queries: usize,
    pub total: usize,
    pub average: f64,
    pub min: usize,
    pub max: usize,
}

impl CandidateStats {
    /// Summarize `sets`. All fields are zero for an empty slice.
    #[must_use]
    pub fn from_sets(sets: &[CandidateSet]) -> Self {
        let sizes = sets.iter().map(CandidateSet::len);
        let total: usize = sizes.clone().sum();
        Self {
            queries: sets.len(),
            total,
            average: if sets.is_empty() {
                0.0
            } else {
                total as f64 / sets.len() as f64
            },
            min: sizes.clone().min().unwrap_or(0),
            max: sizes.max().unwrap_or(0),
        }
    }
}

impl std::fmt::Display for CandidateStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Total candidates: {}, average per query: {:.2}, min: {}, max: {}",
            self.total, self.average, self.min, self.max
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
