//! # Command Implementations
//!
//! The three pipeline tools, callable from the binaries and from tests.
//!
//! Progress lines go to stdout; diagnostics go through `tracing`.

use crate::config::PipelineConfig;
use crate::miner::PatternMiningStrategy;
use motifdex_core::formats::{load_index, load_matrix, save_candidates, save_index, save_matrix};
use motifdex_core::{
    CandidateGenerator, CandidateStats, DiscriminativeSelector, FeatureIndexer, FeatureMatrix,
    MotifdexError, deduplicate, parse_file,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Map a command result to the process exit code, logging fatal errors.
pub fn finish<T>(result: Result<T, MotifdexError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// IDENTIFY DISCRIMINATIVE
// =============================================================================

/// Mine, select and save the discriminative pattern index.
///
/// Returns the path of the written index blob.
pub async fn identify_discriminative(
    dataset_path: &Path,
    output_path: &Path,
    miner_path: &Path,
    config: &PipelineConfig,
) -> Result<PathBuf, MotifdexError> {
    println!("=== Step 1: Loading and preprocessing graphs ===");
    let graphs = parse_file(dataset_path)?;
    println!("Loaded {} graphs", graphs.len());
    let graphs = deduplicate(graphs);
    println!("After removing duplicates: {} graphs", graphs.len());

    println!();
    println!("=== Step 2: Mining frequent subgraphs ===");
    let strategy = PatternMiningStrategy::probe(miner_path, config);
    let patterns = strategy
        .mine_or_fallback(&graphs, config.miner_support_fraction())
        .await;
    println!("Mined {} patterns", patterns.len());

    println!();
    println!("=== Step 3: Selecting discriminative subgraphs ===");
    let selected = DiscriminativeSelector::new(config.selection()).select(patterns, graphs.len());
    if selected.is_empty() {
        return Err(MotifdexError::EmptyIndex);
    }
    println!("Selected {} discriminative subgraphs", selected.len());

    println!();
    println!("=== Step 4: Saving discriminative subgraphs ===");
    let written = save_index(output_path, &selected)?;
    println!("Saved discriminative subgraphs to {}", written.display());
    println!(
        "Saved human-readable version to {}",
        motifdex_core::formats::listing_path(&written).display()
    );
    Ok(written)
}

// =============================================================================
// CONVERT FEATURES
// =============================================================================

/// Encode every graph of a dataset over a saved pattern index.
pub fn convert_features(
    graphs_path: &Path,
    patterns_path: &Path,
    output_path: &Path,
) -> Result<FeatureMatrix, MotifdexError> {
    println!("=== Step 1: Loading graphs ===");
    let graphs = parse_file(graphs_path)?;
    println!("Loaded {} graphs", graphs.len());

    println!();
    println!("=== Step 2: Loading discriminative patterns ===");
    let patterns = load_index(patterns_path)?;
    println!("Loaded {} discriminative patterns", patterns.len());
    if patterns.is_empty() {
        tracing::warn!("Pattern index is empty; every feature vector will have zero width");
    }

    println!();
    println!("=== Step 3: Converting to feature vectors ===");
    println!(
        "Converting {} graphs using {} patterns...",
        graphs.len(),
        patterns.len()
    );
    let matrix = FeatureIndexer::build(&graphs, &patterns);
    println!("Feature matrix shape: ({}, {})", matrix.rows(), matrix.cols());
    println!("Sparsity: {:.2}% zeros", matrix.sparsity() * 100.0);

    println!();
    println!("=== Step 4: Saving feature vectors ===");
    save_matrix(output_path, &matrix)?;
    println!("Saved feature vectors to {}", output_path.display());
    Ok(matrix)
}

// =============================================================================
// GENERATE CANDIDATES
// =============================================================================

/// Compute and save candidate sets for every query.
pub fn generate_candidates(
    db_features_path: &Path,
    query_features_path: &Path,
    output_path: &Path,
) -> Result<CandidateStats, MotifdexError> {
    println!("=== Step 1: Loading feature vectors ===");
    let db = load_matrix(db_features_path)?;
    let query = load_matrix(query_features_path)?;
    println!("Database features shape: ({}, {})", db.rows(), db.cols());
    println!("Query features shape: ({}, {})", query.rows(), query.cols());

    println!();
    println!("=== Step 2: Generating candidates ===");
    println!(
        "Generating candidates for {} queries from {} database graphs...",
        query.rows(),
        db.rows()
    );
    let sets = CandidateGenerator::generate(&db, &query)?;

    println!();
    println!("=== Step 3: Writing candidates file ===");
    save_candidates(output_path, &sets)?;
    println!("Wrote candidates to {}", output_path.display());

    let stats = CandidateStats::from_sets(&sets);
    println!();
    println!("Statistics:");
    println!("  Total queries: {}", stats.queries);
    println!("  Total candidates: {}", stats.total);
    println!("  Average candidates per query: {:.2}", stats.average);
    println!("  Min candidates: {}", stats.min);
    println!("  Max candidates: {}", stats.max);
    tracing::info!("{}", stats);
    Ok(stats)
}
