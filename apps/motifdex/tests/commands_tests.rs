//! Command-level pipeline runs against temporary directories.
//!
//! The miner path never exists here, so mining always uses the built-in
//! enumerator.

use motifdex::PipelineConfig;
use motifdex::commands::{convert_features, generate_candidates, identify_discriminative};
use motifdex_core::formats::{listing_path, load_index, parse_candidates, save_matrix};
use motifdex_core::{FeatureMatrix, MotifdexError};
use std::path::{Path, PathBuf};

const MOLECULES: &str = "\
t # 0
v 0 6
v 1 6
v 2 8
e 0 1 1
e 1 2 2
t # 1
v 0 6
v 1 8
e 0 1 2
t # 2
v 0 6
v 1 6
v 2 6
e 0 1 1
e 1 2 1
e 2 0 1
t # 3
v 0 7
v 1 6
e 0 1 1
t # 4
v 0 6
v 1 8
e 0 1 2
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write");
    path
}

fn no_miner(dir: &Path) -> PathBuf {
    dir.join("no-such-gSpan")
}

#[tokio::test]
async fn full_pipeline_round_trip() {
    let dir = tempfile::tempdir().expect("dir");
    let dataset = write(dir.path(), "molecules.txt", MOLECULES);
    let config = PipelineConfig {
        top_k: 5,
        ..PipelineConfig::default()
    };

    let blob = identify_discriminative(
        &dataset,
        &dir.path().join("index/patterns.bin"),
        &no_miner(dir.path()),
        &config,
    )
    .await
    .expect("identify");
    assert!(blob.is_file());
    assert!(listing_path(&blob).is_file());

    let patterns = load_index(&blob).expect("load index");
    assert!(!patterns.is_empty());
    assert!(patterns.len() <= 5);
    // Support is counted over the deduplicated database of four graphs.
    assert!(patterns.iter().all(|p| p.support <= 4));

    let features_path = dir.path().join("features.npy");
    let matrix = convert_features(&dataset, &blob, &features_path).expect("convert");
    assert_eq!(matrix.rows(), 5);
    assert_eq!(matrix.cols(), patterns.len());
    // Graphs 1 and 4 are identical, so their rows match.
    assert_eq!(matrix.row(1), matrix.row(4));

    let candidates_path = dir.path().join("out/candidates.txt");
    let stats =
        generate_candidates(&features_path, &features_path, &candidates_path).expect("generate");
    assert_eq!(stats.queries, 5);

    let text = std::fs::read_to_string(&candidates_path).expect("read candidates");
    let sets = parse_candidates(&text).expect("parse candidates");
    assert_eq!(sets.len(), 5);
    for (i, set) in sets.iter().enumerate() {
        assert_eq!(set.query, i);
        assert!(set.candidates.contains(&i), "query {} must match itself", i);
    }
    assert!(sets[1].candidates.contains(&4));
}

#[tokio::test]
async fn directory_output_gets_default_file_name() {
    let dir = tempfile::tempdir().expect("dir");
    let dataset = write(dir.path(), "molecules.txt", MOLECULES);
    let out_dir = dir.path().join("artifacts");
    std::fs::create_dir(&out_dir).expect("mkdir");

    let blob = identify_discriminative(
        &dataset,
        &out_dir,
        &no_miner(dir.path()),
        &PipelineConfig::default(),
    )
    .await
    .expect("identify");
    assert_eq!(blob, out_dir.join("patterns.bin"));
}

#[tokio::test]
async fn empty_dataset_yields_empty_index() {
    let dir = tempfile::tempdir().expect("dir");
    let dataset = write(dir.path(), "empty.txt", "");

    let result = identify_discriminative(
        &dataset,
        &dir.path().join("patterns.bin"),
        &no_miner(dir.path()),
        &PipelineConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(MotifdexError::EmptyIndex)));
    assert!(!dir.path().join("patterns.bin").exists());
}

#[tokio::test]
async fn malformed_dataset_is_fatal() {
    let dir = tempfile::tempdir().expect("dir");
    let dataset = write(dir.path(), "broken.txt", "t # 0\nv 0 1\ne 0 9 1\n");

    let result = identify_discriminative(
        &dataset,
        &dir.path().join("patterns.bin"),
        &no_miner(dir.path()),
        &PipelineConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(MotifdexError::DanglingEdge { line: 3, .. })));
}

#[test]
fn candidates_resolve_npy_suffix() {
    let dir = tempfile::tempdir().expect("dir");
    let db = FeatureMatrix::from_rows(vec![vec![1, 0], vec![1, 1]]).expect("db");
    let query = FeatureMatrix::from_rows(vec![vec![1, 0]]).expect("query");
    save_matrix(&dir.path().join("db.npy"), &db).expect("save db");
    save_matrix(&dir.path().join("query.npy"), &query).expect("save query");

    let output = dir.path().join("candidates.txt");
    let stats = generate_candidates(&dir.path().join("db"), &dir.path().join("query"), &output)
        .expect("generate");
    assert_eq!(stats.total, 2);
    assert_eq!(
        std::fs::read_to_string(&output).expect("read"),
        "q # 0\nc # 0 1\n"
    );
}

#[test]
fn mismatched_widths_rejected() {
    let dir = tempfile::tempdir().expect("dir");
    let db = FeatureMatrix::from_rows(vec![vec![1, 0, 1]]).expect("db");
    let query = FeatureMatrix::from_rows(vec![vec![1, 0]]).expect("query");
    let db_path = dir.path().join("db.npy");
    let query_path = dir.path().join("query.npy");
    save_matrix(&db_path, &db).expect("save db");
    save_matrix(&query_path, &query).expect("save query");

    let result = generate_candidates(&db_path, &query_path, &dir.path().join("c.txt"));
    assert!(matches!(
        result,
        Err(MotifdexError::ShapeMismatch {
            db_cols: 3,
            query_cols: 2
        })
    ));
}

#[test]
fn missing_index_is_reported() {
    let dir = tempfile::tempdir().expect("dir");
    let dataset = write(dir.path(), "molecules.txt", MOLECULES);
    let result = convert_features(
        &dataset,
        &dir.path().join("absent.bin"),
        &dir.path().join("features.npy"),
    );
    assert!(result.is_err());
}
