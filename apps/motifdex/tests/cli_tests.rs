//! End-to-end runs of the built binaries.
//!
//! Each run gets a scrubbed environment and a temporary working directory so
//! no local `motifdex.toml` or log settings leak in.

use motifdex_core::FeatureMatrix;
use motifdex_core::formats::save_matrix;
use std::path::Path;
use std::process::{Command, Output};

const SINGLE_EDGES: &str = "\
t # 0
v 0 1
v 1 2
e 0 1 7
t # 1
v 0 1
v 1 3
e 0 1 7
";

fn run(exe: &str, cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(exe);
    command
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("MOTIFDEX_LOG_FORMAT")
        .env_remove("MOTIFDEX_CONFIG")
        .env_remove("MOTIFDEX_TOP_K")
        .env_remove("MOTIFDEX_MINER_SUPPORT_PCT")
        .env_remove("MOTIFDEX_MINER_TIMEOUT_SECS")
        .env("NO_COLOR", "1");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("run binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_matrices(dir: &Path) {
    let db = FeatureMatrix::from_rows(vec![vec![1, 0], vec![1, 1]]).expect("db");
    let query = FeatureMatrix::from_rows(vec![vec![1, 0]]).expect("query");
    save_matrix(&dir.join("db.npy"), &db).expect("save db");
    save_matrix(&dir.join("query.npy"), &query).expect("save query");
}

// =============================================================================
// DIAGNOSTICS ON STDOUT
// =============================================================================

#[test]
fn selection_fallback_warning_is_printed_in_step_order() {
    let dir = tempfile::tempdir().expect("dir");
    std::fs::write(dir.path().join("ds.txt"), SINGLE_EDGES).expect("write");

    let output = run(
        env!("CARGO_BIN_EXE_identify-discriminative"),
        dir.path(),
        &["ds.txt", "out.bin", "./no-such-gSpan"],
        &[],
    );
    assert!(output.status.success());
    assert!(dir.path().join("out.bin").is_file());

    let text = stdout(&output);
    let step = text
        .find("=== Step 3: Selecting discriminative subgraphs ===")
        .expect("step 3 header on stdout");
    let warning = text
        .find("No patterns passed the filters")
        .expect("fallback warning on stdout");
    assert!(step < warning);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("No patterns passed"));
}

#[test]
fn fatal_error_is_printed_on_stdout_with_exit_one() {
    let dir = tempfile::tempdir().expect("dir");

    let output = run(
        env!("CARGO_BIN_EXE_identify-discriminative"),
        dir.path(),
        &["absent.txt", "out.bin"],
        &[],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("Error:"));
    assert!(stdout(&output).contains("absent.txt"));
}

// =============================================================================
// CONFIGURATION SCOPE
// =============================================================================

#[test]
fn identify_rejects_invalid_local_config() {
    let dir = tempfile::tempdir().expect("dir");
    std::fs::write(dir.path().join("ds.txt"), SINGLE_EDGES).expect("write");
    std::fs::write(dir.path().join("motifdex.toml"), "top_k = 0\n").expect("write");

    let output = run(
        env!("CARGO_BIN_EXE_identify-discriminative"),
        dir.path(),
        &["ds.txt", "out.bin", "./no-such-gSpan"],
        &[],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("out.bin").exists());
}

#[test]
fn candidates_ignore_pipeline_config() {
    let dir = tempfile::tempdir().expect("dir");
    write_matrices(dir.path());
    let toml = dir.path().join("motifdex.toml");
    std::fs::write(&toml, "top_k = 0\n").expect("write");
    let toml = toml.to_string_lossy().to_string();

    let output = run(
        env!("CARGO_BIN_EXE_generate-candidates"),
        dir.path(),
        &["db.npy", "query.npy", "cand.txt"],
        &[("MOTIFDEX_CONFIG", &toml)],
    );
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("cand.txt")).expect("read"),
        "q # 0\nc # 0 1\n"
    );
}

#[test]
fn config_flag_only_on_identify() {
    let dir = tempfile::tempdir().expect("dir");
    write_matrices(dir.path());

    let candidates = run(
        env!("CARGO_BIN_EXE_generate-candidates"),
        dir.path(),
        &["db.npy", "query.npy", "cand.txt", "--config", "x.toml"],
        &[],
    );
    assert_eq!(candidates.status.code(), Some(2));

    let features = run(
        env!("CARGO_BIN_EXE_convert-features"),
        dir.path(),
        &["ds.txt", "patterns.bin", "out.npy", "--config", "x.toml"],
        &[],
    );
    assert_eq!(features.status.code(), Some(2));
}
