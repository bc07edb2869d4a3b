//! Filter database graphs by feature-vector domination.

use clap::Parser;
use motifdex::{commands, telemetry};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate candidate sets for subgraph queries.
#[derive(Parser, Debug)]
#[command(name = "generate-candidates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Database feature matrix (`.npy`)
    db_features_path: PathBuf,

    /// Query feature matrix (`.npy`)
    query_features_path: PathBuf,

    /// Output candidates file
    output_path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init();

    commands::finish(commands::generate_candidates(
        &args.db_features_path,
        &args.query_features_path,
        &args.output_path,
    ))
}
