//! Encode graphs as binary feature vectors over a saved pattern index.

use clap::Parser;
use motifdex::{commands, telemetry};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert graphs to feature vectors.
#[derive(Parser, Debug)]
#[command(name = "convert-features")]
#[command(version, about, long_about = None)]
struct Args {
    /// Graph dataset in the `t/v/e` text format
    graphs_path: PathBuf,

    /// Pattern index written by identify-discriminative
    patterns_path: PathBuf,

    /// Output `.npy` feature matrix
    output_path: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init();

    commands::finish(commands::convert_features(
        &args.graphs_path,
        &args.patterns_path,
        &args.output_path,
    ))
}
