//! Mine frequent subgraphs, keep the most discriminative ones and save them
//! as a pattern index.

use clap::Parser;
use motifdex::{PipelineConfig, commands, telemetry};
use std::path::PathBuf;
use std::process::ExitCode;

/// Identify discriminative subgraphs of a graph database.
#[derive(Parser, Debug)]
#[command(name = "identify-discriminative")]
#[command(version, about, long_about = None)]
struct Args {
    /// Graph dataset in the `t/v/e` text format
    dataset_path: PathBuf,

    /// Where to write the pattern index (a directory gets `patterns.bin`)
    output_path: PathBuf,

    /// gSpan-compatible miner executable
    #[arg(default_value = "./gSpan")]
    miner_executable_path: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init();

    let config = match PipelineConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return commands::finish::<()>(Err(e)),
    };

    commands::finish(
        commands::identify_discriminative(
            &args.dataset_path,
            &args.output_path,
            &args.miner_executable_path,
            &config,
        )
        .await,
    )
}
