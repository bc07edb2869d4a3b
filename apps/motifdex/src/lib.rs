//! # Motifdex Tools
//!
//! Process-facing layer of the indexing pipeline: configuration layering,
//! tracing setup, the external miner adapter and the three command
//! implementations used by the binaries.
//!
//! ```text
//! dataset ──identify-discriminative──▶ patterns.bin (+ .txt listing)
//! graphs + patterns.bin ──convert-features──▶ features.npy
//! db.npy + query.npy ──generate-candidates──▶ candidates.txt
//! ```
//!
//! All graph semantics live in `motifdex-core`.

pub mod commands;
pub mod config;
pub mod miner;
pub mod telemetry;

pub use config::PipelineConfig;
pub use miner::{ExternalMiner, PatternMiningStrategy};
