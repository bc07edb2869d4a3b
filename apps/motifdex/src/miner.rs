//! # Pattern Mining Strategies
//!
//! One capability, `mine(graphs, min_support_fraction)`, with two strategies:
//!
//! - `External`: an out-of-process gSpan-compatible miner, driven through the
//!   text protocol in `motifdex_core::formats::gspan`
//! - `Fallback`: the built-in motif enumerator, always available
//!
//! The strategy is chosen by probing for the miner executable. Any failure
//! of the external miner is reported as `MinerUnavailable`; the pipeline then
//! logs a warning and mines with the fallback instead.

use crate::config::PipelineConfig;
use motifdex_core::formats::{parse_gspan_output, write_gspan_input};
use motifdex_core::{FallbackEnumerator, Graph, MotifdexError, SubgraphPattern};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

// =============================================================================
// EXTERNAL MINER
// =============================================================================

/// Adapter around an external frequent-subgraph miner executable.
///
/// Invocation: `<exe> -f <input> -s <support_pct> -o <output> -i`.
#[derive(Debug, Clone)]
pub struct ExternalMiner {
    executable: PathBuf,
    timeout: Duration,
}

impl ExternalMiner {
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Locate the executable: `path` itself, else `path.exe`.
    #[must_use]
    pub fn probe(path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        let mut with_ext = path.as_os_str().to_owned();
        with_ext.push(".exe");
        let with_ext = PathBuf::from(with_ext);
        with_ext.is_file().then_some(with_ext)
    }

    /// Run the miner over `graphs` and parse its patterns.
    ///
    /// The process is killed when the timeout expires.
    pub async fn mine(
        &self,
        graphs: &[Graph],
        min_support_fraction: f64,
    ) -> Result<Vec<SubgraphPattern>, MotifdexError> {
        let unavailable = |reason: String| MotifdexError::MinerUnavailable(reason);

        let workdir = tempfile::tempdir()
            .map_err(|e| unavailable(format!("cannot create work directory: {}", e)))?;
        let input = workdir.path().join("graphs.gspan");
        let output = workdir.path().join("patterns.out");

        tokio::fs::write(&input, write_gspan_input(graphs))
            .await
            .map_err(|e| unavailable(format!("cannot write miner input: {}", e)))?;

        let support_pct = min_support_fraction * 100.0;
        let mut command = tokio::process::Command::new(&self.executable);
        command
            .arg("-f")
            .arg(&input)
            .arg("-s")
            .arg(support_pct.to_string())
            .arg("-o")
            .arg(&output)
            .arg("-i")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::info!(
            "Running {} with min support {}%",
            self.executable.display(),
            support_pct
        );

        let finished = match tokio::time::timeout(self.timeout, command.output()).await {
            Err(_) => {
                return Err(unavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
            Ok(Err(e)) => {
                return Err(unavailable(format!(
                    "cannot run '{}': {}",
                    self.executable.display(),
                    e
                )));
            }
            Ok(Ok(finished)) => finished,
        };

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(unavailable(format!(
                "exited with {}: {}",
                finished.status,
                stderr.trim()
            )));
        }

        let text = tokio::fs::read_to_string(&output)
            .await
            .map_err(|e| unavailable(format!("no output file: {}", e)))?;
        let patterns = parse_gspan_output(&text)
            .map_err(|e| unavailable(format!("unparsable output: {}", e)))?;
        if patterns.is_empty() {
            return Err(unavailable("no patterns in output".to_string()));
        }

        tracing::info!("External miner produced {} patterns", patterns.len());
        Ok(patterns)
    }
}

// =============================================================================
// STRATEGY
// =============================================================================

/// How patterns are mined for one run.
#[derive(Debug, Clone)]
pub enum PatternMiningStrategy {
    External(ExternalMiner),
    Fallback(FallbackEnumerator),
}

impl PatternMiningStrategy {
    /// Use the external miner at `executable` if it exists, the fallback
    /// enumerator otherwise.
    #[must_use]
    pub fn probe(executable: &Path, config: &PipelineConfig) -> Self {
        match ExternalMiner::probe(executable) {
            Some(found) => {
                tracing::info!("Using external miner at {}", found.display());
                Self::External(ExternalMiner::new(found, config.miner_timeout()))
            }
            None => {
                tracing::info!(
                    "External miner not found at {}; using the built-in enumerator",
                    executable.display()
                );
                Self::Fallback(FallbackEnumerator::new())
            }
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::External(_) => "external",
            Self::Fallback(_) => "fallback",
        }
    }

    /// Mine with this strategy only.
    pub async fn mine(
        &self,
        graphs: &[Graph],
        min_support_fraction: f64,
    ) -> Result<Vec<SubgraphPattern>, MotifdexError> {
        match self {
            Self::External(miner) => miner.mine(graphs, min_support_fraction).await,
            Self::Fallback(enumerator) => Ok(enumerator.mine(graphs, min_support_fraction)),
        }
    }

    /// Mine, degrading to the fallback enumerator when the external miner
    /// is unavailable.
    pub async fn mine_or_fallback(
        &self,
        graphs: &[Graph],
        min_support_fraction: f64,
    ) -> Vec<SubgraphPattern> {
        match self.mine(graphs, min_support_fraction).await {
            Ok(patterns) => patterns,
            Err(e) => {
                tracing::warn!("{}; falling back to the built-in enumerator", e);
                FallbackEnumerator::new().mine(graphs, min_support_fraction)
            }
        }
    }
}
