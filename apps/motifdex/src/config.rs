//! # Pipeline Configuration
//!
//! Layered hyper-parameters for the command-line tools.
//!
//! Resolution order (later layers win):
//! 1. Built-in defaults (`motifdex_core::primitives`)
//! 2. TOML file: `--config <path>`, else `MOTIFDEX_CONFIG`, else
//!    `./motifdex.toml` when present
//! 3. Environment overrides: `MOTIFDEX_TOP_K`, `MOTIFDEX_MINER_SUPPORT_PCT`,
//!    `MOTIFDEX_MINER_TIMEOUT_SECS`
//!
//! ```toml
//! top_k = 100
//! min_edges = 2
//! min_support_ratio = 0.05
//! max_support_ratio = 0.80
//! miner_support_pct = 5.0
//! miner_timeout_secs = 600
//! ```

use motifdex_core::primitives::{
    DEFAULT_MAX_SUPPORT_RATIO, DEFAULT_MIN_EDGES, DEFAULT_MIN_SUPPORT_RATIO,
    DEFAULT_MINER_SUPPORT_PCT, DEFAULT_MINER_TIMEOUT_SECS, DEFAULT_TOP_K,
};
use motifdex_core::{MotifdexError, SelectionConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "MOTIFDEX_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "motifdex.toml";

pub const TOP_K_ENV: &str = "MOTIFDEX_TOP_K";
pub const MINER_SUPPORT_PCT_ENV: &str = "MOTIFDEX_MINER_SUPPORT_PCT";
pub const MINER_TIMEOUT_SECS_ENV: &str = "MOTIFDEX_MINER_TIMEOUT_SECS";

// =============================================================================
// CONFIG
// =============================================================================

/// Hyper-parameters shared by the pipeline tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of discriminative patterns kept.
    pub top_k: usize,
    /// Minimum edge count of a kept pattern.
    pub min_edges: usize,
    pub min_support_ratio: f64,
    pub max_support_ratio: f64,
    /// Minimum support for mining, in percent of the database.
    pub miner_support_pct: f64,
    /// Wall-clock budget of one external miner run.
    pub miner_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            min_edges: DEFAULT_MIN_EDGES,
            min_support_ratio: DEFAULT_MIN_SUPPORT_RATIO,
            max_support_ratio: DEFAULT_MAX_SUPPORT_RATIO,
            miner_support_pct: DEFAULT_MINER_SUPPORT_PCT,
            miner_timeout_secs: DEFAULT_MINER_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, MotifdexError> {
        toml::from_str(source)
            .map_err(|e| MotifdexError::InvalidConfig(format!("Invalid TOML: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self, MotifdexError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MotifdexError::IoError(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the full layering against the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, MotifdexError> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Resolve the full layering with a custom environment lookup.
    pub fn load_with<F>(explicit: Option<&Path>, lookup: F) -> Result<Self, MotifdexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match lookup(CONFIG_ENV).filter(|v| !v.is_empty()) {
                Some(path) => Some(PathBuf::from(path)),
                None => {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.is_file().then_some(local)
                }
            },
        };

        let mut config = match source {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides found through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), MotifdexError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(TOP_K_ENV) {
            self.top_k = parse_override(TOP_K_ENV, &value)?;
        }
        if let Some(value) = lookup(MINER_SUPPORT_PCT_ENV) {
            self.miner_support_pct = parse_override(MINER_SUPPORT_PCT_ENV, &value)?;
        }
        if let Some(value) = lookup(MINER_TIMEOUT_SECS_ENV) {
            self.miner_timeout_secs = parse_override(MINER_TIMEOUT_SECS_ENV, &value)?;
        }
        Ok(())
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), MotifdexError> {
        self.selection().validate()?;
        if !(self.miner_support_pct > 0.0 && self.miner_support_pct <= 100.0) {
            return Err(MotifdexError::InvalidConfig(format!(
                "miner_support_pct must be in (0, 100], got {}",
                self.miner_support_pct
            )));
        }
        if self.miner_timeout_secs == 0 {
            return Err(MotifdexError::InvalidConfig(
                "miner_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Thresholds for the discriminative selector.
    #[must_use]
    pub fn selection(&self) -> SelectionConfig {
        SelectionConfig {
            k: self.top_k,
            min_edges: self.min_edges,
            min_support_ratio: self.min_support_ratio,
            max_support_ratio: self.max_support_ratio,
        }
    }

    /// Mining support as a fraction of the database.
    #[must_use]
    pub fn miner_support_fraction(&self) -> f64 {
        self.miner_support_pct / 100.0
    }

    #[must_use]
    pub fn miner_timeout(&self) -> Duration {
        Duration::from_secs(self.miner_timeout_secs)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, MotifdexError> {
    value.trim().parse::<T>().map_err(|_| {
        MotifdexError::InvalidConfig(format!("{} has an invalid value '{}'", key, value))
    })
}

// =============================================================================
// TESTS
// =============================================================================
