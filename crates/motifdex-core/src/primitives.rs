//! # Pipeline Primitives
//!
//! Hardcoded constants for the Motifdex core: artifact format identifiers,
//! default hyper-parameters of mining and selection, and input limits.
//!
//! Runtime configuration (see the app crate) may override the
//! hyper-parameters; the format identifiers and limits are fixed.

// =============================================================================
// ARTIFACT FORMATS
// =============================================================================

/// Magic bytes for the pattern index artifact header.
pub const INDEX_MAGIC: &[u8; 4] = b"MDPX";

/// Current pattern index format version.
///
/// Increment this when making breaking changes to the serialization format.
pub const INDEX_FORMAT_VERSION: u8 = 1;

/// File name used when a pattern index output path is a directory.
pub const DEFAULT_INDEX_FILE_NAME: &str = "patterns.bin";

/// Extension appended to the pattern index path for the readable listing.
pub const LISTING_EXTENSION: &str = "txt";

// =============================================================================
// SELECTION DEFAULTS
// =============================================================================

/// Number of discriminative patterns kept in the index.
pub const DEFAULT_TOP_K: usize = 100;

/// Patterns with fewer edges than this are dropped by the hard filter.
pub const DEFAULT_MIN_EDGES: usize = 2;

/// Lower bound (inclusive) of the accepted support ratio window.
pub const DEFAULT_MIN_SUPPORT_RATIO: f64 = 0.05;

/// Upper bound (inclusive) of the accepted support ratio window.
pub const DEFAULT_MAX_SUPPORT_RATIO: f64 = 0.80;

// =============================================================================
// MINING DEFAULTS
// =============================================================================

/// Minimum support handed to the miners, in percent of the database.
pub const DEFAULT_MINER_SUPPORT_PCT: f64 = 5.0;

/// Wall-clock budget for one external miner run, in seconds.
pub const DEFAULT_MINER_TIMEOUT_SECS: u64 = 600;

/// Number of neighbors a star motif is built from.
pub const STAR_ARITY: usize = 3;

// =============================================================================
// INPUT LIMITS
// =============================================================================

/// Maximum number of patterns accepted when loading an index artifact.
pub const MAX_INDEX_PATTERNS: u64 = 1_000_000;

/// Maximum size of any artifact file read back from disk (500 MB).
pub const MAX_ARTIFACT_SIZE: u64 = 500 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_window_is_ordered() {
        assert!(DEFAULT_MIN_SUPPORT_RATIO < DEFAULT_MAX_SUPPORT_RATIO);
        assert!(DEFAULT_MAX_SUPPORT_RATIO <= 1.0);
    }

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(INDEX_MAGIC, b"MDPX");
    }
}
