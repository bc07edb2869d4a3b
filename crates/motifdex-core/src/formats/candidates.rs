//! # Candidate List Format
//!
//! ```text
//! q # <query_index>
//! c # <db_index> <db_index> ...
//! ```
//!
//! An empty candidate list is written as `c # ` with nothing after it.

use crate::MotifdexError;
use crate::candidates::CandidateSet;
use std::path::Path;

/// Render candidate sets, one `q`/`c` line pair per query.
#[must_use]
pub fn write_candidates(sets: &[CandidateSet]) -> String {
    let mut out = String::new();
    for set in sets {
        let indices: Vec<String> = set.candidates.iter().map(usize::to_string).collect();
        out.push_str(&format!("q # {}\n", set.query));
        out.push_str(&format!("c # {}\n", indices.join(" ")));
    }
    out
}

/// Read candidate sets back. Used by downstream verification.
pub fn parse_candidates(source: &str) -> Result<Vec<CandidateSet>, MotifdexError> {
    let mut sets: Vec<CandidateSet> = Vec::new();
    let mut pending: Option<usize> = None;

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("q #") {
            let query = rest.trim().parse::<usize>().map_err(|_| {
                MotifdexError::parse(line_no, format!("invalid query index '{}'", rest.trim()))
            })?;
            pending = Some(query);
        } else if let Some(rest) = line.strip_prefix("c #") {
            let Some(query) = pending.take() else {
                return Err(MotifdexError::parse(line_no, "candidate line without a query line"));
            };
            let candidates = rest
                .split_whitespace()
                .map(|t| {
                    t.parse::<usize>().map_err(|_| {
                        MotifdexError::parse(line_no, format!("invalid candidate index '{}'", t))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            sets.push(CandidateSet { query, candidates });
        } else {
            return Err(MotifdexError::parse(line_no, "expected a 'q #' or 'c #' line"));
        }
    }

    if pending.is_some() {
        return Err(MotifdexError::parse(
            source.lines().count(),
            "query line without a candidate line",
        ));
    }
    Ok(sets)
}

/// Write the candidate file, creating missing parent directories.
pub fn save_candidates(path: &Path, sets: &[CandidateSet]) -> Result<(), MotifdexError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            MotifdexError::IoError(format!("'{}': {}", parent.display(), e))
        })?;
    }
    std::fs::write(path, write_candidates(sets))
        .map_err(|e| MotifdexError::IoError(format!("'{}': {}", path.display(), e)))
}
