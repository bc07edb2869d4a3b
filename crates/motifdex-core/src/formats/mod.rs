//! # Formats Module
//!
//! Byte and text encodings of pipeline artifacts, with the file helpers the
//! command-line tools use to read and write them.

pub mod candidates;
pub mod gspan;
pub mod npy;
pub mod pattern_index;

pub use candidates::{parse_candidates, save_candidates, write_candidates};
pub use gspan::{parse_gspan_output, write_gspan_input};
pub use npy::{load_matrix, matrix_from_npy, matrix_to_npy, resolve_matrix_path, save_matrix};
pub use pattern_index::{
    IndexHeader, PatternRecord, index_from_bytes, index_to_bytes, listing_path, load_index,
    render_listing, resolve_index_path, save_index,
};
