//! Core conversion modules
//!
//! This module contains the conversion engine:
//! - `stack`: LaTeX to STACK/Moodle transformer (single-pass scanner)

pub mod stack;

// Re-export main types and functions from stack
pub use stack::{
    transform, transform_detailed, transform_with_catalog, MathMode, PendingToken, ScanState,
    TransformOutput, TransformResult, HTML_INFO_MESSAGE,
};
