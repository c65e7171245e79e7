//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Diagnostics and error reporting
//! - Error types
//! - The counted operation log

pub mod diagnostics;
pub mod error;
pub mod oplog;

// Re-export commonly used items
pub use diagnostics::{check_latex, format_diagnostics, Diagnostic, DiagnosticLevel};
pub use error::{
    ArgumentError, CatalogError, EnvironmentError, MathModeError, TransformError,
    TransformErrorKind,
};
pub use oplog::OperationLog;
