//! # stacklatex
//!
//! Rewrites LaTeX written by instructors into the restricted dialect accepted
//! by the STACK question type for Moodle.
//!
//! ## Features
//!
//! - **Math delimiters**: `$...$` and `$$...$$` become `\(...\)` and `\[...\]`,
//!   with pairing validated across all four delimiter forms
//! - **Math environments**: `align`, `equation` and friends are wrapped in math
//!   delimiters when used in text
//! - **Command replacement**: unsupported commands are substituted inline
//! - **Custom commands**: macros such as `\norm` are kept and their
//!   definitions collected into a preamble
//! - **Lists**: `itemize`/`enumerate` become HTML list markup
//! - **Operation log**: every substitution is recorded and counted
//! - **WASM Support**: Compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ```rust
//! use stacklatex::transform;
//!
//! let result = transform(r"Let $x \in \R$.");
//! assert!(result.success);
//! assert_eq!(result.transformed_text, r"Let \(x \in \mathbb{R}\).");
//! ```
//!
//! Custom commands pull their definitions into a preamble:
//!
//! ```rust
//! use stacklatex::transform;
//!
//! let result = transform(r"The norm is \norm{x}.");
//! assert!(result.transformed_text.starts_with(r"\(\newcommand{\norm}"));
//! assert!(result.transformed_text.ends_with(r"\)The norm is \norm{x}."));
//! ```
//!
//! Errors abort the transform:
//!
//! ```rust
//! use stacklatex::transform;
//!
//! let result = transform("$$ a $");
//! assert!(!result.success);
//! assert!(result.error_message.contains("$ after open $$"));
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static catalogs
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core conversion functions
pub use crate::core::stack;
pub use crate::core::{
    transform, transform_detailed, transform_with_catalog, MathMode, TransformOutput,
    TransformResult, HTML_INFO_MESSAGE,
};

// Re-export data modules
pub use data::catalog;
pub use data::{
    ArgumentKind, Catalog, CommandReplacement, CustomCommand, EnvironmentReplacement,
    DEFAULT_CATALOG,
};

#[cfg(feature = "data-loading")]
pub use data::CatalogExtension;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{CatalogError, TransformError, TransformErrorKind};
pub use utils::oplog::OperationLog;

/// Transform `input` and return the text or the error message
pub fn transform_to_string(input: &str) -> Result<String, String> {
    transform(input).into_result()
}
