//! LaTeX → STACK transformer
//!
//! A single left-to-right pass over the input rewrites math delimiters,
//! substitutes the commands and environments listed in the catalog, and
//! collects the custom commands whose definitions must precede the output.
//!
//! ## Architecture
//!
//! - `context`: per-call scan state and output buffer
//! - `engine`: character dispatcher and handlers
//! - `preamble`: custom command dependency closure and preamble rendering

mod context;
mod engine;
mod preamble;

pub use context::{escape_html_into, needs_html, MathMode, PendingToken, ScanState};
pub use preamble::{dependency_closure, render_preamble};

use crate::data::catalog::{Catalog, DEFAULT_CATALOG};
use crate::utils::error::TransformError;
use crate::utils::oplog::OperationLog;

/// Appended to the input so that a trailing command name is flushed
const SENTINEL: char = ' ';

/// Attached to results whose output is HTML source
pub const HTML_INFO_MESSAGE: &str =
    "Output contains HTML.\nInput in Moodle as source code (Ansicht -> Quellcode)!";

/// Everything a successful scan produced
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Macro definitions for the custom commands used (may be empty)
    pub preamble: String,
    /// The rewritten input
    pub body: String,
    pub log: OperationLog,
    /// Output is HTML source
    pub html: bool,
    /// Environments still open at end of input, outermost first
    pub unclosed_environments: Vec<String>,
    /// Math mode left open at end of input
    pub open_math_mode: MathMode,
    /// Brace arguments of replaced commands never closed
    pub unclosed_arguments: usize,
    /// A bracket argument of a replaced command was never closed
    pub unclosed_bracket: bool,
}

impl TransformOutput {
    /// Preamble followed by body
    pub fn text(&self) -> String {
        let mut text = String::with_capacity(self.preamble.len() + self.body.len());
        text.push_str(&self.preamble);
        text.push_str(&self.body);
        text
    }

    pub fn info_message(&self) -> &'static str {
        if self.html {
            HTML_INFO_MESSAGE
        } else {
            ""
        }
    }

    /// Whether the input ended with every scope closed
    pub fn is_balanced(&self) -> bool {
        self.unclosed_environments.is_empty()
            && !self.open_math_mode.is_open()
            && self.unclosed_arguments == 0
            && !self.unclosed_bracket
    }
}

/// Run the transformer over `input` with the given catalog
pub fn transform_detailed(
    input: &str,
    catalog: &Catalog,
) -> Result<TransformOutput, TransformError> {
    let mut state = ScanState::for_input(catalog, input);
    let mut line = 1;
    let mut column = 0;

    for c in input.chars() {
        column += 1;
        state
            .advance(c)
            .map_err(|kind| TransformError::new(kind, line, column))?;
        if c == '\n' {
            line += 1;
            column = 0;
        }
    }

    // The sentinel's own output is the last character emitted, if any
    column += 1;
    let before = state.output_len();
    state
        .advance(SENTINEL)
        .map_err(|kind| TransformError::new(kind, line, column))?;
    if state.output_len() > before {
        state.trim_last_char();
    }

    let preamble = render_preamble(catalog, &state.used_commands, &mut state.log);
    let body = state.take_output();

    Ok(TransformOutput {
        preamble,
        body,
        html: state.is_html(),
        unclosed_environments: std::mem::take(&mut state.environments),
        open_math_mode: state.math_mode,
        unclosed_arguments: state.brace_actions.len(),
        unclosed_bracket: state.bracket_action.is_some(),
        log: state.log,
    })
}

/// Result of one transform call as presented to callers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformResult {
    /// Preamble and rewritten input (empty on failure)
    pub transformed_text: String,
    pub success: bool,
    /// Diagnostic of the failure (empty on success)
    pub error_message: String,
    /// One `"<count>x <message>"` line per distinct operation
    pub operation_log: String,
    /// Instructions for pasting the output (empty unless output is HTML)
    pub info_message: String,
}

impl TransformResult {
    pub fn from_output(output: &TransformOutput) -> Self {
        Self {
            transformed_text: output.text(),
            success: true,
            error_message: String::new(),
            operation_log: output.log.render(),
            info_message: output.info_message().to_string(),
        }
    }

    pub fn from_error(error: &TransformError) -> Self {
        Self {
            success: false,
            error_message: error.to_string(),
            ..Default::default()
        }
    }

    /// The transformed text, or the error message
    pub fn into_result(self) -> Result<String, String> {
        if self.success {
            Ok(self.transformed_text)
        } else {
            Err(self.error_message)
        }
    }
}

impl From<Result<TransformOutput, TransformError>> for TransformResult {
    fn from(result: Result<TransformOutput, TransformError>) -> Self {
        match result {
            Ok(output) => Self::from_output(&output),
            Err(error) => Self::from_error(&error),
        }
    }
}

/// Transform `input` with the built-in catalog
pub fn transform(input: &str) -> TransformResult {
    transform_with_catalog(input, &DEFAULT_CATALOG)
}

/// Transform `input` with a custom catalog
pub fn transform_with_catalog(input: &str, catalog: &Catalog) -> TransformResult {
    transform_detailed(input, catalog).into()
}
