//! LaTeX diagnostics for STACK input
//!
//! This module runs the transformer in check mode and reports problems in a
//! form suitable for a terminal or an editor:
//!
//! - Transform errors (math delimiters, environments, command arguments)
//! - Scopes left open at end of input
//! - Unbalanced literal braces, which the transformer passes through
//! - HTML output mode
//!
//! ## Example
//!
//! ```rust
//! use stacklatex::diagnostics::{check_latex, DiagnosticLevel};
//!
//! let result = check_latex(r"\begin{align} x");
//! assert!(!result.is_empty());
//! assert!(!result.has_errors());
//! ```

use std::fmt;

use crate::core::stack::{transform_detailed, MathMode, TransformOutput};
use crate::data::catalog::{Catalog, DEFAULT_CATALOG};
use crate::utils::error::{ArgumentError, MathModeError, TransformError, TransformErrorKind};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - output is produced but may not render as intended
    Warning,
    /// Error - the input cannot be transformed
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed)
    pub column: Option<usize>,
    /// Relevant source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    /// Add location information
    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Add source text
    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    /// Add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: level: message
        //         --> line:column
        //         |
        //         | source text
        //         = help: suggestion

        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Number of errors
    pub errors: usize,
    /// Number of warnings
    pub warnings: usize,
    /// Number of info messages
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic
    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Check if there are any issues at all
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.errors > 0 {
            parts.push(format!(
                "{} error{}",
                self.errors,
                if self.errors == 1 { "" } else { "s" }
            ));
        }
        if self.warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                self.warnings,
                if self.warnings == 1 { "" } else { "s" }
            ));
        }
        if self.infos > 0 {
            parts.push(format!(
                "{} note{}",
                self.infos,
                if self.infos == 1 { "" } else { "s" }
            ));
        }
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check LaTeX source against the built-in catalog
pub fn check_latex(input: &str) -> CheckResult {
    check_latex_with_catalog(input, &DEFAULT_CATALOG)
}

/// Check LaTeX source against a custom catalog
pub fn check_latex_with_catalog(input: &str, catalog: &Catalog) -> CheckResult {
    let mut result = CheckResult::new();

    match transform_detailed(input, catalog) {
        Ok(output) => check_final_state(&output, &mut result),
        Err(err) => result.add(error_diagnostic(input, &err)),
    }

    check_brace_balance(input, &mut result);

    result
}

fn error_diagnostic(input: &str, err: &TransformError) -> Diagnostic {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error, err.kind.to_string())
        .with_location(err.line, err.column)
        .with_suggestion(suggestion_for(&err.kind));
    if let Some(source) = input.lines().nth(err.line - 1) {
        diag = diag.with_source(source);
    }
    diag
}

fn suggestion_for(kind: &TransformErrorKind) -> String {
    match kind {
        TransformErrorKind::MathMode(MathModeError::DisplayAfterInline) => {
            "Close the inline math with a single $ before opening display math".to_string()
        }
        TransformErrorKind::MathMode(MathModeError::InlineAfterDisplay) => {
            "Close display math with $$, not $".to_string()
        }
        TransformErrorKind::MathMode(MathModeError::UnexpectedOpening(_)) => {
            "Close the open math mode first; math delimiters cannot be nested".to_string()
        }
        TransformErrorKind::MathMode(MathModeError::UnexpectedClosure(_)) => {
            "Remove the closing delimiter or add the matching opening one".to_string()
        }
        TransformErrorKind::MathMode(MathModeError::MismatchedClosure(c)) => {
            let expected = if *c == ')' { ']' } else { ')' };
            format!("Use \\{} to close this math mode", expected)
        }
        TransformErrorKind::Environment(env) => match env.open {
            Some(ref open) => format!("Use \\end{{{}}}", open),
            None => "Check for a missing \\begin".to_string(),
        },
        TransformErrorKind::Argument(ArgumentError::ExpectedBrace { command }) => {
            format!("Write \\{}{{...}}", command)
        }
        TransformErrorKind::Argument(ArgumentError::ExpectedBracket { command }) => {
            format!("Write \\{}[...]", command)
        }
    }
}

/// Report scopes left open by a successful transform
fn check_final_state(output: &TransformOutput, result: &mut CheckResult) {
    for env in &output.unclosed_environments {
        result.add(
            Diagnostic::new(DiagnosticLevel::Warning, format!("unclosed environment '{}'", env))
                .with_suggestion(format!("Add \\end{{{}}}", env)),
        );
    }

    match output.open_math_mode {
        MathMode::Closed => {}
        MathMode::Inline => result.add(
            Diagnostic::new(DiagnosticLevel::Warning, "inline math is never closed")
                .with_suggestion("Close it with $ or \\)"),
        ),
        MathMode::Block => result.add(
            Diagnostic::new(DiagnosticLevel::Warning, "display math is never closed")
                .with_suggestion("Close it with $$ or \\]"),
        ),
    }

    if output.unclosed_arguments > 0 {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!(
                    "{} replaced command argument{} never closed",
                    output.unclosed_arguments,
                    if output.unclosed_arguments == 1 { " is" } else { "s are" }
                ),
            )
            .with_suggestion("Check for missing closing brace '}'"),
        );
    }

    if output.unclosed_bracket {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                "optional argument of a replaced command is never closed",
            )
            .with_suggestion("Check for missing ']'"),
        );
    }

    if output.html {
        result.add(
            Diagnostic::new(DiagnosticLevel::Info, "output contains HTML list markup")
                .with_suggestion("Paste the output into Moodle in source code view"),
        );
    }
}

/// Check for unbalanced literal braces, ignoring `\{`, `\}` and comments
fn check_brace_balance(input: &str, result: &mut CheckResult) {
    let mut depth = 0i32;
    let mut last_open_line = 0;
    let mut escaped = false;
    let mut in_comment = false;
    let mut line = 1;
    let mut column = 0;

    for c in input.chars() {
        column += 1;
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
        } else if escaped {
            escaped = false;
        } else {
            match c {
                '\\' => escaped = true,
                '%' => in_comment = true,
                '{' => {
                    if depth == 0 {
                        last_open_line = line;
                    }
                    depth += 1;
                }
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        result.add(
                            Diagnostic::new(DiagnosticLevel::Warning, "unmatched closing brace '}'")
                                .with_location(line, column)
                                .with_suggestion("Check for missing opening brace"),
                        );
                        depth = 0;
                    }
                }
                _ => {}
            }
        }
        if c == '\n' {
            line += 1;
            column = 0;
        }
    }

    if depth > 0 {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Warning,
                format!(
                    "{} unclosed brace{} (opened around line {})",
                    depth,
                    if depth == 1 { "" } else { "s" },
                    last_open_line
                ),
            )
            .with_suggestion("Check for missing closing brace '}'"),
        );
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    // Summary
    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}
