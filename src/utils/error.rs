//! Error handling for stacklatex
//!
//! This module provides the error taxonomy of the transformer and of catalog
//! loading. Every transform error is fatal to the call that raised it.

use std::fmt;

/// Math delimiter misuse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathModeError {
    /// `$$` while `$` math is open
    DisplayAfterInline,
    /// `$` while `$$` math is open
    InlineAfterDisplay,
    /// `\(` or `\[` while math mode is already open
    UnexpectedOpening(char),
    /// `\)` or `\]` while no math mode is open
    UnexpectedClosure(char),
    /// `\)` closing `\[`, or `\]` closing `\(`
    MismatchedClosure(char),
}

impl fmt::Display for MathModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathModeError::DisplayAfterInline => write!(f, "math error: $$ after open $"),
            MathModeError::InlineAfterDisplay => write!(f, "math error: $ after open $$"),
            MathModeError::UnexpectedOpening(c) => {
                write!(f, "unexpected math mode opening \\{} in math mode", c)
            }
            MathModeError::UnexpectedClosure(c) => {
                write!(f, "unexpected closure \\{} of math mode", c)
            }
            MathModeError::MismatchedClosure(c) => {
                write!(f, "mismatched closure of math mode: \\{}", c)
            }
        }
    }
}

/// `\end{name}` that does not close the innermost environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentError {
    /// Name given to `\end`
    pub name: String,
    /// Innermost open environment, if any
    pub open: Option<String>,
}

impl fmt::Display for EnvironmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected environment closure: {}", self.name)?;
        if let Some(ref open) = self.open {
            write!(f, ", last open environment: {}", open)?;
        }
        Ok(())
    }
}

/// Replaced command not followed by its argument delimiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    ExpectedBrace { command: String },
    ExpectedBracket { command: String },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::ExpectedBrace { command } => {
                write!(f, "expected {{ for command {}", command)
            }
            ArgumentError::ExpectedBracket { command } => {
                write!(f, "expected [ for command {}", command)
            }
        }
    }
}

/// What went wrong during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformErrorKind {
    MathMode(MathModeError),
    Environment(EnvironmentError),
    Argument(ArgumentError),
}

impl fmt::Display for TransformErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformErrorKind::MathMode(e) => e.fmt(f),
            TransformErrorKind::Environment(e) => e.fmt(f),
            TransformErrorKind::Argument(e) => e.fmt(f),
        }
    }
}

impl From<MathModeError> for TransformErrorKind {
    fn from(err: MathModeError) -> Self {
        TransformErrorKind::MathMode(err)
    }
}

impl From<EnvironmentError> for TransformErrorKind {
    fn from(err: EnvironmentError) -> Self {
        TransformErrorKind::Environment(err)
    }
}

impl From<ArgumentError> for TransformErrorKind {
    fn from(err: ArgumentError) -> Self {
        TransformErrorKind::Argument(err)
    }
}

/// A fatal transform error with the input position that raised it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformError {
    pub kind: TransformErrorKind,
    /// 1-based line of the offending character
    pub line: usize,
    /// 1-based column (in characters) of the offending character
    pub column: usize,
}

impl TransformError {
    pub fn new(kind: impl Into<TransformErrorKind>, line: usize, column: usize) -> Self {
        Self {
            kind: kind.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.kind, self.line, self.column)
    }
}

impl std::error::Error for TransformError {}

/// Catalog loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The document could not be deserialized
    Parse { format: String, message: String },
    /// Format not recognized
    UnsupportedFormat(String),
    /// A custom command depends on an unknown command
    UnknownDependency { command: String, dependency: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl CatalogError {
    pub fn parse(format: impl Into<String>, err: impl fmt::Display) -> Self {
        CatalogError::Parse {
            format: format.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse { format, message } => {
                write!(f, "Invalid {} catalog: {}", format, message)
            }
            CatalogError::UnsupportedFormat(format) => {
                write!(f, "Unsupported catalog format '{}'", format)
            }
            CatalogError::UnknownDependency {
                command,
                dependency,
            } => {
                write!(
                    f,
                    "Custom command '{}' depends on unknown command '{}'",
                    command, dependency
                )
            }
            CatalogError::IoError { message } => write!(f, "IO error: {}", message),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::IoError {
            message: err.to_string(),
        }
    }
}
