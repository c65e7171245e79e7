//! Scan state for the STACK transformer
//!
//! One [`ScanState`] is created per transform call and threaded by mutable
//! reference through every handler in [`super::engine`].

use std::borrow::Cow;

use fxhash::FxHashSet;

use crate::data::catalog::{Catalog, CommandReplacement};
use crate::data::environments::enumerate_item_marker;
use crate::utils::oplog::OperationLog;

/// Initial capacity for output buffer (reduces reallocations)
const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Environments whose presence switches the output to HTML source
const HTML_ENVIRONMENTS: [&str; 2] = [r"\begin{enumerate}", r"\begin{itemize}"];

/// What the previous characters left unfinished.
///
/// Only the three name-collecting variants carry a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingToken {
    #[default]
    None,
    /// A lone `\`
    Backslash,
    /// `\` followed by letters; holds the letters so far
    CommandName(String),
    /// A lone `$`
    Dollar,
    /// Inside a `%` comment
    Comment,
    /// Collecting the name of `\begin{...}`
    BeginName(String),
    /// Collecting the name of `\end{...}`
    EndName(String),
}

/// Delimiter-driven math mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathMode {
    #[default]
    Closed,
    /// `$...$` or `\(...\)`
    Inline,
    /// `$$...$$` or `\[...\]`
    Block,
}

impl MathMode {
    pub fn is_open(self) -> bool {
        self != MathMode::Closed
    }
}

/// Closing text emitted when the brace counter returns to `depth`
#[derive(Debug, Clone)]
pub(crate) struct BraceAction {
    pub escape: bool,
    pub depth: i64,
    pub closing: Cow<'static, str>,
}

/// Closing text emitted at the next `]`
#[derive(Debug, Clone)]
pub(crate) struct BracketAction {
    pub escape: bool,
    pub closing: Cow<'static, str>,
}

/// Mutable state of one left-to-right scan
#[derive(Debug)]
pub struct ScanState<'c> {
    pub(crate) catalog: &'c Catalog,
    output: String,
    pub(crate) pending: PendingToken,
    pub(crate) math_mode: MathMode,
    /// Inside the outermost recognized math environment
    pub(crate) in_math_environment: bool,
    pub(crate) environments: Vec<String>,
    pub(crate) brace_actions: Vec<BraceAction>,
    pub(crate) bracket_action: Option<BracketAction>,
    pub(crate) open_braces: i64,
    pub(crate) used_commands: FxHashSet<String>,
    html: bool,
    pub(crate) log: OperationLog,
}

impl<'c> ScanState<'c> {
    pub fn new(catalog: &'c Catalog, html: bool) -> Self {
        Self {
            catalog,
            output: String::with_capacity(INITIAL_BUFFER_CAPACITY),
            pending: PendingToken::None,
            math_mode: MathMode::Closed,
            in_math_environment: false,
            environments: Vec::new(),
            brace_actions: Vec::new(),
            bracket_action: None,
            open_braces: 0,
            used_commands: FxHashSet::default(),
            html,
            log: OperationLog::new(),
        }
    }

    /// State for `input`, with HTML escaping decided from its list environments
    pub fn for_input(catalog: &'c Catalog, input: &str) -> Self {
        Self::new(catalog, needs_html(input))
    }

    pub fn is_html(&self) -> bool {
        self.html
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn output_len(&self) -> usize {
        self.output.len()
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Drop the last character of the output
    pub(crate) fn trim_last_char(&mut self) {
        self.output.pop();
    }

    pub(crate) fn log(&mut self, message: impl Into<String>) {
        self.log.record(message);
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Append `text`, HTML-escaped when the output is HTML source
    pub(crate) fn push_escaped(&mut self, text: &str) {
        if self.html {
            escape_html_into(&mut self.output, text);
        } else {
            self.output.push_str(text);
        }
    }

    pub(crate) fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.push_escaped(c.encode_utf8(&mut buf));
    }

    /// Append `text` verbatim
    pub(crate) fn push_raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Append replacement text, escaping it only if the replacement asks for it
    pub(crate) fn emit(&mut self, text: &str, escape: bool) {
        if escape {
            self.push_escaped(text);
        } else {
            self.push_raw(text);
        }
    }

    // =========================================================================
    // Environments
    // =========================================================================

    pub(crate) fn current_environment(&self) -> Option<&str> {
        self.environments.last().map(String::as_str)
    }

    /// Number of open environments named `name`
    pub(crate) fn environment_depth(&self, name: &str) -> usize {
        self.environments.iter().filter(|e| *e == name).count()
    }

    /// Number of open recognized math environments
    pub(crate) fn math_environment_depth(&self) -> usize {
        self.environments
            .iter()
            .filter(|e| self.catalog.is_math_environment(e))
            .count()
    }

    /// Replacement for `\name` in the current context.
    ///
    /// `\item` directly inside `enumerate` is resolved first, then overrides of
    /// the innermost environment, then the global table.
    pub(crate) fn lookup_replacement(&self, name: &str) -> Option<CommandReplacement> {
        if let Some(env) = self.current_environment() {
            if env == "enumerate" && name == "item" {
                let marker = enumerate_item_marker(self.environment_depth("enumerate"));
                return Some(CommandReplacement::raw(marker));
            }
            if let Some(repl) = self.catalog.environment_command(env, name) {
                return Some(repl.clone());
            }
        }
        self.catalog.replacement(name).cloned()
    }
}

/// Whether `input` must be transformed into HTML source
pub fn needs_html(input: &str) -> bool {
    HTML_ENVIRONMENTS.iter().any(|env| input.contains(env))
}

/// Escape `text` for HTML source and append it to `out`
pub fn escape_html_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>\n"),
            _ => out.push(c),
        }
    }
}
