//! Character dispatcher and handlers
//!
//! Each input character is routed by the variant of the pending token. The
//! handlers emit output, update the math mode and environment stack, and
//! open or close the brace/bracket scoped replacement actions.

use crate::data::catalog::{ArgumentKind, CommandReplacement};
use crate::utils::error::{ArgumentError, EnvironmentError, MathModeError, TransformErrorKind};

use super::context::{BraceAction, BracketAction, MathMode, PendingToken, ScanState};

type HandlerResult = Result<(), TransformErrorKind>;

impl ScanState<'_> {
    /// Consume one input character
    pub fn advance(&mut self, c: char) -> HandlerResult {
        match std::mem::take(&mut self.pending) {
            PendingToken::None => self.handle_plain(c),
            PendingToken::Dollar => self.handle_dollar(c),
            PendingToken::Backslash => self.handle_backslash(c),
            PendingToken::Comment => {
                if c != '\n' {
                    self.pending = PendingToken::Comment;
                }
                Ok(())
            }
            PendingToken::CommandName(name) => self.handle_command_name(name, c),
            PendingToken::BeginName(name) => self.handle_environment_name(name, c, true),
            PendingToken::EndName(name) => self.handle_environment_name(name, c, false),
        }
    }

    fn handle_plain(&mut self, c: char) -> HandlerResult {
        match c {
            '$' => self.pending = PendingToken::Dollar,
            '\\' => self.pending = PendingToken::Backslash,
            '%' => {
                self.log("Removed comment");
                self.pending = PendingToken::Comment;
            }
            _ => {
                if !self.close_scoped_action(c) {
                    self.push_char(c);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Math delimiters
    // =========================================================================

    fn handle_dollar(&mut self, c: char) -> HandlerResult {
        if c == '$' {
            match self.math_mode {
                MathMode::Closed => {
                    self.math_mode = MathMode::Block;
                    self.push_escaped(r"\[");
                    self.log(r"Replaced $$...$$ with \[...\]");
                }
                MathMode::Inline => return Err(MathModeError::DisplayAfterInline.into()),
                MathMode::Block => {
                    self.math_mode = MathMode::Closed;
                    self.push_escaped(r"\]");
                }
            }
            return Ok(());
        }

        match self.math_mode {
            MathMode::Closed => {
                self.math_mode = MathMode::Inline;
                self.push_escaped(r"\(");
                self.log(r"Replaced $...$ with \(...\)");
            }
            MathMode::Inline => {
                self.math_mode = MathMode::Closed;
                self.push_escaped(r"\)");
            }
            MathMode::Block => return Err(MathModeError::InlineAfterDisplay.into()),
        }
        self.handle_plain(c)
    }

    fn handle_backslash(&mut self, c: char) -> HandlerResult {
        match c {
            '\\' => {
                if !self.math_mode.is_open() && !self.in_math_environment {
                    self.log(r"Wrapped newline \\ in \( \)");
                    self.push_escaped(r"\(\\ \)");
                } else {
                    self.push_escaped(r"\\");
                }
            }
            // escaped, so neither math mode nor brace counting applies
            '$' | '{' | '}' | '%' => self.push_control_symbol(c),
            '(' | '[' => {
                if self.math_mode.is_open() {
                    return Err(MathModeError::UnexpectedOpening(c).into());
                }
                self.math_mode = if c == '(' {
                    MathMode::Inline
                } else {
                    MathMode::Block
                };
                self.push_control_symbol(c);
            }
            ')' | ']' => {
                let expected = if c == ')' {
                    MathMode::Inline
                } else {
                    MathMode::Block
                };
                match self.math_mode {
                    MathMode::Closed => return Err(MathModeError::UnexpectedClosure(c).into()),
                    mode if mode != expected => {
                        return Err(MathModeError::MismatchedClosure(c).into())
                    }
                    _ => {
                        self.math_mode = MathMode::Closed;
                        self.push_control_symbol(c);
                    }
                }
            }
            c if c.is_alphabetic() => self.pending = PendingToken::CommandName(c.to_string()),
            _ => self.push_control_symbol(c),
        }
        Ok(())
    }

    fn push_control_symbol(&mut self, c: char) {
        self.push_escaped("\\");
        self.push_char(c);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    fn handle_command_name(&mut self, mut name: String, c: char) -> HandlerResult {
        if c.is_alphabetic() {
            name.push(c);
            self.pending = PendingToken::CommandName(name);
            return Ok(());
        }

        match name.as_str() {
            "begin" => {
                self.close_scoped_action(c);
                self.pending = PendingToken::BeginName(String::new());
                return Ok(());
            }
            "end" => {
                self.close_scoped_action(c);
                self.pending = PendingToken::EndName(String::new());
                return Ok(());
            }
            _ => {}
        }

        if self.catalog.is_custom_command(&name) {
            // defined in the preamble, kept as written
            self.used_commands.insert(name.clone());
        } else if let Some(repl) = self.lookup_replacement(&name) {
            return self.apply_replacement(name, repl, c);
        }

        self.push_escaped("\\");
        self.push_escaped(&name);
        self.handle_plain(c)
    }

    fn apply_replacement(
        &mut self,
        name: String,
        repl: CommandReplacement,
        c: char,
    ) -> HandlerResult {
        match repl.argument {
            ArgumentKind::Brace if c != '{' => {
                return Err(ArgumentError::ExpectedBrace { command: name }.into())
            }
            ArgumentKind::Bracket if c != '[' => {
                return Err(ArgumentError::ExpectedBracket { command: name }.into())
            }
            _ => {}
        }

        self.log(describe_replacement(&name, &repl));
        self.emit(&repl.left, repl.escape);

        match repl.argument {
            ArgumentKind::Brace => {
                self.brace_actions.push(BraceAction {
                    escape: repl.escape,
                    depth: self.open_braces,
                    closing: repl.right,
                });
                self.close_scoped_action(c);
                Ok(())
            }
            ArgumentKind::Bracket => {
                self.bracket_action = Some(BracketAction {
                    escape: repl.escape,
                    closing: repl.right,
                });
                Ok(())
            }
            ArgumentKind::None => self.handle_plain(c),
        }
    }

    /// Track braces and fire the replacement action that `c` closes.
    ///
    /// Returns true if `c` was consumed by an action.
    fn close_scoped_action(&mut self, c: char) -> bool {
        match c {
            '{' | '}' => {
                if c == '{' {
                    self.open_braces += 1;
                } else {
                    self.open_braces -= 1;
                }
                let fires = self
                    .brace_actions
                    .last()
                    .is_some_and(|action| action.depth == self.open_braces);
                if !fires {
                    return false;
                }
                if let Some(action) = self.brace_actions.pop() {
                    self.emit(&action.closing, action.escape);
                }
                true
            }
            ']' => match self.bracket_action.take() {
                Some(action) => {
                    self.emit(&action.closing, action.escape);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    // =========================================================================
    // Environments
    // =========================================================================

    fn handle_environment_name(&mut self, mut name: String, c: char, begin: bool) -> HandlerResult {
        self.close_scoped_action(c);
        if c != '}' {
            name.push(c);
            self.pending = if begin {
                PendingToken::BeginName(name)
            } else {
                PendingToken::EndName(name)
            };
            return Ok(());
        }

        if begin {
            self.open_environment(name);
            Ok(())
        } else {
            self.close_environment(name)
        }
    }

    fn open_environment(&mut self, name: String) {
        let catalog = self.catalog;
        self.environments.push(name.clone());

        let replacement = catalog.environment(&name);
        if let Some(repl) = replacement {
            self.log(format!(
                "Replaced environment {} with {}...{}",
                name, repl.left, repl.right
            ));
            self.emit(&repl.left, repl.escape);
        }

        let enters_math = catalog.is_math_environment(&name)
            && self.math_environment_depth() <= 1
            && !self.math_mode.is_open();
        if enters_math {
            if replacement.is_none() {
                self.log(format!(r"Wrapped environment {} in \( \)", name));
                self.push_escaped(&format!(r"\(\begin{{{}}}", name));
            }
            self.in_math_environment = true;
        } else if replacement.is_none() {
            self.push_escaped(&format!(r"\begin{{{}}}", name));
        }
    }

    /// Pop `name` and emit its closing text.
    ///
    /// The closing `\)` wrap is decided from the state at `\end`, not from
    /// what `\begin` emitted: a math mode opened and closed between the two
    /// can leave the wrap unbalanced.
    fn close_environment(&mut self, name: String) -> HandlerResult {
        let catalog = self.catalog;
        if self.current_environment() != Some(name.as_str()) {
            return Err(EnvironmentError {
                open: self.environments.last().cloned(),
                name,
            }
            .into());
        }
        self.environments.pop();

        let replacement = catalog.environment(&name);
        if let Some(repl) = replacement {
            self.emit(&repl.right, repl.escape);
        }

        let leaves_math = catalog.is_math_environment(&name)
            && self.math_environment_depth() == 0
            && !self.math_mode.is_open();
        if leaves_math {
            if replacement.is_none() {
                self.push_escaped(&format!(r"\end{{{}}}\)", name));
            }
            self.in_math_environment = false;
        } else if replacement.is_none() {
            self.push_escaped(&format!(r"\end{{{}}}", name));
        }
        Ok(())
    }
}

/// Operation log message for an applied command replacement
fn describe_replacement(name: &str, repl: &CommandReplacement) -> String {
    let argument = match repl.argument {
        ArgumentKind::None => return format!(r"Replaced \{} with {}", name, repl.left),
        ArgumentKind::Brace => "{...}",
        ArgumentKind::Bracket => "[...]",
    };
    if repl.right.is_empty() {
        format!(r"Replaced \{}{} with {}", name, argument, repl.left)
    } else {
        format!(
            r"Replaced \{}{} with {}...{}",
            name, argument, repl.left, repl.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DEFAULT_CATALOG;

    fn scan(input: &str) -> Result<ScanState<'static>, TransformErrorKind> {
        let mut state = ScanState::for_input(&DEFAULT_CATALOG, input);
        for c in input.chars() {
            state.advance(c)?;
        }
        Ok(state)
    }

    #[test]
    fn test_dollar_pairs() {
        let state = scan("a $x$ b").unwrap();
        assert_eq!(state.output(), r"a \(x\) b");
        assert_eq!(state.math_mode, MathMode::Closed);
        let state = scan("$$x$$.").unwrap();
        assert_eq!(state.output(), r"\[x\].");
    }

    #[test]
    fn test_inline_inside_block_is_error() {
        let err = scan("$$ a $ ").unwrap_err();
        assert_eq!(err, TransformErrorKind::MathMode(MathModeError::InlineAfterDisplay));
    }

    #[test]
    fn test_block_inside_inline_is_error() {
        let err = scan("$ a $$").unwrap_err();
        assert_eq!(err, TransformErrorKind::MathMode(MathModeError::DisplayAfterInline));
    }

    #[test]
    fn test_backslash_delimiters() {
        assert_eq!(scan(r"\(x\) ").unwrap().output(), r"\(x\) ");
        assert_eq!(
            scan(r"\(\( ").unwrap_err(),
            TransformErrorKind::MathMode(MathModeError::UnexpectedOpening('('))
        );
        assert_eq!(
            scan(r"\) ").unwrap_err(),
            TransformErrorKind::MathMode(MathModeError::UnexpectedClosure(')'))
        );
        assert_eq!(
            scan(r"\[x\) ").unwrap_err(),
            TransformErrorKind::MathMode(MathModeError::MismatchedClosure(')'))
        );
        assert_eq!(
            scan(r"\(x\] ").unwrap_err(),
            TransformErrorKind::MathMode(MathModeError::MismatchedClosure(']'))
        );
    }

    #[test]
    fn test_escaped_symbols_pass_through() {
        let state = scan(r"\$ \{ \} \% \, ").unwrap();
        assert_eq!(state.output(), r"\$ \{ \} \% \, ");
        assert_eq!(state.open_braces, 0);
        assert_eq!(state.math_mode, MathMode::Closed);
    }

    #[test]
    fn test_line_break_wrapping() {
        assert_eq!(scan(r"a\\b").unwrap().output(), r"a\(\\ \)b");
        assert_eq!(scan(r"$a\\b$ ").unwrap().output(), r"\(a\\b\) ");
    }

    #[test]
    fn test_comment_skips_to_newline() {
        let state = scan("a % note\nb").unwrap();
        assert_eq!(state.output(), "a b");
        assert_eq!(state.log.count("Removed comment"), 1);
    }

    #[test]
    fn test_unknown_command_passes_through() {
        let state = scan(r"\alpha+\beta ").unwrap();
        assert_eq!(state.output(), r"\alpha+\beta ");
    }

    #[test]
    fn test_custom_command_is_recorded() {
        let state = scan(r"\normtwo{x} ").unwrap();
        assert_eq!(state.output(), r"\normtwo{x} ");
        assert!(state.used_commands.contains("normtwo"));
        assert_eq!(state.open_braces, 0);
    }

    #[test]
    fn test_zero_argument_replacement() {
        let state = scan(r"x\in\R.").unwrap();
        assert_eq!(state.output(), r"x\in\mathbb{R}.");
    }

    #[test]
    fn test_brace_argument_replacement() {
        let state = scan(r"\Tilde{a_{1}} ").unwrap();
        assert_eq!(state.output(), r"\tilde{a_{1}} ");
        assert!(state.brace_actions.is_empty());
    }

    #[test]
    fn test_nested_brace_arguments() {
        let state = scan(r"\mbox{\Tilde{x}y} ").unwrap();
        assert_eq!(state.output(), r"{\tilde{x}y} ");
    }

    #[test]
    fn test_missing_brace_argument() {
        let err = scan(r"\mbox x").unwrap_err();
        assert_eq!(
            err,
            TransformErrorKind::Argument(ArgumentError::ExpectedBrace {
                command: "mbox".to_string()
            })
        );
    }

    #[test]
    fn test_missing_bracket_argument() {
        let err = scan(r"\begin{description}\item x").unwrap_err();
        assert_eq!(
            err,
            TransformErrorKind::Argument(ArgumentError::ExpectedBracket {
                command: "item".to_string()
            })
        );
    }

    #[test]
    fn test_bracket_argument_replacement() {
        let state = scan(r"\begin{description}\item[Term] def\end{description}").unwrap();
        assert_eq!(state.output(), "Term def");
        assert!(state.bracket_action.is_none());
    }

    #[test]
    fn test_math_environment_wrapped() {
        let state = scan(r"\begin{align}x\\y\end{align}").unwrap();
        assert_eq!(state.output(), r"\(\begin{align}x\\y\end{align}\)");
        assert!(!state.in_math_environment);
    }

    #[test]
    fn test_nested_math_environment_wrapped_once() {
        let state = scan(r"\begin{equation}\begin{aligned}a\end{aligned}\end{equation}").unwrap();
        assert_eq!(
            state.output(),
            r"\(\begin{equation}\begin{aligned}a\end{aligned}\end{equation}\)"
        );
    }

    #[test]
    fn test_math_environment_inside_math_mode() {
        let state = scan(r"$\begin{aligned}a\end{aligned}$ ").unwrap();
        assert_eq!(state.output(), r"\(\begin{aligned}a\end{aligned}\) ");
    }

    #[test]
    fn test_close_wrap_follows_state_at_end() {
        let state = scan(r"$\begin{align}$ \end{align}").unwrap();
        assert_eq!(state.output(), r"\(\begin{align}\) \end{align}\)");
        assert!(!state.in_math_environment);
    }

    #[test]
    fn test_environment_mismatch() {
        let err = scan(r"\begin{align}x\end{equation}").unwrap_err();
        assert_eq!(
            err,
            TransformErrorKind::Environment(EnvironmentError {
                name: "equation".to_string(),
                open: Some("align".to_string()),
            })
        );
        let err = scan(r"\end{align}").unwrap_err();
        assert_eq!(err.to_string(), "unexpected environment closure: align");
    }

    #[test]
    fn test_unknown_environment_passes_through() {
        let state = scan(r"\begin{center}x\end{center}").unwrap();
        assert_eq!(state.output(), r"\begin{center}x\end{center}");
        assert!(state.environments.is_empty());
    }

    #[test]
    fn test_enumerate_items() {
        let state = scan(
            r"\begin{enumerate}\item a\begin{enumerate}\item b\end{enumerate}\end{enumerate}",
        )
        .unwrap();
        assert_eq!(
            state.output(),
            r#"<ol><li type="a">) a<ol><li type="i">) b</ol></ol>"#
        );
    }

    #[test]
    fn test_describe_replacement() {
        let mbox = DEFAULT_CATALOG.replacement("mbox").unwrap();
        assert_eq!(describe_replacement("mbox", mbox), r"Replaced \mbox{...} with {...}");
        let r = DEFAULT_CATALOG.replacement("R").unwrap();
        assert_eq!(describe_replacement("R", r), r"Replaced \R with \mathbb{R}");
    }
}
