//! Integration tests for stacklatex transforms

use std::borrow::Cow;

use pretty_assertions::assert_eq;
use stacklatex::{
    diagnostics::{check_latex, format_diagnostics, DiagnosticLevel},
    transform, transform_detailed, transform_with_catalog, Catalog, EnvironmentReplacement,
    DEFAULT_CATALOG, HTML_INFO_MESSAGE,
};

// ============================================================================
// Math Delimiters
// ============================================================================

mod math_delimiters {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dollar_conversion() {
        let result = transform("Let $x$ and $$y$$.");
        assert!(result.success);
        assert_eq!(result.transformed_text, r"Let \(x\) and \[y\].");
    }

    #[test]
    fn test_backslash_delimiters_unchanged() {
        let input = r"Inline \(a+b\) and display \[c\].";
        assert_eq!(transform(input).transformed_text, input);
    }

    #[test]
    fn test_display_after_inline() {
        let result = transform("$ a $$ b");
        assert!(!result.success);
        assert_eq!(result.error_message, "math error: $$ after open $ (line 1, column 6)");
    }

    #[test]
    fn test_inline_after_display() {
        let result = transform("$$ a $");
        assert!(!result.success);
        assert_eq!(result.transformed_text, "");
        assert_eq!(result.error_message, "math error: $ after open $$ (line 1, column 7)");
    }

    #[test]
    fn test_single_dollar_inside_display() {
        let result = transform("$$ a $ b $$");
        assert!(!result.success);
        assert!(result.error_message.starts_with("math error: $ after open $$"));
    }

    #[test]
    fn test_double_opening() {
        let result = transform(r"\(\(x");
        assert!(!result.success);
        assert_eq!(
            result.error_message,
            r"unexpected math mode opening \( in math mode (line 1, column 4)"
        );
    }

    #[test]
    fn test_inline_closure_in_display() {
        let result = transform(r"\[x\)");
        assert!(!result.success);
        assert_eq!(
            result.error_message,
            r"mismatched closure of math mode: \) (line 1, column 5)"
        );
    }

    #[test]
    fn test_closure_without_opening() {
        let result = transform("text\n\\]");
        assert_eq!(
            result.error_message,
            r"unexpected closure \] of math mode (line 2, column 2)"
        );
    }

    #[test]
    fn test_line_break_outside_math() {
        assert_eq!(transform(r"a\\b").transformed_text, r"a\(\\ \)b");
        assert_eq!(transform(r"$a\\b$").transformed_text, r"\(a\\b\)");
    }

    #[test]
    fn test_escaped_dollar_is_text() {
        assert_eq!(transform(r"costs \$5").transformed_text, r"costs \$5");
    }
}

// ============================================================================
// Environments
// ============================================================================

mod environments {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_math_environment_wrapped_outside_math() {
        let result = transform(r"Text \begin{align}x&=1\end{align} done");
        assert_eq!(
            result.transformed_text,
            r"Text \(\begin{align}x&=1\end{align}\) done"
        );
        assert!(result
            .operation_log
            .contains(r"1x Wrapped environment align in \( \)"));
    }

    #[test]
    fn test_math_environment_inside_display_math() {
        let result = transform(r"$$\begin{aligned}x\end{aligned}$$");
        assert_eq!(
            result.transformed_text,
            r"\[\begin{aligned}x\end{aligned}\]"
        );
        assert!(!result.operation_log.contains("Wrapped environment"));
    }

    #[test]
    fn test_catalog_environment_replaced() {
        let result = transform(r"\begin{description}\item[Term] meaning\end{description}");
        assert!(result.success);
        assert_eq!(result.transformed_text, "Term meaning");
        assert_eq!(result.info_message, "");
    }

    #[test]
    fn test_unknown_environment_kept() {
        let input = r"\begin{center}x\end{center}";
        assert_eq!(transform(input).transformed_text, input);
    }

    #[test]
    fn test_mismatched_end() {
        let result = transform(r"\begin{align}x\end{equation}");
        assert!(!result.success);
        assert!(result.error_message.starts_with(
            "unexpected environment closure: equation, last open environment: align"
        ));
    }

    #[test]
    fn test_itemize_to_html() {
        let result = transform(r"\begin{itemize}\item A\item B\end{itemize}");
        assert!(result.success);
        assert_eq!(result.transformed_text, "<ul><li> A<li> B</ul>");
        assert_eq!(result.info_message, HTML_INFO_MESSAGE);
    }

    #[test]
    fn test_enumerate_markers_by_depth() {
        let result = transform(
            r"\begin{enumerate}\item A\begin{enumerate}\item B\end{enumerate}\end{enumerate}",
        );
        assert_eq!(
            result.transformed_text,
            r#"<ol><li type="a">) A<ol><li type="i">) B</ol></ol>"#
        );
    }

    #[test]
    fn test_html_mode_escapes_text() {
        let result = transform("a < b & c\n\\begin{itemize}\\item $x<y$\\end{itemize}");
        assert_eq!(
            result.transformed_text,
            "a &lt; b &amp; c<br>\n<ul><li> \\(x&lt;y\\)</ul>"
        );
    }

    #[test]
    fn test_math_environment_with_catalog_entry() {
        let mut catalog = Catalog::builtin();
        catalog.insert_environment(
            "align",
            EnvironmentReplacement {
                escape: false,
                left: Cow::Borrowed("[L]"),
                right: Cow::Borrowed("[R]"),
                inner: Default::default(),
            },
        );
        let result = transform_with_catalog(r"t \begin{align}x\\y\end{align} u\\v", &catalog);
        assert!(result.success);
        // replaced, not wrapped; the line break inside still counts as math
        assert_eq!(result.transformed_text, r"t [L]x\\y[R] u\(\\ \)v");
        assert!(!result.operation_log.contains("Wrapped environment"));
        assert!(result
            .operation_log
            .contains("1x Replaced environment align with [L]...[R]"));
    }

    #[test]
    fn test_html_mode_escapes_replacement_argument() {
        let result = transform(r"\begin{itemize}\item \intertext{a<b}\end{itemize}");
        assert!(result.success);
        assert_eq!(result.transformed_text, r"<ul><li> \text{a&lt;b}\\ </ul>");
    }

    #[test]
    fn test_no_html_escape_without_lists() {
        let result = transform("a < b & c\nd");
        assert_eq!(result.transformed_text, "a < b & c\nd");
        assert_eq!(result.info_message, "");
    }
}

// ============================================================================
// Commands and Preamble
// ============================================================================

mod commands {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_norm_end_to_end() {
        let result = transform(r"The norm is \norm{x}.");
        assert!(result.success);
        assert_eq!(
            result.transformed_text,
            r"\(\newcommand{\norm}[1]{\left|\!\left|#1\right|\!\right|} \)The norm is \norm{x}."
        );
        assert_eq!(result.operation_log, "1x Included definition for norm\n");
    }

    #[test]
    fn test_dependency_precedes_dependent() {
        let output = transform_detailed(r"$\normtwo{v}$", &DEFAULT_CATALOG).unwrap();
        let norm = output.preamble.find(r"\newcommand{\norm}").unwrap();
        let normtwo = output.preamble.find(r"\newcommand{\normtwo}").unwrap();
        assert!(norm < normtwo);
        assert_eq!(output.body, r"\(\normtwo{v}\)");
    }

    #[test]
    fn test_each_definition_included_once() {
        let output =
            transform_detailed(r"\normone{a} \norminf{b} \norm{c}", &DEFAULT_CATALOG).unwrap();
        assert_eq!(output.preamble.matches(r"\newcommand{\norm}").count(), 1);
        assert_eq!(output.log.count("Included definition for norm"), 1);
    }

    #[test]
    fn test_replacements() {
        assert_eq!(transform(r"$x\in\R$").transformed_text, r"\(x\in\mathbb{R}\)");
        assert_eq!(transform(r"\mbox{text}").transformed_text, "{text}");
        assert_eq!(transform(r"$\Tilde{u}$").transformed_text, r"\(\tilde{u}\)");
    }

    #[test]
    fn test_intertext() {
        let result = transform(r"$$a \intertext{and} b$$");
        assert_eq!(result.transformed_text, r"\[a \text{and}\\  b\]");
    }

    #[test]
    fn test_missing_argument() {
        let result = transform(r"\Tilde x");
        assert!(!result.success);
        assert!(result.error_message.starts_with("expected { for command Tilde"));
    }

    #[test]
    fn test_unknown_commands_kept() {
        let input = r"$\alpha + \frac{1}{2}$";
        assert_eq!(transform(input).transformed_text, r"\(\alpha + \frac{1}{2}\)");
    }
}

// ============================================================================
// Comments, Log and Idempotence
// ============================================================================

mod behavior {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comments_removed() {
        let result = transform("first % remove me\nsecond");
        assert_eq!(result.transformed_text, "first second");
        assert_eq!(result.operation_log, "1x Removed comment\n");
    }

    #[test]
    fn test_escaped_percent_kept() {
        assert_eq!(transform(r"50\% off").transformed_text, r"50\% off");
    }

    #[test]
    fn test_log_counts_repeats() {
        let result = transform("$a$ $b$ $$c$$ % x");
        assert_eq!(
            result.operation_log,
            "2x Replaced $...$ with \\(...\\)\n1x Replaced $$...$$ with \\[...\\]\n1x Removed comment\n"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let input = "Plain text, with punctuation.\nAnd a second line!";
        let result = transform(input);
        assert_eq!(result.transformed_text, input);
        assert_eq!(result.operation_log, "");
    }

    #[test]
    fn test_idempotent_on_transformed_output() {
        let inputs = [
            "$x$ and $$y$$",
            r"\(a\) \[b\] \R",
            r"Text \begin{center}c\end{center}",
        ];
        for input in inputs {
            let once = transform(input).transformed_text;
            let twice = transform(&once).transformed_text;
            assert_eq!(twice, once, "input: {}", input);
        }
    }

    #[test]
    fn test_empty_catalog_only_rewrites_delimiters() {
        let catalog = Catalog::new();
        let result = transform_with_catalog(r"$\R$ \norm{x}", &catalog);
        assert_eq!(result.transformed_text, r"\(\R\) \norm{x}");
    }
}

// ============================================================================
// Catalog Extension
// ============================================================================

#[cfg(feature = "data-loading")]
mod catalog_extension {
    use super::*;
    use pretty_assertions::assert_eq;
    use stacklatex::CatalogError;

    #[test]
    fn test_toml_replacement() {
        let toml = r#"
[replacements.C]
escape = true
left = '\mathbb{C}'
"#;
        let catalog = Catalog::builtin_extended(toml, "toml").unwrap();
        let result = transform_with_catalog(r"$z \in \C$", &catalog);
        assert_eq!(result.transformed_text, r"\(z \in \mathbb{C}\)");
    }

    #[test]
    fn test_json_custom_command_with_dependency() {
        let json = r#"{
            "custom_commands": [
                {"name": "dist", "definition": "\\newcommand{\\dist}[2]{\\abs{#1-#2}}", "dependencies": ["abs"]}
            ]
        }"#;
        let catalog = Catalog::builtin_extended(json, "json").unwrap();
        let output = transform_detailed(r"\dist{a}{b}", &catalog).unwrap();
        let abs = output.preamble.find(r"\newcommand{\abs}").unwrap();
        let dist = output.preamble.find(r"\newcommand{\dist}").unwrap();
        assert!(abs < dist);
    }

    #[test]
    fn test_yaml_math_environment() {
        let yaml = "math_environments:\n  - gather\n";
        let catalog = Catalog::builtin_extended(yaml, "yaml").unwrap();
        let result = transform_with_catalog(r"\begin{gather}x\end{gather}", &catalog);
        assert_eq!(result.transformed_text, r"\(\begin{gather}x\end{gather}\)");
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let json = r#"{"custom_commands": [{"name": "f", "definition": "x", "dependencies": ["g"]}]}"#;
        let err = Catalog::builtin_extended(json, "json").unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownDependency {
                command: "f".to_string(),
                dependency: "g".to_string(),
            }
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = Catalog::builtin_extended("", "xml").unwrap_err();
        assert_eq!(err, CatalogError::UnsupportedFormat("xml".to_string()));
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_input() {
        let result = check_latex(r"Let $x \in \R$.");
        assert!(result.is_empty());
        assert_eq!(result.summary(), "no issues found");
    }

    #[test]
    fn test_error_with_location() {
        let result = check_latex("line one\n$$ a $");
        assert!(result.has_errors());
        let diag = &result.diagnostics[0];
        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.line, Some(2));
        assert_eq!(diag.column, Some(7));
        assert_eq!(diag.source_text.as_deref(), Some("$$ a $"));
    }

    #[test]
    fn test_open_scopes_are_warnings() {
        let result = check_latex(r"\begin{align} $x");
        assert!(!result.has_errors());
        assert_eq!(result.warnings, 2);
    }

    #[test]
    fn test_unbalanced_braces() {
        let result = check_latex("{a");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.message == "1 unclosed brace (opened around line 1)"));
    }

    #[test]
    fn test_html_note() {
        let result = check_latex(r"\begin{itemize}\item a\end{itemize}");
        assert_eq!(result.infos, 1);
        let text = format_diagnostics(&result, false);
        assert!(text.contains("source code"));
    }
}
