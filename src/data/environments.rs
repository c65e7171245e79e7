//! Environment tables
//!
//! List environments are rewritten to HTML list markup, which is the only
//! raw HTML the target platform accepts. Math environments are recognized so
//! that they can be wrapped in math delimiters when used outside math mode.

use std::borrow::Cow;

use fxhash::FxHashMap;
use lazy_static::lazy_static;
use phf::phf_set;

use super::catalog::{ArgumentKind, CommandReplacement, EnvironmentReplacement};

lazy_static! {
    /// Environment replacements with their scoped command overrides
    pub static ref ENVIRONMENT_REPLACEMENTS: FxHashMap<&'static str, EnvironmentReplacement> = {
        let mut m = FxHashMap::default();
        m.insert("enumerate", list_environment("<ol>", "</ol>"));
        m.insert("itemize", list_environment("<ul>", "</ul>"));

        // \item[label] drops its label brackets
        let mut inner = FxHashMap::default();
        inner.insert(
            "item".to_string(),
            CommandReplacement {
                escape: false,
                argument: ArgumentKind::Bracket,
                left: Cow::Borrowed(""),
                right: Cow::Borrowed(""),
            },
        );
        m.insert(
            "description",
            EnvironmentReplacement {
                escape: false,
                left: Cow::Borrowed(""),
                right: Cow::Borrowed(""),
                inner,
            },
        );
        m
    };
}

/// Environments whose body is mathematics
pub static MATH_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "align",
    "align*",
    "aligned",
    "equation",
    "equation*",
};

fn list_environment(left: &'static str, right: &'static str) -> EnvironmentReplacement {
    let mut inner = FxHashMap::default();
    inner.insert("item".to_string(), CommandReplacement::raw("<li>"));
    EnvironmentReplacement {
        escape: false,
        left: Cow::Borrowed(left),
        right: Cow::Borrowed(right),
        inner,
    }
}

/// Marker for `\item` directly inside `enumerate`, by enumerate nesting depth.
///
/// The platform's list support has no nested numbering, so the letter style
/// changes with depth: `a` at the outermost level, `i` below it, `A` beyond.
pub fn enumerate_item_marker(depth: usize) -> &'static str {
    match depth {
        0 | 1 => r#"<li type="a">)"#,
        2 => r#"<li type="i">)"#,
        _ => r#"<li type="A">)"#,
    }
}
