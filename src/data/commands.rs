//! Command tables
//!
//! Two kinds of commands are known to the transformer:
//!
//! - **Custom commands** are left in the text as-is; their `\newcommand`
//!   definitions are collected into a preamble when used. The table order is
//!   the order in which definitions appear in that preamble.
//! - **Command replacements** are substituted inline for constructs the target
//!   platform does not understand.

use std::borrow::Cow;

use phf::{phf_map, phf_ordered_map};

use super::catalog::{ArgumentKind, CommandReplacement};

/// Static description of a custom command
#[derive(Debug, Clone, Copy)]
pub struct CustomCommandSpec {
    pub definition: &'static str,
    pub dependencies: &'static [&'static str],
}

/// Custom macros in preamble display order
pub static CUSTOM_COMMANDS: phf::OrderedMap<&'static str, CustomCommandSpec> = phf_ordered_map! {
    "abs" => CustomCommandSpec {
        definition: r"\newcommand{\abs}[1]{\left|#1\right|}",
        dependencies: &[],
    },
    "norm" => CustomCommandSpec {
        definition: r"\newcommand{\norm}[1]{\left|\!\left|#1\right|\!\right|}",
        dependencies: &[],
    },
    "energynorm" => CustomCommandSpec {
        definition: r"\newcommand{\energynorm}[1]{\left|\!\left|\!\left|#1\right|\!\right|\!\right|}",
        dependencies: &["norm"],
    },
    "normone" => CustomCommandSpec {
        definition: r"\newcommand{\normone}[1]{\norm{#1}_1}",
        dependencies: &["norm"],
    },
    "normtwo" => CustomCommandSpec {
        definition: r"\newcommand{\normtwo}[1]{\norm{#1}_2}",
        dependencies: &["norm"],
    },
    "norminf" => CustomCommandSpec {
        definition: r"\newcommand{\norminf}[1]{\norm{#1}_\infty}",
        dependencies: &["norm"],
    },
};

/// Inline replacements, applied regardless of the enclosing environment
pub static COMMAND_REPLACEMENTS: phf::Map<&'static str, CommandReplacement> = phf_map! {
    "R" => CommandReplacement {
        escape: true,
        argument: ArgumentKind::None,
        left: Cow::Borrowed(r"\mathbb{R}"),
        right: Cow::Borrowed(""),
    },
    "mbox" => CommandReplacement {
        escape: true,
        argument: ArgumentKind::Brace,
        left: Cow::Borrowed("{"),
        right: Cow::Borrowed("}"),
    },
    "Tilde" => CommandReplacement {
        escape: true,
        argument: ArgumentKind::Brace,
        left: Cow::Borrowed(r"\tilde{"),
        right: Cow::Borrowed("}"),
    },
    "intertext" => CommandReplacement {
        escape: true,
        argument: ArgumentKind::Brace,
        left: Cow::Borrowed(r"\text{"),
        right: Cow::Borrowed(r"}\\ "),
    },
};
