//! Preamble synthesis
//!
//! Custom commands are not expanded inline. Instead the definitions of all
//! commands used in the input, plus the commands those definitions rely on,
//! are collected into a single math block that precedes the output.

use fxhash::FxHashSet;

use crate::data::catalog::Catalog;
use crate::utils::oplog::OperationLog;

/// Close `used` under the catalog's declared dependencies
pub fn dependency_closure(catalog: &Catalog, used: &FxHashSet<String>) -> FxHashSet<String> {
    let mut closed = used.clone();
    let mut queue: Vec<&str> = used.iter().map(String::as_str).collect();

    while let Some(name) = queue.pop() {
        let Some(command) = catalog.custom_command(name) else {
            continue;
        };
        for dep in &command.dependencies {
            if closed.insert(dep.clone()) {
                queue.push(dep);
            }
        }
    }
    closed
}

/// Render the preamble for `used` in catalog display order.
///
/// Returns an empty string when no custom command was used. Every included
/// definition is recorded in `log`.
pub fn render_preamble(
    catalog: &Catalog,
    used: &FxHashSet<String>,
    log: &mut OperationLog,
) -> String {
    if used.is_empty() {
        return String::new();
    }

    let closed = dependency_closure(catalog, used);
    let mut preamble = String::new();
    for (name, command) in catalog.custom_commands() {
        if !closed.contains(name) {
            continue;
        }
        if preamble.is_empty() {
            preamble.push_str(r"\(");
        }
        preamble.push_str(&command.definition);
        preamble.push(' ');
        log.record(format!("Included definition for {}", name));
    }

    if !preamble.is_empty() {
        preamble.push_str(r"\)");
    }
    preamble
}
