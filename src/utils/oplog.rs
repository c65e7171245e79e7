//! Counted operation log
//!
//! Every notable substitution made by the transformer is recorded under a
//! human-readable message. Identical messages are counted instead of
//! repeated, and messages keep the order of their first occurrence.

use std::fmt;

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationLog {
    entries: IndexMap<String, usize>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `message`
    pub fn record(&mut self, message: impl Into<String>) {
        *self.entries.entry(message.into()).or_insert(0) += 1;
    }

    /// Number of times `message` was recorded
    pub fn count(&self, message: &str) -> usize {
        self.entries.get(message).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct messages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// One `"<count>x <message>"` line per distinct message
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OperationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (message, count) in &self.entries {
            writeln!(f, "{}x {}", count, message)?;
        }
        Ok(())
    }
}
