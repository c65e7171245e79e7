//! Data layer - Static catalogs
//!
//! This module contains all static data consumed by the transformer:
//! - Custom command definitions, dependencies and display order
//! - Built-in command replacements
//! - Environment replacements and recognized math environments

pub mod catalog;
pub mod commands;
pub mod environments;

// Re-export commonly used items
pub use catalog::{
    ArgumentKind, Catalog, CommandReplacement, CustomCommand, EnvironmentReplacement,
    DEFAULT_CATALOG,
};
pub use commands::{CustomCommandSpec, COMMAND_REPLACEMENTS, CUSTOM_COMMANDS};
pub use environments::{enumerate_item_marker, ENVIRONMENT_REPLACEMENTS, MATH_ENVIRONMENTS};

#[cfg(feature = "data-loading")]
pub use catalog::{CatalogExtension, CustomCommandEntry};
