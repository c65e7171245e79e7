//! Assembled command and environment catalogs
//!
//! The static tables in [`crate::data::commands`] and
//! [`crate::data::environments`] are collected into one owned [`Catalog`]
//! value. The built-in catalog is constructed once on first use
//! ([`DEFAULT_CATALOG`]) and only ever read afterwards; callers that need
//! extra commands build their own `Catalog` and pass it by reference.

use std::borrow::Cow;

use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexMap;
use lazy_static::lazy_static;

use super::commands::{COMMAND_REPLACEMENTS, CUSTOM_COMMANDS};
use super::environments::{ENVIRONMENT_REPLACEMENTS, MATH_ENVIRONMENTS};

#[cfg(feature = "data-loading")]
use crate::utils::error::CatalogError;

/// Which argument, if any, a replaced command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "data-loading", derive(serde::Deserialize))]
#[cfg_attr(feature = "data-loading", serde(rename_all = "lowercase"))]
pub enum ArgumentKind {
    /// Zero-argument substitution
    #[default]
    None,
    /// `\cmd{...}`: the right text is emitted when the brace closes
    Brace,
    /// `\cmd[...]`: the right text is emitted at the next `]`
    Bracket,
}

/// Inline replacement of a built-in command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "data-loading", derive(serde::Deserialize))]
pub struct CommandReplacement {
    /// Route the replacement texts through the HTML escaper
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub escape: bool,
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub argument: ArgumentKind,
    pub left: Cow<'static, str>,
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub right: Cow<'static, str>,
}

impl CommandReplacement {
    /// Zero-argument replacement emitted verbatim (never escaped)
    pub const fn raw(left: &'static str) -> Self {
        Self {
            escape: false,
            argument: ArgumentKind::None,
            left: Cow::Borrowed(left),
            right: Cow::Borrowed(""),
        }
    }
}

/// Replacement for a `\begin{name}...\end{name}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "data-loading", derive(serde::Deserialize))]
pub struct EnvironmentReplacement {
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub escape: bool,
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub left: Cow<'static, str>,
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub right: Cow<'static, str>,
    /// Command meanings that apply only while this environment is innermost
    #[cfg_attr(feature = "data-loading", serde(default))]
    pub inner: FxHashMap<String, CommandReplacement>,
}

/// A macro injected into the preamble when used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommand {
    /// Full `\newcommand` definition
    pub definition: String,
    /// Other custom commands this definition expands to
    pub dependencies: Vec<String>,
}

/// Immutable lookup tables consumed by the transformer.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Insertion order is the preamble display order
    custom_commands: IndexMap<String, CustomCommand>,
    replacements: FxHashMap<String, CommandReplacement>,
    environments: FxHashMap<String, EnvironmentReplacement>,
    math_environments: FxHashSet<String>,
}

lazy_static! {
    /// The catalog shipped with the crate
    pub static ref DEFAULT_CATALOG: Catalog = Catalog::builtin();
}

impl Catalog {
    /// An empty catalog: every command and environment passes through
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the catalog from the static tables
    pub fn builtin() -> Self {
        let custom_commands = CUSTOM_COMMANDS
            .entries()
            .map(|(name, spec)| {
                (
                    name.to_string(),
                    CustomCommand {
                        definition: spec.definition.to_string(),
                        dependencies: spec.dependencies.iter().map(|d| d.to_string()).collect(),
                    },
                )
            })
            .collect();

        let replacements = COMMAND_REPLACEMENTS
            .entries()
            .map(|(name, repl)| (name.to_string(), repl.clone()))
            .collect();

        let environments = ENVIRONMENT_REPLACEMENTS
            .iter()
            .map(|(name, repl)| (name.to_string(), repl.clone()))
            .collect();

        let math_environments = MATH_ENVIRONMENTS.iter().map(|s| s.to_string()).collect();

        Self {
            custom_commands,
            replacements,
            environments,
            math_environments,
        }
    }

    pub fn custom_command(&self, name: &str) -> Option<&CustomCommand> {
        self.custom_commands.get(name)
    }

    pub fn is_custom_command(&self, name: &str) -> bool {
        self.custom_commands.contains_key(name)
    }

    /// Custom commands in preamble display order
    pub fn custom_commands(&self) -> impl Iterator<Item = (&str, &CustomCommand)> {
        self.custom_commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn replacement(&self, name: &str) -> Option<&CommandReplacement> {
        self.replacements.get(name)
    }

    pub fn replacements(&self) -> impl Iterator<Item = (&str, &CommandReplacement)> {
        self.replacements.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentReplacement> {
        self.environments.get(name)
    }

    pub fn environments(&self) -> impl Iterator<Item = (&str, &EnvironmentReplacement)> {
        self.environments.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Command override scoped to `environment`
    pub fn environment_command(
        &self,
        environment: &str,
        command: &str,
    ) -> Option<&CommandReplacement> {
        self.environments.get(environment)?.inner.get(command)
    }

    pub fn is_math_environment(&self, name: &str) -> bool {
        self.math_environments.contains(name)
    }

    pub fn math_environments(&self) -> impl Iterator<Item = &str> {
        self.math_environments.iter().map(String::as_str)
    }

    /// Register a custom command; an existing entry keeps its display position
    pub fn insert_custom_command(&mut self, name: impl Into<String>, command: CustomCommand) {
        self.custom_commands.insert(name.into(), command);
    }

    pub fn insert_replacement(&mut self, name: impl Into<String>, replacement: CommandReplacement) {
        self.replacements.insert(name.into(), replacement);
    }

    pub fn insert_environment(
        &mut self,
        name: impl Into<String>,
        replacement: EnvironmentReplacement,
    ) {
        self.environments.insert(name.into(), replacement);
    }

    pub fn insert_math_environment(&mut self, name: impl Into<String>) {
        self.math_environments.insert(name.into());
    }
}

// =============================================================================
// Catalog loading
// =============================================================================

/// One custom command entry in a catalog document
#[cfg(feature = "data-loading")]
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CustomCommandEntry {
    pub name: String,
    pub definition: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Additions merged over an existing catalog.
///
/// ```toml
/// math_environments = ["gather"]
///
/// [[custom_commands]]
/// name = "set"
/// definition = '\newcommand{\set}[1]{\left\{#1\right\}}'
///
/// [replacements.C]
/// escape = true
/// left = '\mathbb{C}'
/// ```
#[cfg(feature = "data-loading")]
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct CatalogExtension {
    pub custom_commands: Vec<CustomCommandEntry>,
    pub replacements: FxHashMap<String, CommandReplacement>,
    pub environments: FxHashMap<String, EnvironmentReplacement>,
    pub math_environments: Vec<String>,
}

#[cfg(feature = "data-loading")]
impl CatalogExtension {
    pub fn from_json_str(input: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(input).map_err(|e| CatalogError::parse("json", e))
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(input).map_err(|e| CatalogError::parse("yaml", e))
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        toml::from_str(input).map_err(|e| CatalogError::parse("toml", e))
    }
}

#[cfg(feature = "data-loading")]
impl Catalog {
    /// Merge `extension` into this catalog.
    ///
    /// Every declared dependency must name a custom command that exists after
    /// the merge; on error the catalog is left untouched.
    pub fn extend(&mut self, extension: CatalogExtension) -> Result<(), CatalogError> {
        for entry in &extension.custom_commands {
            for dep in &entry.dependencies {
                let known = self.custom_commands.contains_key(dep)
                    || extension.custom_commands.iter().any(|e| &e.name == dep);
                if !known {
                    return Err(CatalogError::UnknownDependency {
                        command: entry.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        for entry in extension.custom_commands {
            self.insert_custom_command(
                entry.name,
                CustomCommand {
                    definition: entry.definition,
                    dependencies: entry.dependencies,
                },
            );
        }
        self.replacements.extend(extension.replacements);
        self.environments.extend(extension.environments);
        self.math_environments.extend(extension.math_environments);
        Ok(())
    }

    /// The built-in catalog extended by a document in the given format
    /// (`json`, `yaml`/`yml` or `toml`)
    pub fn builtin_extended(input: &str, format: &str) -> Result<Self, CatalogError> {
        let extension = match format {
            "json" => CatalogExtension::from_json_str(input)?,
            "yaml" | "yml" => CatalogExtension::from_yaml_str(input)?,
            "toml" => CatalogExtension::from_toml_str(input)?,
            other => return Err(CatalogError::UnsupportedFormat(other.to_string())),
        };
        let mut catalog = Self::builtin();
        catalog.extend(extension)?;
        Ok(catalog)
    }
}
